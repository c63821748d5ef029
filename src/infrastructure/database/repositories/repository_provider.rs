//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::calendar::CalendarRepository;
use crate::domain::meeting::MeetingRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::time_slot::TimeSlotRepository;

use super::calendar_repository::SeaOrmCalendarRepository;
use super::meeting_repository::SeaOrmMeetingRepository;
use super::time_slot_repository::SeaOrmTimeSlotRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let cal = repos.calendars().find_by_id(id).await?;
/// let busy = repos.time_slots().claim(slot_id).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    calendars: SeaOrmCalendarRepository,
    time_slots: SeaOrmTimeSlotRepository,
    meetings: SeaOrmMeetingRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            calendars: SeaOrmCalendarRepository::new(db.clone()),
            time_slots: SeaOrmTimeSlotRepository::new(db.clone()),
            meetings: SeaOrmMeetingRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn calendars(&self) -> &dyn CalendarRepository {
        &self.calendars
    }

    fn time_slots(&self) -> &dyn TimeSlotRepository {
        &self.time_slots
    }

    fn meetings(&self) -> &dyn MeetingRepository {
        &self.meetings
    }
}
