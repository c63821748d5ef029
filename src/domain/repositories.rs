//! Repository provider interface
//!
//! One object that hands out per-aggregate repositories. Services hold an
//! `Arc<dyn RepositoryProvider>` so the SeaORM-backed provider and the
//! in-memory provider used in tests are interchangeable.

use crate::domain::calendar::CalendarRepository;
use crate::domain::meeting::MeetingRepository;
use crate::domain::time_slot::TimeSlotRepository;

pub trait RepositoryProvider: Send + Sync {
    fn calendars(&self) -> &dyn CalendarRepository;
    fn time_slots(&self) -> &dyn TimeSlotRepository;
    fn meetings(&self) -> &dyn MeetingRepository;
}
