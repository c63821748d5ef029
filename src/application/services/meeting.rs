//! Meeting business logic service
//!
//! Scheduling binds a meeting to exactly one time slot. The slot claim
//! is the serialization point: of any number of concurrent schedule
//! calls for the same slot, exactly one wins and the rest get
//! `SlotNotAvailable`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, Meeting, RepositoryProvider};
use crate::infrastructure::ServiceCache;
use crate::shared::PaginatedResult;

use super::TimeSlotService;

pub struct MeetingService {
    repos: Arc<dyn RepositoryProvider>,
    time_slots: Arc<TimeSlotService>,
    cache: Arc<ServiceCache>,
}

impl MeetingService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        time_slots: Arc<TimeSlotService>,
        cache: Arc<ServiceCache>,
    ) -> Self {
        Self {
            repos,
            time_slots,
            cache,
        }
    }

    pub async fn schedule(
        &self,
        title: &str,
        description: Option<String>,
        participants: Vec<String>,
        time_slot_id: Uuid,
    ) -> DomainResult<Meeting> {
        debug!("Scheduling meeting '{}' on slot {}", title, time_slot_id);

        if title.trim().is_empty() {
            return Err(DomainError::InvalidArgument(
                "Meeting title must not be blank".into(),
            ));
        }

        // Cheap pre-checks; the claim below is what actually decides
        let slot = self.time_slots.get_by_id(time_slot_id).await?;
        if !slot.is_available() {
            return Err(DomainError::SlotNotAvailable {
                slot_id: time_slot_id,
            });
        }
        if self
            .repos
            .meetings()
            .find_by_slot(time_slot_id)
            .await?
            .is_some()
        {
            return Err(DomainError::SlotNotAvailable {
                slot_id: time_slot_id,
            });
        }

        if !self.time_slots.claim(time_slot_id).await? {
            return Err(DomainError::SlotNotAvailable {
                slot_id: time_slot_id,
            });
        }

        let meeting = Meeting::new(title, description, participants, time_slot_id);
        if let Err(e) = self.repos.meetings().save(meeting.clone()).await {
            // Free the slot again so the failed attempt leaves no trace
            warn!(
                "Meeting save failed after claiming slot {}, releasing: {}",
                time_slot_id, e
            );
            self.time_slots.release(time_slot_id).await?;
            return Err(e);
        }

        self.cache.invalidate_meeting(meeting.id);
        info!("Scheduled meeting {} on slot {}", meeting.id, time_slot_id);
        Ok(meeting)
    }

    /// Read-through cached by id
    pub async fn get_by_id(&self, id: Uuid) -> DomainResult<Meeting> {
        if let Some(cached) = self.cache.get_meeting(id) {
            return Ok(cached);
        }
        let meeting = self
            .repos
            .meetings()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Meeting", id))?;
        self.cache.put_meeting(meeting.clone());
        Ok(meeting)
    }

    /// Updates title, description and participants. The slot binding is
    /// immutable; cancel and reschedule to move a meeting.
    pub async fn update(
        &self,
        id: Uuid,
        title: &str,
        description: Option<String>,
        participants: Vec<String>,
    ) -> DomainResult<Meeting> {
        debug!("Updating meeting {}", id);

        if title.trim().is_empty() {
            return Err(DomainError::InvalidArgument(
                "Meeting title must not be blank".into(),
            ));
        }

        let mut meeting = self.get_by_id(id).await?;
        meeting.title = title.to_string();
        meeting.description = description;
        meeting.participants.clear();
        for p in participants {
            meeting.add_participant(p);
        }
        meeting.updated_at = Utc::now();

        self.repos.meetings().update(meeting.clone()).await?;
        self.cache.invalidate_meeting(id);
        info!("Updated meeting {}", id);
        Ok(meeting)
    }

    /// Deletes the meeting and releases its slot back to AVAILABLE
    pub async fn cancel(&self, id: Uuid) -> DomainResult<()> {
        debug!("Cancelling meeting {}", id);

        let meeting = self.get_by_id(id).await?;
        self.repos.meetings().delete(id).await?;
        self.cache.invalidate_meeting(id);
        self.time_slots.release(meeting.time_slot_id).await?;
        info!("Cancelled meeting {}", id);
        Ok(())
    }

    pub async fn add_participant(&self, id: Uuid, participant_id: &str) -> DomainResult<Meeting> {
        if participant_id.trim().is_empty() {
            return Err(DomainError::InvalidArgument(
                "Participant id must not be blank".into(),
            ));
        }

        let mut meeting = self.get_by_id(id).await?;
        meeting.add_participant(participant_id);
        meeting.updated_at = Utc::now();

        self.repos.meetings().update(meeting.clone()).await?;
        self.cache.invalidate_meeting(id);
        Ok(meeting)
    }

    pub async fn remove_participant(
        &self,
        id: Uuid,
        participant_id: &str,
    ) -> DomainResult<Meeting> {
        let mut meeting = self.get_by_id(id).await?;
        meeting.remove_participant(participant_id);
        meeting.updated_at = Utc::now();

        self.repos.meetings().update(meeting.clone()).await?;
        self.cache.invalidate_meeting(id);
        Ok(meeting)
    }

    pub async fn get_by_slot(&self, time_slot_id: Uuid) -> DomainResult<Option<Meeting>> {
        self.repos.meetings().find_by_slot(time_slot_id).await
    }

    pub async fn list_by_participant(
        &self,
        participant_id: &str,
        page: u64,
        limit: u64,
    ) -> DomainResult<PaginatedResult<Meeting>> {
        let (items, total) = self
            .repos
            .meetings()
            .find_by_participant_paged(participant_id, page, limit)
            .await?;
        Ok(PaginatedResult::new(items, total, page, limit))
    }

    pub async fn list_by_calendar_owner(
        &self,
        user_id: &str,
        page: u64,
        limit: u64,
    ) -> DomainResult<PaginatedResult<Meeting>> {
        let (items, total) = self
            .repos
            .meetings()
            .find_by_calendar_owner_paged(user_id, page, limit)
            .await?;
        Ok(PaginatedResult::new(items, total, page, limit))
    }

    pub async fn find_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Meeting>> {
        self.repos.meetings().find_in_range(start, end).await
    }

    pub async fn find_by_participant_in_range(
        &self,
        participant_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Meeting>> {
        self.repos
            .meetings()
            .find_by_participant_in_range(participant_id, start, end)
            .await
    }

    pub async fn count_by_participant(&self, participant_id: &str) -> DomainResult<u64> {
        self.repos
            .meetings()
            .count_by_participant(participant_id)
            .await
    }

    pub async fn find_by_title(&self, title: &str) -> DomainResult<Vec<Meeting>> {
        self.repos.meetings().find_by_title(title).await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::CalendarService;
    use crate::domain::SlotStatus;
    use crate::infrastructure::InMemoryRepositories;
    use chrono::Duration;

    struct Fixture {
        calendars: Arc<CalendarService>,
        slots: Arc<TimeSlotService>,
        meetings: MeetingService,
    }

    fn fixture() -> Fixture {
        let repos = Arc::new(InMemoryRepositories::new());
        let cache = Arc::new(ServiceCache::new());
        let calendars = Arc::new(CalendarService::new(repos.clone(), cache.clone()));
        let slots = Arc::new(TimeSlotService::new(
            repos.clone(),
            calendars.clone(),
            cache.clone(),
        ));
        let meetings = MeetingService::new(repos, slots.clone(), cache);
        Fixture {
            calendars,
            slots,
            meetings,
        }
    }

    async fn make_slot(f: &Fixture) -> Uuid {
        let cal = f.calendars.create("Work", "u1", "UTC").await.unwrap();
        let start = Utc::now() + Duration::hours(24);
        let slot = f
            .slots
            .create(cal.id, start, start + Duration::hours(1), None)
            .await
            .unwrap();
        slot.id
    }

    #[tokio::test]
    async fn schedule_marks_slot_busy() {
        let f = fixture();
        let slot_id = make_slot(&f).await;

        let meeting = f
            .meetings
            .schedule("Standup", None, vec!["alice".into()], slot_id)
            .await
            .unwrap();
        assert_eq!(meeting.time_slot_id, slot_id);
        assert_eq!(
            f.slots.get_by_id(slot_id).await.unwrap().status,
            SlotStatus::Busy
        );
    }

    #[tokio::test]
    async fn schedule_on_busy_slot_fails() {
        let f = fixture();
        let slot_id = make_slot(&f).await;
        f.slots.mark_busy(slot_id).await.unwrap();

        let err = f
            .meetings
            .schedule("Standup", None, vec![], slot_id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SlotNotAvailable { .. }));
        assert!(f.meetings.get_by_slot(slot_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn double_schedule_on_same_slot_fails() {
        let f = fixture();
        let slot_id = make_slot(&f).await;

        f.meetings
            .schedule("First", None, vec![], slot_id)
            .await
            .unwrap();
        let err = f
            .meetings
            .schedule("Second", None, vec![], slot_id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SlotNotAvailable { .. }));
    }

    #[tokio::test]
    async fn concurrent_schedule_has_exactly_one_winner() {
        let f = fixture();
        let slot_id = make_slot(&f).await;

        let (a, b) = tokio::join!(
            f.meetings.schedule("A", None, vec![], slot_id),
            f.meetings.schedule("B", None, vec![], slot_id),
        );
        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let f = fixture();
        let slot_id = make_slot(&f).await;

        let err = f
            .meetings
            .schedule("   ", None, vec![], slot_id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
        // The slot was never claimed
        assert!(f.slots.get_by_id(slot_id).await.unwrap().is_available());
    }

    #[tokio::test]
    async fn cancel_releases_the_slot() {
        let f = fixture();
        let slot_id = make_slot(&f).await;
        let meeting = f
            .meetings
            .schedule("Standup", None, vec![], slot_id)
            .await
            .unwrap();

        f.meetings.cancel(meeting.id).await.unwrap();

        assert!(matches!(
            f.meetings.get_by_id(meeting.id).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(f.slots.get_by_id(slot_id).await.unwrap().is_available());
        // The freed slot can be booked again
        assert!(f
            .meetings
            .schedule("Retro", None, vec![], slot_id)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn update_keeps_slot_binding() {
        let f = fixture();
        let slot_id = make_slot(&f).await;
        let meeting = f
            .meetings
            .schedule("Standup", None, vec!["alice".into()], slot_id)
            .await
            .unwrap();

        let updated = f
            .meetings
            .update(
                meeting.id,
                "Renamed",
                Some("notes".into()),
                vec!["bob".into()],
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.participants, vec!["bob".to_string()]);
        assert_eq!(updated.time_slot_id, slot_id);
    }

    #[tokio::test]
    async fn participant_add_and_remove_are_idempotent() {
        let f = fixture();
        let slot_id = make_slot(&f).await;
        let meeting = f
            .meetings
            .schedule("Standup", None, vec![], slot_id)
            .await
            .unwrap();

        f.meetings
            .add_participant(meeting.id, "alice")
            .await
            .unwrap();
        let again = f
            .meetings
            .add_participant(meeting.id, "alice")
            .await
            .unwrap();
        assert_eq!(again.participants.len(), 1);

        f.meetings
            .remove_participant(meeting.id, "alice")
            .await
            .unwrap();
        let gone = f
            .meetings
            .remove_participant(meeting.id, "alice")
            .await
            .unwrap();
        assert!(gone.participants.is_empty());
    }

    #[tokio::test]
    async fn list_by_participant_counts_only_their_meetings() {
        let f = fixture();
        let cal = f.calendars.create("Work", "u1", "UTC").await.unwrap();
        let start = Utc::now() + Duration::hours(24);
        let s1 = f
            .slots
            .create(cal.id, start, start + Duration::hours(1), None)
            .await
            .unwrap();
        let s2 = f
            .slots
            .create(
                cal.id,
                start + Duration::hours(2),
                start + Duration::hours(3),
                None,
            )
            .await
            .unwrap();

        f.meetings
            .schedule("A", None, vec!["alice".into()], s1.id)
            .await
            .unwrap();
        f.meetings
            .schedule("B", None, vec!["bob".into()], s2.id)
            .await
            .unwrap();

        let page = f.meetings.list_by_participant("alice", 1, 20).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].title, "A");
        assert_eq!(f.meetings.count_by_participant("alice").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn list_by_calendar_owner_spans_calendars() {
        let f = fixture();
        let a = f.calendars.create("A", "u1", "UTC").await.unwrap();
        let b = f.calendars.create("B", "u1", "UTC").await.unwrap();
        let other = f.calendars.create("C", "u2", "UTC").await.unwrap();
        let start = Utc::now() + Duration::hours(24);

        for (cal, title) in [(&a, "One"), (&b, "Two"), (&other, "Theirs")] {
            let slot = f
                .slots
                .create(cal.id, start, start + Duration::hours(1), None)
                .await
                .unwrap();
            f.meetings
                .schedule(title, None, vec![], slot.id)
                .await
                .unwrap();
        }

        let page = f.meetings.list_by_calendar_owner("u1", 1, 20).await.unwrap();
        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|m| m.title != "Theirs"));
    }
}
