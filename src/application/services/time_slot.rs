//! Time slot business logic service
//!
//! Owns interval validation, overlap detection and the AVAILABLE/BUSY
//! transition. `claim` and `release` are the primitives MeetingService
//! drives during scheduling; `claim` is atomic at the repository level.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};
use uuid::Uuid;

use crate::domain::{
    DailySlotCount, DomainError, DomainResult, RepositoryProvider, SlotStatus, TimeSlot,
};
use crate::infrastructure::ServiceCache;
use crate::shared::PaginatedResult;

use super::CalendarService;

pub struct TimeSlotService {
    repos: Arc<dyn RepositoryProvider>,
    calendars: Arc<CalendarService>,
    cache: Arc<ServiceCache>,
}

impl TimeSlotService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        calendars: Arc<CalendarService>,
        cache: Arc<ServiceCache>,
    ) -> Self {
        Self {
            repos,
            calendars,
            cache,
        }
    }

    pub async fn create(
        &self,
        calendar_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        status: Option<SlotStatus>,
    ) -> DomainResult<TimeSlot> {
        debug!("Creating time slot for calendar {}", calendar_id);

        // Calendar must exist
        self.calendars.get_by_id(calendar_id).await?;
        TimeSlot::validate_interval(start, end)?;

        if self
            .repos
            .time_slots()
            .exists_overlapping(calendar_id, start, end, None)
            .await?
        {
            return Err(DomainError::TimeConflict { calendar_id });
        }

        let mut slot = TimeSlot::new(calendar_id, start, end);
        if let Some(status) = status {
            slot.status = status;
        }
        self.repos.time_slots().save(slot.clone()).await?;
        self.cache.invalidate_slot(slot.id, calendar_id);
        info!("Created time slot {}", slot.id);
        Ok(slot)
    }

    /// Read-through cached by id
    pub async fn get_by_id(&self, id: Uuid) -> DomainResult<TimeSlot> {
        if let Some(cached) = self.cache.get_slot(id) {
            return Ok(cached);
        }
        let slot = self
            .repos
            .time_slots()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("TimeSlot", id))?;
        self.cache.put_slot(slot.clone());
        Ok(slot)
    }

    pub async fn list_by_calendar(
        &self,
        calendar_id: Uuid,
        page: u64,
        limit: u64,
    ) -> DomainResult<PaginatedResult<TimeSlot>> {
        self.calendars.get_by_id(calendar_id).await?;
        let (items, total) = self
            .repos
            .time_slots()
            .find_by_calendar_paged(calendar_id, page, limit)
            .await?;
        Ok(PaginatedResult::new(items, total, page, limit))
    }

    pub async fn list_by_calendar_in_range(
        &self,
        calendar_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        page: u64,
        limit: u64,
    ) -> DomainResult<PaginatedResult<TimeSlot>> {
        let (items, total) = self
            .repos
            .time_slots()
            .find_by_calendar_in_range_paged(calendar_id, start, end, page, limit)
            .await?;
        Ok(PaginatedResult::new(items, total, page, limit))
    }

    /// AVAILABLE slots fully inside `[start, end]`, cached per query key
    pub async fn get_available_slots(
        &self,
        calendar_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<TimeSlot>> {
        if let Some(cached) = self.cache.get_available(calendar_id, start, end) {
            return Ok(cached);
        }
        let slots = self
            .repos
            .time_slots()
            .find_available_in_range(calendar_id, start, end)
            .await?;
        self.cache
            .put_available(calendar_id, start, end, slots.clone());
        Ok(slots)
    }

    pub async fn update(
        &self,
        id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        status: SlotStatus,
    ) -> DomainResult<TimeSlot> {
        debug!("Updating time slot {}", id);

        let mut slot = self.get_by_id(id).await?;
        TimeSlot::validate_interval(start, end)?;

        // A slot never conflicts with itself
        if self
            .repos
            .time_slots()
            .exists_overlapping(slot.calendar_id, start, end, Some(id))
            .await?
        {
            return Err(DomainError::TimeConflict {
                calendar_id: slot.calendar_id,
            });
        }

        slot.start_time = start;
        slot.end_time = end;
        slot.status = status;
        slot.updated_at = Utc::now();

        self.repos.time_slots().update(slot.clone()).await?;
        self.cache.invalidate_slot(id, slot.calendar_id);
        info!("Updated time slot {}", id);
        Ok(slot)
    }

    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        debug!("Deleting time slot {}", id);

        let slot = self.get_by_id(id).await?;
        if self.repos.meetings().find_by_slot(id).await?.is_some() {
            return Err(DomainError::InvalidState(
                "Cannot delete time slot with scheduled meeting".into(),
            ));
        }

        self.repos.time_slots().delete(id).await?;
        self.cache.invalidate_slot(id, slot.calendar_id);
        info!("Deleted time slot {}", id);
        Ok(())
    }

    pub async fn has_overlapping(
        &self,
        calendar_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_id: Option<Uuid>,
    ) -> DomainResult<bool> {
        self.repos
            .time_slots()
            .exists_overlapping(calendar_id, start, end, exclude_id)
            .await
    }

    pub async fn get_busy_slots_by_users(
        &self,
        user_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<TimeSlot>> {
        self.repos
            .time_slots()
            .find_busy_by_users(user_ids, start, end)
            .await
    }

    /// Idempotent status setter
    pub async fn mark_busy(&self, id: Uuid) -> DomainResult<()> {
        debug!("Marking slot {} as busy", id);
        let slot = self.get_by_id(id).await?;
        self.repos.time_slots().set_status(id, SlotStatus::Busy).await?;
        self.cache.invalidate_slot(id, slot.calendar_id);
        Ok(())
    }

    /// Idempotent status setter
    pub async fn mark_available(&self, id: Uuid) -> DomainResult<()> {
        debug!("Marking slot {} as available", id);
        let slot = self.get_by_id(id).await?;
        self.repos
            .time_slots()
            .set_status(id, SlotStatus::Available)
            .await?;
        self.cache.invalidate_slot(id, slot.calendar_id);
        Ok(())
    }

    /// Atomic AVAILABLE -> BUSY transition; `false` means a contender won
    /// or the slot was already BUSY. Cache entries are dropped either way
    /// so no caller observes a stale AVAILABLE status.
    pub async fn claim(&self, id: Uuid) -> DomainResult<bool> {
        let slot = self.get_by_id(id).await?;
        let claimed = self.repos.time_slots().claim(id).await?;
        self.cache.invalidate_slot(id, slot.calendar_id);
        Ok(claimed)
    }

    /// BUSY -> AVAILABLE, freeing the slot for new bookings
    pub async fn release(&self, id: Uuid) -> DomainResult<()> {
        self.mark_available(id).await
    }

    pub async fn count_by_day(
        &self,
        calendar_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<DailySlotCount>> {
        self.repos
            .time_slots()
            .count_by_day(calendar_id, start, end)
            .await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Meeting;
    use crate::domain::MeetingRepository;
    use crate::infrastructure::InMemoryRepositories;
    use chrono::Duration;

    struct Fixture {
        repos: Arc<InMemoryRepositories>,
        calendars: Arc<CalendarService>,
        slots: TimeSlotService,
    }

    fn fixture() -> Fixture {
        let repos = Arc::new(InMemoryRepositories::new());
        let cache = Arc::new(ServiceCache::new());
        let calendars = Arc::new(CalendarService::new(repos.clone(), cache.clone()));
        let slots = TimeSlotService::new(repos.clone(), calendars.clone(), cache);
        Fixture {
            repos,
            calendars,
            slots,
        }
    }

    fn t(hours: i64) -> DateTime<Utc> {
        Utc::now() + Duration::hours(24 + hours)
    }

    #[tokio::test]
    async fn create_requires_existing_calendar() {
        let f = fixture();
        let err = f
            .slots
            .create(Uuid::new_v4(), t(0), t(1), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn create_defaults_to_available() {
        let f = fixture();
        let cal = f.calendars.create("Work", "u1", "UTC").await.unwrap();
        let slot = f.slots.create(cal.id, t(0), t(1), None).await.unwrap();
        assert_eq!(slot.status, SlotStatus::Available);
    }

    #[tokio::test]
    async fn overlapping_create_is_rejected() {
        let f = fixture();
        let cal = f.calendars.create("Work", "u1", "UTC").await.unwrap();
        f.slots.create(cal.id, t(0), t(2), None).await.unwrap();

        let err = f.slots.create(cal.id, t(1), t(3), None).await.unwrap_err();
        assert!(matches!(err, DomainError::TimeConflict { .. }));
    }

    #[tokio::test]
    async fn touching_slots_are_accepted() {
        let f = fixture();
        let cal = f.calendars.create("Work", "u1", "UTC").await.unwrap();
        f.slots.create(cal.id, t(0), t(1), None).await.unwrap();
        // Ends exactly where the next starts: no overlap
        assert!(f.slots.create(cal.id, t(1), t(2), None).await.is_ok());
    }

    #[tokio::test]
    async fn overlap_is_scoped_to_one_calendar() {
        let f = fixture();
        let a = f.calendars.create("A", "u1", "UTC").await.unwrap();
        let b = f.calendars.create("B", "u1", "UTC").await.unwrap();
        f.slots.create(a.id, t(0), t(2), None).await.unwrap();
        // Same interval in another calendar is fine
        assert!(f.slots.create(b.id, t(0), t(2), None).await.is_ok());
    }

    #[tokio::test]
    async fn update_does_not_conflict_with_itself() {
        let f = fixture();
        let cal = f.calendars.create("Work", "u1", "UTC").await.unwrap();
        let (start, end) = (t(0), t(2));
        let slot = f.slots.create(cal.id, start, end, None).await.unwrap();

        // Shrink within its own interval: excluded from the overlap check
        let new_end = start + Duration::hours(1);
        let updated = f
            .slots
            .update(slot.id, start, new_end, SlotStatus::Available)
            .await
            .unwrap();
        assert_eq!(updated.end_time, new_end);
    }

    #[tokio::test]
    async fn update_conflicting_with_other_slot_is_rejected() {
        let f = fixture();
        let cal = f.calendars.create("Work", "u1", "UTC").await.unwrap();
        f.slots.create(cal.id, t(0), t(1), None).await.unwrap();
        let second = f.slots.create(cal.id, t(2), t(3), None).await.unwrap();

        let err = f
            .slots
            .update(second.id, t(0), t(1), SlotStatus::Available)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::TimeConflict { .. }));
    }

    #[tokio::test]
    async fn invalid_duration_is_rejected() {
        let f = fixture();
        let cal = f.calendars.create("Work", "u1", "UTC").await.unwrap();
        let start = t(0);

        let too_short = f
            .slots
            .create(cal.id, start, start + Duration::minutes(14), None)
            .await;
        assert!(matches!(too_short, Err(DomainError::InvalidArgument(_))));

        let too_long = f
            .slots
            .create(cal.id, start, start + Duration::minutes(481), None)
            .await;
        assert!(matches!(too_long, Err(DomainError::InvalidArgument(_))));

        assert!(f
            .slots
            .create(cal.id, start, start + Duration::minutes(15), None)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn delete_slot_with_meeting_is_invalid_state() {
        let f = fixture();
        let cal = f.calendars.create("Work", "u1", "UTC").await.unwrap();
        let slot = f.slots.create(cal.id, t(0), t(1), None).await.unwrap();

        let meeting = Meeting::new("Sync", None, vec![], slot.id);
        MeetingRepository::save(f.repos.as_ref(), meeting)
            .await
            .unwrap();

        let err = f.slots.delete(slot.id).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[tokio::test]
    async fn claim_and_release_roundtrip() {
        let f = fixture();
        let cal = f.calendars.create("Work", "u1", "UTC").await.unwrap();
        let slot = f.slots.create(cal.id, t(0), t(1), None).await.unwrap();

        assert!(f.slots.claim(slot.id).await.unwrap());
        assert_eq!(
            f.slots.get_by_id(slot.id).await.unwrap().status,
            SlotStatus::Busy
        );

        // Second claim loses
        assert!(!f.slots.claim(slot.id).await.unwrap());

        f.slots.release(slot.id).await.unwrap();
        assert_eq!(
            f.slots.get_by_id(slot.id).await.unwrap().status,
            SlotStatus::Available
        );
    }

    #[tokio::test]
    async fn mark_busy_is_idempotent() {
        let f = fixture();
        let cal = f.calendars.create("Work", "u1", "UTC").await.unwrap();
        let slot = f.slots.create(cal.id, t(0), t(1), None).await.unwrap();

        f.slots.mark_busy(slot.id).await.unwrap();
        f.slots.mark_busy(slot.id).await.unwrap();
        assert_eq!(
            f.slots.get_by_id(slot.id).await.unwrap().status,
            SlotStatus::Busy
        );
    }

    #[tokio::test]
    async fn available_slots_exclude_busy_and_out_of_range() {
        let f = fixture();
        let cal = f.calendars.create("Work", "u1", "UTC").await.unwrap();
        let inside = f.slots.create(cal.id, t(1), t(2), None).await.unwrap();
        let busy = f.slots.create(cal.id, t(3), t(4), None).await.unwrap();
        f.slots.mark_busy(busy.id).await.unwrap();
        f.slots.create(cal.id, t(50), t(51), None).await.unwrap();

        let found = f
            .slots
            .get_available_slots(cal.id, t(0), t(10))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, inside.id);
    }

    #[tokio::test]
    async fn availability_cache_is_invalidated_by_status_change() {
        let f = fixture();
        let cal = f.calendars.create("Work", "u1", "UTC").await.unwrap();
        let start = t(0);
        let end = t(10);
        let slot = f.slots.create(cal.id, start, t(1), None).await.unwrap();

        let before = f
            .slots
            .get_available_slots(cal.id, start, end)
            .await
            .unwrap();
        assert_eq!(before.len(), 1);

        f.slots.mark_busy(slot.id).await.unwrap();

        // The cached availability result must not survive the write
        let after = f
            .slots
            .get_available_slots(cal.id, start, end)
            .await
            .unwrap();
        assert!(after.is_empty());
    }

    #[tokio::test]
    async fn list_by_calendar_filters_by_calendar() {
        let f = fixture();
        let a = f.calendars.create("A", "u1", "UTC").await.unwrap();
        let b = f.calendars.create("B", "u1", "UTC").await.unwrap();
        f.slots.create(a.id, t(0), t(1), None).await.unwrap();
        f.slots.create(b.id, t(2), t(3), None).await.unwrap();

        let page = f.slots.list_by_calendar(a.id, 1, 20).await.unwrap();
        assert_eq!(page.total, 1);
        assert!(page.items.iter().all(|s| s.calendar_id == a.id));
    }

    #[tokio::test]
    async fn count_by_day_groups_by_start_date() {
        let f = fixture();
        let cal = f.calendars.create("Work", "u1", "UTC").await.unwrap();
        f.slots.create(cal.id, t(0), t(1), None).await.unwrap();
        f.slots.create(cal.id, t(2), t(3), None).await.unwrap();
        f.slots.create(cal.id, t(26), t(27), None).await.unwrap();

        let counts = f.slots.count_by_day(cal.id, t(-1), t(30)).await.unwrap();
        let total: u64 = counts.iter().map(|c| c.count).sum();
        assert_eq!(total, 3);
        assert!(counts.len() >= 2);
    }
}
