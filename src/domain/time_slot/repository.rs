//! TimeSlot repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::model::{DailySlotCount, SlotStatus, TimeSlot};
use crate::domain::DomainResult;

#[async_trait]
pub trait TimeSlotRepository: Send + Sync {
    /// Persist a new time slot
    async fn save(&self, slot: TimeSlot) -> DomainResult<()>;

    /// Find slot by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<TimeSlot>>;

    /// Update an existing slot
    async fn update(&self, slot: TimeSlot) -> DomainResult<()>;

    /// Delete a slot by ID
    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    /// Page of slots belonging to a calendar, ordered by start time
    async fn find_by_calendar_paged(
        &self,
        calendar_id: Uuid,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<TimeSlot>, u64)>;

    /// Page of slots of a calendar whose interval lies fully within
    /// `[start, end]`, ordered by start time
    async fn find_by_calendar_in_range_paged(
        &self,
        calendar_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<TimeSlot>, u64)>;

    /// AVAILABLE slots of a calendar fully within `[start, end]`,
    /// ordered by start time
    async fn find_available_in_range(
        &self,
        calendar_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<TimeSlot>>;

    /// Whether any other slot of the calendar intersects `[start, end)`.
    /// `exclude_id` omits one slot from the check (update-in-place).
    async fn exists_overlapping(
        &self,
        calendar_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_id: Option<Uuid>,
    ) -> DomainResult<bool>;

    /// BUSY slots of calendars owned by any of the given users, fully
    /// within `[start, end]`, ordered by start time
    async fn find_busy_by_users(
        &self,
        user_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<TimeSlot>>;

    /// Atomic AVAILABLE → BUSY transition. Returns `true` when this call
    /// performed the flip; `false` when the slot was not AVAILABLE.
    /// This is the serialization point for meeting scheduling: of two
    /// concurrent claims on one slot exactly one observes `true`.
    async fn claim(&self, id: Uuid) -> DomainResult<bool>;

    /// Unconditional status setter (used by release and the idempotent
    /// mark-busy / mark-available operations). Fails with NotFound when
    /// the slot does not exist.
    async fn set_status(&self, id: Uuid, status: SlotStatus) -> DomainResult<()>;

    /// Per-day slot counts for a calendar within `[start, end]`
    async fn count_by_day(
        &self,
        calendar_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<DailySlotCount>>;
}
