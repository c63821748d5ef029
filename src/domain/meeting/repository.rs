//! Meeting repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::model::Meeting;
use crate::domain::DomainResult;

#[async_trait]
pub trait MeetingRepository: Send + Sync {
    /// Persist a new meeting, including its participant set
    async fn save(&self, meeting: Meeting) -> DomainResult<()>;

    /// Find meeting by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Meeting>>;

    /// Update title/description and rewrite the participant set
    async fn update(&self, meeting: Meeting) -> DomainResult<()>;

    /// Delete a meeting by ID
    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    /// The meeting bound to a slot, if any (at most one)
    async fn find_by_slot(&self, time_slot_id: Uuid) -> DomainResult<Option<Meeting>>;

    /// Page of meetings a participant is part of
    async fn find_by_participant_paged(
        &self,
        participant_id: &str,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<Meeting>, u64)>;

    /// Meetings whose slot lies fully within `[start, end]`,
    /// ordered by slot start time
    async fn find_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Meeting>>;

    /// Range query additionally filtered by participant membership
    async fn find_by_participant_in_range(
        &self,
        participant_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Meeting>>;

    /// Page of meetings whose slot belongs to a calendar owned by the
    /// user, ordered by slot start time
    async fn find_by_calendar_owner_paged(
        &self,
        user_id: &str,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<Meeting>, u64)>;

    /// Number of meetings a participant is part of
    async fn count_by_participant(&self, participant_id: &str) -> DomainResult<u64>;

    /// Meetings whose title contains the given substring,
    /// ordered by slot start time
    async fn find_by_title(&self, title: &str) -> DomainResult<Vec<Meeting>>;
}
