//! Calendar repository interface

use async_trait::async_trait;
use uuid::Uuid;

use super::model::Calendar;
use crate::domain::DomainResult;

#[async_trait]
pub trait CalendarRepository: Send + Sync {
    /// Persist a new calendar
    async fn save(&self, calendar: Calendar) -> DomainResult<()>;

    /// Find calendar by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Calendar>>;

    /// Find calendar by ID scoped to its owning user
    async fn find_by_id_and_user(&self, id: Uuid, user_id: &str) -> DomainResult<Option<Calendar>>;

    /// All calendars owned by a user, ordered by name
    async fn find_by_user(&self, user_id: &str) -> DomainResult<Vec<Calendar>>;

    /// Page of calendars owned by a user; returns (items, total count)
    async fn find_by_user_paged(
        &self,
        user_id: &str,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<Calendar>, u64)>;

    /// Update an existing calendar
    async fn update(&self, calendar: Calendar) -> DomainResult<()>;

    /// Delete a calendar, cascading to its time slots and their meetings
    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    /// Whether the user already has a calendar with the exact name
    async fn exists_by_user_and_name(&self, user_id: &str, name: &str) -> DomainResult<bool>;

    /// Number of calendars owned by a user
    async fn count_by_user(&self, user_id: &str) -> DomainResult<u64>;
}
