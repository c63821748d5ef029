//! Calendar business logic service

use std::sync::Arc;

use log::{debug, info};
use uuid::Uuid;

use crate::domain::{Calendar, DomainError, DomainResult, RepositoryProvider};
use crate::infrastructure::ServiceCache;
use crate::shared::PaginatedResult;

/// Owns calendar CRUD and the per-user name uniqueness rule.
pub struct CalendarService {
    repos: Arc<dyn RepositoryProvider>,
    cache: Arc<ServiceCache>,
}

impl CalendarService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, cache: Arc<ServiceCache>) -> Self {
        Self { repos, cache }
    }

    pub async fn create(
        &self,
        name: &str,
        user_id: &str,
        timezone: &str,
    ) -> DomainResult<Calendar> {
        debug!("Creating calendar '{}' for user {}", name, user_id);

        if self
            .repos
            .calendars()
            .exists_by_user_and_name(user_id, name)
            .await?
        {
            return Err(DomainError::DuplicateCalendar {
                user_id: user_id.to_string(),
                name: name.to_string(),
            });
        }

        let calendar = Calendar::new(name, user_id, timezone);
        self.repos.calendars().save(calendar.clone()).await?;
        info!("Created calendar {} for user {}", calendar.id, user_id);
        Ok(calendar)
    }

    /// Read-through cached by id
    pub async fn get_by_id(&self, id: Uuid) -> DomainResult<Calendar> {
        if let Some(cached) = self.cache.get_calendar(id) {
            return Ok(cached);
        }
        let calendar = self
            .repos
            .calendars()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Calendar", id))?;
        self.cache.put_calendar(calendar.clone());
        Ok(calendar)
    }

    pub async fn get_by_id_and_user(&self, id: Uuid, user_id: &str) -> DomainResult<Calendar> {
        self.repos
            .calendars()
            .find_by_id_and_user(id, user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Calendar", id))
    }

    pub async fn list_by_user(&self, user_id: &str) -> DomainResult<Vec<Calendar>> {
        self.repos.calendars().find_by_user(user_id).await
    }

    pub async fn list_by_user_paged(
        &self,
        user_id: &str,
        page: u64,
        limit: u64,
    ) -> DomainResult<PaginatedResult<Calendar>> {
        let (items, total) = self
            .repos
            .calendars()
            .find_by_user_paged(user_id, page, limit)
            .await?;
        Ok(PaginatedResult::new(items, total, page, limit))
    }

    /// Update name and timezone. The name uniqueness rule is re-checked
    /// only when the name actually changed; the timezone is always
    /// overwritten.
    pub async fn update(&self, id: Uuid, name: &str, timezone: &str) -> DomainResult<Calendar> {
        debug!("Updating calendar {}", id);

        let mut calendar = self.get_by_id(id).await?;

        if name != calendar.name
            && self
                .repos
                .calendars()
                .exists_by_user_and_name(&calendar.user_id, name)
                .await?
        {
            return Err(DomainError::DuplicateCalendar {
                user_id: calendar.user_id.clone(),
                name: name.to_string(),
            });
        }

        calendar.apply_update(name, timezone);
        self.repos.calendars().update(calendar.clone()).await?;
        self.cache.invalidate_calendar(id);
        info!("Updated calendar {}", id);
        Ok(calendar)
    }

    /// Delete a calendar together with its slots and their meetings.
    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        debug!("Deleting calendar {}", id);

        // NotFound surfaces before the cascade
        self.get_by_id(id).await?;
        self.repos.calendars().delete(id).await?;
        self.cache.invalidate_calendar_tree(id);
        info!("Deleted calendar {}", id);
        Ok(())
    }

    pub async fn exists_by_user_and_name(&self, user_id: &str, name: &str) -> DomainResult<bool> {
        self.repos
            .calendars()
            .exists_by_user_and_name(user_id, name)
            .await
    }

    pub async fn count_by_user(&self, user_id: &str) -> DomainResult<u64> {
        self.repos.calendars().count_by_user(user_id).await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryRepositories;

    fn service() -> CalendarService {
        CalendarService::new(
            Arc::new(InMemoryRepositories::new()),
            Arc::new(ServiceCache::new()),
        )
    }

    #[tokio::test]
    async fn create_and_fetch_roundtrip() {
        let svc = service();
        let created = svc.create("Work", "u1", "UTC").await.unwrap();
        let fetched = svc.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn duplicate_name_for_same_user_is_rejected() {
        let svc = service();
        svc.create("Work", "u1", "UTC").await.unwrap();

        let err = svc.create("Work", "u1", "UTC").await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateCalendar { .. }));

        // Same name under another user is fine
        assert!(svc.create("Work", "u2", "UTC").await.is_ok());
    }

    #[tokio::test]
    async fn get_missing_calendar_is_not_found() {
        let svc = service();
        let err = svc.get_by_id(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_rechecks_uniqueness_only_on_name_change() {
        let svc = service();
        let a = svc.create("Work", "u1", "UTC").await.unwrap();
        svc.create("Personal", "u1", "UTC").await.unwrap();

        // Same name, new timezone: no conflict even though "Work" exists
        let updated = svc.update(a.id, "Work", "Europe/Berlin").await.unwrap();
        assert_eq!(updated.timezone, "Europe/Berlin");

        // Renaming onto the other calendar's name conflicts
        let err = svc.update(a.id, "Personal", "UTC").await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateCalendar { .. }));
    }

    #[tokio::test]
    async fn update_reflects_after_cache_hit() {
        let svc = service();
        let c = svc.create("Work", "u1", "UTC").await.unwrap();

        // Warm the cache, then update; the stale entry must be gone
        svc.get_by_id(c.id).await.unwrap();
        svc.update(c.id, "Renamed", "UTC").await.unwrap();
        assert_eq!(svc.get_by_id(c.id).await.unwrap().name, "Renamed");
    }

    #[tokio::test]
    async fn list_and_count_by_user() {
        let svc = service();
        svc.create("B", "u1", "UTC").await.unwrap();
        svc.create("A", "u1", "UTC").await.unwrap();
        svc.create("C", "u2", "UTC").await.unwrap();

        let list = svc.list_by_user("u1").await.unwrap();
        assert_eq!(
            list.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["A", "B"]
        );
        assert_eq!(svc.count_by_user("u1").await.unwrap(), 2);

        let page = svc.list_by_user_paged("u1", 1, 1).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn delete_missing_calendar_is_not_found() {
        let svc = service();
        let err = svc.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
