//! SeaORM implementation of CalendarRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::calendar::{Calendar, CalendarRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::calendar;

use super::db_err;

pub struct SeaOrmCalendarRepository {
    db: DatabaseConnection,
}

impl SeaOrmCalendarRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: calendar::Model) -> Calendar {
    Calendar {
        id: m.id,
        name: m.name,
        user_id: m.user_id,
        timezone: m.timezone,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn to_active_model(c: Calendar) -> calendar::ActiveModel {
    calendar::ActiveModel {
        id: Set(c.id),
        name: Set(c.name),
        user_id: Set(c.user_id),
        timezone: Set(c.timezone),
        created_at: Set(c.created_at),
        updated_at: Set(c.updated_at),
    }
}

// ── CalendarRepository impl ─────────────────────────────────────

#[async_trait]
impl CalendarRepository for SeaOrmCalendarRepository {
    async fn save(&self, calendar: Calendar) -> DomainResult<()> {
        debug!("Saving calendar: {}", calendar.id);
        to_active_model(calendar)
            .insert(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Calendar>> {
        let model = calendar::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_id_and_user(&self, id: Uuid, user_id: &str) -> DomainResult<Option<Calendar>> {
        let model = calendar::Entity::find_by_id(id)
            .filter(calendar::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_user(&self, user_id: &str) -> DomainResult<Vec<Calendar>> {
        let models = calendar::Entity::find()
            .filter(calendar::Column::UserId.eq(user_id))
            .order_by_asc(calendar::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_user_paged(
        &self,
        user_id: &str,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<Calendar>, u64)> {
        let paginator = calendar::Entity::find()
            .filter(calendar::Column::UserId.eq(user_id))
            .order_by_asc(calendar::Column::Name)
            .paginate(&self.db, limit.max(1));

        let total = paginator.num_items().await.map_err(db_err)?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_err)?;
        Ok((items.into_iter().map(model_to_domain).collect(), total))
    }

    async fn update(&self, calendar: Calendar) -> DomainResult<()> {
        debug!("Updating calendar: {}", calendar.id);

        let existing = calendar::Entity::find_by_id(calendar.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::not_found("Calendar", calendar.id));
        }

        to_active_model(calendar)
            .update(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        debug!("Deleting calendar: {}", id);

        // Slots and meetings go with it via FK cascade
        let res = calendar::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if res.rows_affected == 0 {
            return Err(DomainError::not_found("Calendar", id));
        }
        Ok(())
    }

    async fn exists_by_user_and_name(&self, user_id: &str, name: &str) -> DomainResult<bool> {
        let count = calendar::Entity::find()
            .filter(calendar::Column::UserId.eq(user_id))
            .filter(calendar::Column::Name.eq(name))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn count_by_user(&self, user_id: &str) -> DomainResult<u64> {
        calendar::Entity::find()
            .filter(calendar::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
