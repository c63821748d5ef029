//! SeaORM implementation of TimeSlotRepository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use crate::domain::time_slot::{
    DailySlotCount, SlotStatus, TimeSlot, TimeSlotRepository,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{calendar, time_slot};

use super::db_err;

pub struct SeaOrmTimeSlotRepository {
    db: DatabaseConnection,
}

impl SeaOrmTimeSlotRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: time_slot::Model) -> TimeSlot {
    TimeSlot {
        id: m.id,
        calendar_id: m.calendar_id,
        start_time: m.start_time,
        end_time: m.end_time,
        status: SlotStatus::from_str(&m.status),
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn to_active_model(s: TimeSlot) -> time_slot::ActiveModel {
    time_slot::ActiveModel {
        id: Set(s.id),
        calendar_id: Set(s.calendar_id),
        start_time: Set(s.start_time),
        end_time: Set(s.end_time),
        status: Set(s.status.as_str().to_string()),
        created_at: Set(s.created_at),
        updated_at: Set(s.updated_at),
    }
}

/// Row shape of the per-day stats query
#[derive(Debug, FromQueryResult)]
struct DayCountRow {
    day: String,
    count: i64,
}

// ── TimeSlotRepository impl ─────────────────────────────────────

#[async_trait]
impl TimeSlotRepository for SeaOrmTimeSlotRepository {
    async fn save(&self, slot: TimeSlot) -> DomainResult<()> {
        debug!("Saving time slot: {}", slot.id);
        to_active_model(slot).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<TimeSlot>> {
        let model = time_slot::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn update(&self, slot: TimeSlot) -> DomainResult<()> {
        debug!("Updating time slot: {}", slot.id);

        let existing = time_slot::Entity::find_by_id(slot.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::not_found("TimeSlot", slot.id));
        }

        to_active_model(slot).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        debug!("Deleting time slot: {}", id);

        let res = time_slot::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if res.rows_affected == 0 {
            return Err(DomainError::not_found("TimeSlot", id));
        }
        Ok(())
    }

    async fn find_by_calendar_paged(
        &self,
        calendar_id: Uuid,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<TimeSlot>, u64)> {
        let paginator = time_slot::Entity::find()
            .filter(time_slot::Column::CalendarId.eq(calendar_id))
            .order_by_asc(time_slot::Column::StartTime)
            .paginate(&self.db, limit.max(1));

        let total = paginator.num_items().await.map_err(db_err)?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_err)?;
        Ok((items.into_iter().map(model_to_domain).collect(), total))
    }

    async fn find_by_calendar_in_range_paged(
        &self,
        calendar_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<TimeSlot>, u64)> {
        let paginator = time_slot::Entity::find()
            .filter(time_slot::Column::CalendarId.eq(calendar_id))
            .filter(time_slot::Column::StartTime.gte(start))
            .filter(time_slot::Column::EndTime.lte(end))
            .order_by_asc(time_slot::Column::StartTime)
            .paginate(&self.db, limit.max(1));

        let total = paginator.num_items().await.map_err(db_err)?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_err)?;
        Ok((items.into_iter().map(model_to_domain).collect(), total))
    }

    async fn find_available_in_range(
        &self,
        calendar_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<TimeSlot>> {
        let models = time_slot::Entity::find()
            .filter(time_slot::Column::CalendarId.eq(calendar_id))
            .filter(time_slot::Column::Status.eq(SlotStatus::Available.as_str()))
            .filter(time_slot::Column::StartTime.gte(start))
            .filter(time_slot::Column::EndTime.lte(end))
            .order_by_asc(time_slot::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn exists_overlapping(
        &self,
        calendar_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_id: Option<Uuid>,
    ) -> DomainResult<bool> {
        // Half-open intervals: s.start < end AND s.end > start
        let mut query = time_slot::Entity::find()
            .filter(time_slot::Column::CalendarId.eq(calendar_id))
            .filter(time_slot::Column::StartTime.lt(end))
            .filter(time_slot::Column::EndTime.gt(start));

        if let Some(exclude) = exclude_id {
            query = query.filter(time_slot::Column::Id.ne(exclude));
        }

        let count = query.count(&self.db).await.map_err(db_err)?;
        Ok(count > 0)
    }

    async fn find_busy_by_users(
        &self,
        user_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<TimeSlot>> {
        let models = time_slot::Entity::find()
            .join(JoinType::InnerJoin, time_slot::Relation::Calendar.def())
            .filter(calendar::Column::UserId.is_in(user_ids.iter().map(String::as_str)))
            .filter(time_slot::Column::Status.eq(SlotStatus::Busy.as_str()))
            .filter(time_slot::Column::StartTime.gte(start))
            .filter(time_slot::Column::EndTime.lte(end))
            .order_by_asc(time_slot::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn claim(&self, id: Uuid) -> DomainResult<bool> {
        // Conditional AVAILABLE -> BUSY flip; rows_affected tells whether
        // this call won the slot. Concurrent contenders observe 0 rows.
        let res = time_slot::Entity::update_many()
            .col_expr(
                time_slot::Column::Status,
                Expr::value(SlotStatus::Busy.as_str()),
            )
            .col_expr(time_slot::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(time_slot::Column::Id.eq(id))
            .filter(time_slot::Column::Status.eq(SlotStatus::Available.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(res.rows_affected == 1)
    }

    async fn set_status(&self, id: Uuid, status: SlotStatus) -> DomainResult<()> {
        let res = time_slot::Entity::update_many()
            .col_expr(time_slot::Column::Status, Expr::value(status.as_str()))
            .col_expr(time_slot::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(time_slot::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if res.rows_affected == 0 {
            return Err(DomainError::not_found("TimeSlot", id));
        }
        Ok(())
    }

    async fn count_by_day(
        &self,
        calendar_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<DailySlotCount>> {
        let rows: Vec<DayCountRow> = time_slot::Entity::find()
            .select_only()
            .column_as(Expr::cust("DATE(start_time)"), "day")
            .column_as(time_slot::Column::Id.count(), "count")
            .filter(time_slot::Column::CalendarId.eq(calendar_id))
            .filter(time_slot::Column::StartTime.gte(start))
            .filter(time_slot::Column::EndTime.lte(end))
            .group_by(Expr::cust("DATE(start_time)"))
            .order_by_asc(Expr::cust("DATE(start_time)"))
            .into_model::<DayCountRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        rows.into_iter()
            .map(|row| {
                let date = NaiveDate::parse_from_str(&row.day, "%Y-%m-%d")
                    .map_err(|e| DomainError::Database(format!("Bad date from DB: {}", e)))?;
                Ok(DailySlotCount {
                    date,
                    count: row.count.max(0) as u64,
                })
            })
            .collect()
    }
}
