//! SeaORM implementation of MeetingRepository
//!
//! Participants live in their own table (element collection); every load
//! rehydrates the set, every update rewrites it as a whole.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::domain::meeting::{Meeting, MeetingRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{
    calendar, meeting, meeting_participant, time_slot,
};

use super::db_err;

pub struct SeaOrmMeetingRepository {
    db: DatabaseConnection,
}

impl SeaOrmMeetingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load_participants(&self, meeting_id: Uuid) -> DomainResult<Vec<String>> {
        let rows = meeting_participant::Entity::find()
            .filter(meeting_participant::Column::MeetingId.eq(meeting_id))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(|r| r.participant_id).collect())
    }

    async fn to_domain(&self, m: meeting::Model) -> DomainResult<Meeting> {
        let participants = self.load_participants(m.id).await?;
        Ok(Meeting {
            id: m.id,
            title: m.title,
            description: m.description,
            participants,
            time_slot_id: m.time_slot_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }

    async fn to_domain_many(&self, models: Vec<meeting::Model>) -> DomainResult<Vec<Meeting>> {
        let mut meetings = Vec::with_capacity(models.len());
        for m in models {
            meetings.push(self.to_domain(m).await?);
        }
        Ok(meetings)
    }

}

async fn write_participants<C: ConnectionTrait>(
    conn: &C,
    meeting_id: Uuid,
    participants: &[String],
) -> DomainResult<()> {
    meeting_participant::Entity::delete_many()
        .filter(meeting_participant::Column::MeetingId.eq(meeting_id))
        .exec(conn)
        .await
        .map_err(db_err)?;

    if participants.is_empty() {
        return Ok(());
    }
    let rows = participants.iter().map(|p| meeting_participant::ActiveModel {
        meeting_id: Set(meeting_id),
        participant_id: Set(p.clone()),
    });
    meeting_participant::Entity::insert_many(rows)
        .exec(conn)
        .await
        .map_err(db_err)?;
    Ok(())
}

fn to_active_model(m: &Meeting) -> meeting::ActiveModel {
    meeting::ActiveModel {
        id: Set(m.id),
        title: Set(m.title.clone()),
        description: Set(m.description.clone()),
        time_slot_id: Set(m.time_slot_id),
        created_at: Set(m.created_at),
        updated_at: Set(m.updated_at),
    }
}

// ── MeetingRepository impl ──────────────────────────────────────

#[async_trait]
impl MeetingRepository for SeaOrmMeetingRepository {
    async fn save(&self, m: Meeting) -> DomainResult<()> {
        debug!("Saving meeting: {}", m.id);

        // Row and participant set commit or roll back together
        let txn = self.db.begin().await.map_err(db_err)?;
        to_active_model(&m).insert(&txn).await.map_err(db_err)?;
        write_participants(&txn, m.id, &m.participants).await?;
        txn.commit().await.map_err(db_err)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Meeting>> {
        let model = meeting::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        match model {
            Some(m) => Ok(Some(self.to_domain(m).await?)),
            None => Ok(None),
        }
    }

    async fn update(&self, m: Meeting) -> DomainResult<()> {
        debug!("Updating meeting: {}", m.id);

        let existing = meeting::Entity::find_by_id(m.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::not_found("Meeting", m.id));
        }

        let txn = self.db.begin().await.map_err(db_err)?;
        to_active_model(&m).update(&txn).await.map_err(db_err)?;
        write_participants(&txn, m.id, &m.participants).await?;
        txn.commit().await.map_err(db_err)
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        debug!("Deleting meeting: {}", id);

        // Participant rows go with it via FK cascade
        let res = meeting::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if res.rows_affected == 0 {
            return Err(DomainError::not_found("Meeting", id));
        }
        Ok(())
    }

    async fn find_by_slot(&self, time_slot_id: Uuid) -> DomainResult<Option<Meeting>> {
        let model = meeting::Entity::find()
            .filter(meeting::Column::TimeSlotId.eq(time_slot_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        match model {
            Some(m) => Ok(Some(self.to_domain(m).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_participant_paged(
        &self,
        participant_id: &str,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<Meeting>, u64)> {
        let paginator = meeting::Entity::find()
            .join(JoinType::InnerJoin, meeting::Relation::Participants.def())
            .filter(meeting_participant::Column::ParticipantId.eq(participant_id))
            .order_by_asc(meeting::Column::CreatedAt)
            .paginate(&self.db, limit.max(1));

        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_err)?;
        Ok((self.to_domain_many(models).await?, total))
    }

    async fn find_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Meeting>> {
        let models = meeting::Entity::find()
            .join(JoinType::InnerJoin, meeting::Relation::TimeSlot.def())
            .filter(time_slot::Column::StartTime.gte(start))
            .filter(time_slot::Column::EndTime.lte(end))
            .order_by_asc(time_slot::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        self.to_domain_many(models).await
    }

    async fn find_by_participant_in_range(
        &self,
        participant_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Meeting>> {
        let models = meeting::Entity::find()
            .join(JoinType::InnerJoin, meeting::Relation::TimeSlot.def())
            .join(JoinType::InnerJoin, meeting::Relation::Participants.def())
            .filter(meeting_participant::Column::ParticipantId.eq(participant_id))
            .filter(time_slot::Column::StartTime.gte(start))
            .filter(time_slot::Column::EndTime.lte(end))
            .order_by_asc(time_slot::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        self.to_domain_many(models).await
    }

    async fn find_by_calendar_owner_paged(
        &self,
        user_id: &str,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<Meeting>, u64)> {
        let paginator = meeting::Entity::find()
            .join(JoinType::InnerJoin, meeting::Relation::TimeSlot.def())
            .join(JoinType::InnerJoin, time_slot::Relation::Calendar.def())
            .filter(calendar::Column::UserId.eq(user_id))
            .order_by_asc(time_slot::Column::StartTime)
            .paginate(&self.db, limit.max(1));

        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_err)?;
        Ok((self.to_domain_many(models).await?, total))
    }

    async fn count_by_participant(&self, participant_id: &str) -> DomainResult<u64> {
        meeting::Entity::find()
            .join(JoinType::InnerJoin, meeting::Relation::Participants.def())
            .filter(meeting_participant::Column::ParticipantId.eq(participant_id))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn find_by_title(&self, title: &str) -> DomainResult<Vec<Meeting>> {
        let models = meeting::Entity::find()
            .join(JoinType::InnerJoin, meeting::Relation::TimeSlot.def())
            .filter(meeting::Column::Title.contains(title))
            .order_by_asc(time_slot::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        self.to_domain_many(models).await
    }
}

// ── Tests ──────────────────────────────────────────────────────
