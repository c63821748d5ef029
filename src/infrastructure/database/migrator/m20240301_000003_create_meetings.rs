//! Create meetings table
//!
//! A meeting binds exactly one time slot; the unique index on
//! time_slot_id enforces the one-to-one relation at the schema level.

use sea_orm_migration::prelude::*;

use super::m20240301_000002_create_time_slots::TimeSlots;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Meetings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Meetings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Meetings::Title).string().not_null())
                    .col(ColumnDef::new(Meetings::Description).text())
                    .col(ColumnDef::new(Meetings::TimeSlotId).uuid().not_null())
                    .col(
                        ColumnDef::new(Meetings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Meetings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meetings_time_slot")
                            .from(Meetings::Table, Meetings::TimeSlotId)
                            .to(TimeSlots::Table, TimeSlots::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_meetings_time_slot")
                    .table(Meetings::Table)
                    .col(Meetings::TimeSlotId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_meetings_created_at")
                    .table(Meetings::Table)
                    .col(Meetings::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Meetings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Meetings {
    Table,
    Id,
    Title,
    Description,
    TimeSlotId,
    CreatedAt,
    UpdatedAt,
}
