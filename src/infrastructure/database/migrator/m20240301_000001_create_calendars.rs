//! Create calendars table
//!
//! One calendar per (user_id, name) pair, enforced by a unique index.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Calendars::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Calendars::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Calendars::Name).string().not_null())
                    .col(ColumnDef::new(Calendars::UserId).string().not_null())
                    .col(ColumnDef::new(Calendars::Timezone).string().not_null())
                    .col(
                        ColumnDef::new(Calendars::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Calendars::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_calendars_user")
                    .table(Calendars::Table)
                    .col(Calendars::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_calendars_user_name")
                    .table(Calendars::Table)
                    .col(Calendars::UserId)
                    .col(Calendars::Name)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Calendars::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Calendars {
    Table,
    Id,
    Name,
    UserId,
    Timezone,
    CreatedAt,
    UpdatedAt,
}
