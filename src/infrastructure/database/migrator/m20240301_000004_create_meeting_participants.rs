//! Create meeting_participants table
//!
//! Element collection of participant ids per meeting; removed with the
//! meeting (FK cascade).

use sea_orm_migration::prelude::*;

use super::m20240301_000003_create_meetings::Meetings;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MeetingParticipants::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MeetingParticipants::MeetingId).uuid().not_null())
                    .col(
                        ColumnDef::new(MeetingParticipants::ParticipantId)
                            .string()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(MeetingParticipants::MeetingId)
                            .col(MeetingParticipants::ParticipantId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meeting_participants_meeting")
                            .from(MeetingParticipants::Table, MeetingParticipants::MeetingId)
                            .to(Meetings::Table, Meetings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_meeting_participants_participant")
                    .table(MeetingParticipants::Table)
                    .col(MeetingParticipants::ParticipantId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MeetingParticipants::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum MeetingParticipants {
    Table,
    MeetingId,
    ParticipantId,
}
