//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_calendars;
mod m20240301_000002_create_time_slots;
mod m20240301_000003_create_meetings;
mod m20240301_000004_create_meeting_participants;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_calendars::Migration),
            Box::new(m20240301_000002_create_time_slots::Migration),
            Box::new(m20240301_000003_create_meetings::Migration),
            Box::new(m20240301_000004_create_meeting_participants::Migration),
        ]
    }
}
