//! SeaORM repository implementations

pub mod calendar_repository;
pub mod meeting_repository;
pub mod repository_provider;
pub mod time_slot_repository;

pub use calendar_repository::SeaOrmCalendarRepository;
pub use meeting_repository::SeaOrmMeetingRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use time_slot_repository::SeaOrmTimeSlotRepository;

use crate::domain::DomainError;

pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}
