//! Core domain: entities, repository interfaces and the error taxonomy

pub mod calendar;
pub mod error;
pub mod meeting;
pub mod repositories;
pub mod time_slot;

// Re-export commonly used types
pub use calendar::{Calendar, CalendarRepository};
pub use error::{DomainError, DomainResult};
pub use meeting::{Meeting, MeetingRepository};
pub use repositories::RepositoryProvider;
pub use time_slot::{DailySlotCount, SlotStatus, TimeSlot, TimeSlotRepository};
