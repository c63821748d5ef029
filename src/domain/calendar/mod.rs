//! Calendar aggregate
//!
//! Contains the Calendar entity and repository interface.

pub mod model;
pub mod repository;

pub use model::Calendar;
pub use repository::CalendarRepository;
