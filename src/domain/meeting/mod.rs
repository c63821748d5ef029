//! Meeting aggregate
//!
//! Contains the Meeting entity, participant set semantics and repository
//! interface.

pub mod model;
pub mod repository;

pub use model::Meeting;
pub use repository::MeetingRepository;
