//! TimeSlot aggregate
//!
//! Contains the TimeSlot entity, status lifecycle, interval rules and
//! repository interface.

pub mod model;
pub mod repository;

pub use model::{DailySlotCount, SlotStatus, TimeSlot, MAX_SLOT_MINUTES, MIN_SLOT_MINUTES};
pub use repository::TimeSlotRepository;
