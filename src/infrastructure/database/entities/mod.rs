//! Database entities module

pub mod calendar;
pub mod meeting;
pub mod meeting_participant;
pub mod time_slot;

pub use calendar::Entity as Calendar;
pub use meeting::Entity as Meeting;
pub use meeting_participant::Entity as MeetingParticipant;
pub use time_slot::Entity as TimeSlot;
