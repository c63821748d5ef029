pub mod calendars;
pub mod health;
pub mod meetings;
pub mod time_slots;
