pub mod services;

pub use services::{CalendarService, MeetingService, TimeSlotService};
