pub mod calendar;
pub mod meeting;
pub mod time_slot;

pub use calendar::CalendarService;
pub use meeting::MeetingService;
pub use time_slot::TimeSlotService;
