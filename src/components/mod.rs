// Export components
pub mod google_calendar;

// Re-export the calendar service
pub use google_calendar::CalendarService;
