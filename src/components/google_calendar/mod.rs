pub mod client;
pub mod fetcher;
pub mod filter;
pub mod models;
pub mod render;
pub mod resolver;
pub mod service;
mod time;
pub mod token;

pub use client::{CalendarProvider, GoogleCalendarClient};
pub use filter::{filter_by_hour, HourWindow};
pub use models::{CalendarEvent, CalendarListEntry, CalendarRef, EventDateTime, EventItem};
pub use render::render;
pub use resolver::{resolve, resolve_with, CalendarSelection};
pub use service::{CalendarService, ReportKind};
pub use time::EventStart;
pub use token::{CredentialProvider, FileTokenStore, StaticCredentials, StoredToken};
