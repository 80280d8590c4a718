use chrono::{DateTime, Utc};
use tracing::debug;

use super::client::CalendarProvider;
use super::models::{CalendarEvent, CalendarRef};
use crate::error::{retrieval_error, BotResult, Error};

/// Events fetched per calendar for the daytime report
pub const EVENTS_MAX_RESULTS: u32 = 200;

/// Events fetched per calendar for the reminders report
pub const REMINDERS_MAX_RESULTS: u32 = 100;

/// Fetch upcoming events of one calendar, tagged with its label.
///
/// Order is the provider's start-time order; at most `max_results` events are
/// returned. Failures surface as retrieval errors and are not retried.
pub async fn fetch_events(
    provider: &dyn CalendarProvider,
    calendar: &CalendarRef,
    now: DateTime<Utc>,
    max_results: u32,
) -> BotResult<Vec<CalendarEvent>> {
    let items = provider
        .list_upcoming_events(&calendar.id, now, max_results)
        .await
        .map_err(|e| match e {
            Error::Retrieval(_) => e,
            other => retrieval_error(&format!(
                "Failed to fetch events for {}: {}",
                calendar.label, other
            )),
        })?;

    let events: Vec<CalendarEvent> = items
        .into_iter()
        .take(max_results as usize)
        .map(|item| CalendarEvent::from_item(item, &calendar.label))
        .collect();

    debug!("Fetched {} events from {}", events.len(), calendar.label);
    Ok(events)
}
