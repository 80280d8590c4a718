use serde::{Deserialize, Serialize};
use tracing::debug;

use super::models::{CalendarListEntry, CalendarRef, PRIMARY_LABEL, SHARED_CALENDAR_NAME};
use crate::error::{BotResult, Error};

/// Which calendars are reported and how they are labeled
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CalendarSelection {
    /// Label for the primary calendar
    pub primary_label: String,
    /// Exact display name of the shared calendar, also used as its label
    pub shared_calendar_name: String,
}

impl Default for CalendarSelection {
    fn default() -> Self {
        Self {
            primary_label: PRIMARY_LABEL.to_string(),
            shared_calendar_name: SHARED_CALENDAR_NAME.to_string(),
        }
    }
}

/// Select the calendars to report with the default selection
pub fn resolve(calendars: &[CalendarListEntry]) -> BotResult<Vec<CalendarRef>> {
    resolve_with(calendars, &CalendarSelection::default())
}

/// Select the primary calendar and any calendar named exactly like the shared
/// calendar, keeping the provider's listing order.
pub fn resolve_with(
    calendars: &[CalendarListEntry],
    selection: &CalendarSelection,
) -> BotResult<Vec<CalendarRef>> {
    let selected: Vec<CalendarRef> = calendars
        .iter()
        .filter_map(|calendar| {
            if calendar.primary {
                Some(CalendarRef::new(&calendar.id, &selection.primary_label))
            } else if calendar.summary == selection.shared_calendar_name {
                Some(CalendarRef::new(&calendar.id, &selection.shared_calendar_name))
            } else {
                None
            }
        })
        .collect();

    debug!(
        "Resolved {} of {} calendars",
        selected.len(),
        calendars.len()
    );

    if selected.is_empty() {
        return Err(Error::NoMatchingCalendars);
    }

    Ok(selected)
}
