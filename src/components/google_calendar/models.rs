use serde::{Deserialize, Serialize};

use super::time::EventStart;

/// Label given to the account's primary calendar
pub const PRIMARY_LABEL: &str = "Paul";

/// Display name of the shared events calendar, also used as its label
pub const SHARED_CALENDAR_NAME: &str = "Eventos";

/// Calendar metadata as listed by the provider
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CalendarListEntry {
    pub id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub primary: bool,
}

/// A calendar selected for reporting, with the label shown in reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarRef {
    pub id: String,
    pub label: String,
}

impl CalendarRef {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Start of an event on the wire. Exactly one field is set by the provider.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EventDateTime {
    #[serde(rename = "dateTime", default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Event item as returned by the provider's event listing
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EventItem {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub start: EventDateTime,
}

/// Simplified calendar event representation, tagged with its source calendar
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start_date_time: Option<String>,
    pub start_date: Option<String>,
    pub calendar_label: String,
}

impl CalendarEvent {
    /// Build an event from a provider item, attaching the source label
    pub fn from_item(item: EventItem, calendar_label: &str) -> Self {
        Self {
            id: item.id,
            summary: item.summary,
            description: item.description,
            start_date_time: item.start.date_time,
            start_date: item.start.date,
            calendar_label: calendar_label.to_string(),
        }
    }

    /// Raw start value: the timestamp for timed events, the date for all-day events
    pub fn start_value(&self) -> Option<&str> {
        self.start_date_time
            .as_deref()
            .or(self.start_date.as_deref())
    }

    /// Parsed start
    pub fn start(&self) -> EventStart {
        EventStart::parse(self.start_date_time.as_deref(), self.start_date.as_deref())
    }
}

/// Wire format of `GET /users/me/calendarList`
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListResponse {
    #[serde(default)]
    pub items: Vec<CalendarListEntry>,
    pub next_page_token: Option<String>,
}

/// Wire format of `GET /calendars/{id}/events`
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventsResponse {
    #[serde(default)]
    pub items: Vec<EventItem>,
}
