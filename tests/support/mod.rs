#![allow(dead_code)]

use agendabot::agents::{ChatMessage, Handler, LanguageModel};
use agendabot::components::google_calendar::{
    CalendarListEntry, CalendarProvider, EventDateTime, EventItem,
};
use agendabot::error::{llm_error, retrieval_error, BotResult, Error};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::io;
use std::sync::Mutex;

/// In-memory calendar provider
#[derive(Debug, Default)]
pub struct MockCalendarProvider {
    calendars: Vec<CalendarListEntry>,
    events: HashMap<String, Vec<EventItem>>,
    failing_calendar: Option<String>,
    listing_failure: Option<String>,
    requests: Mutex<Vec<(String, u32)>>,
}

impl MockCalendarProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_calendar(mut self, id: &str, summary: &str, primary: bool, events: Vec<EventItem>) -> Self {
        self.calendars.push(CalendarListEntry {
            id: id.to_string(),
            summary: summary.to_string(),
            primary,
        });
        self.events.insert(id.to_string(), events);
        self
    }

    /// Make event listing fail for one calendar
    pub fn failing_on(mut self, id: &str) -> Self {
        self.failing_calendar = Some(id.to_string());
        self
    }

    /// Make calendar listing fail with a local I/O error, as a token store
    /// that cannot persist a refreshed token does
    pub fn failing_listing(mut self, reason: &str) -> Self {
        self.listing_failure = Some(reason.to_string());
        self
    }

    /// Calendar ids and max results of every event request, in call order
    pub fn requests(&self) -> Vec<(String, u32)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarProvider for MockCalendarProvider {
    async fn list_calendars(&self) -> BotResult<Vec<CalendarListEntry>> {
        if let Some(reason) = &self.listing_failure {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                reason.clone(),
            )));
        }
        Ok(self.calendars.clone())
    }

    async fn list_upcoming_events(
        &self,
        calendar_id: &str,
        _not_before: DateTime<Utc>,
        max_results: u32,
    ) -> BotResult<Vec<EventItem>> {
        self.requests
            .lock()
            .unwrap()
            .push((calendar_id.to_string(), max_results));

        if self.failing_calendar.as_deref() == Some(calendar_id) {
            return Err(retrieval_error("HTTP 403 Forbidden - quota exceeded"));
        }

        Ok(self.events.get(calendar_id).cloned().unwrap_or_default())
    }
}

/// Timed event item
pub fn timed(id: &str, date_time: &str, summary: &str) -> EventItem {
    EventItem {
        id: id.to_string(),
        summary: Some(summary.to_string()),
        description: None,
        start: EventDateTime {
            date_time: Some(date_time.to_string()),
            date: None,
        },
    }
}

/// All-day event item
pub fn all_day(id: &str, date: &str, summary: &str) -> EventItem {
    EventItem {
        id: id.to_string(),
        summary: Some(summary.to_string()),
        description: None,
        start: EventDateTime {
            date_time: None,
            date: Some(date.to_string()),
        },
    }
}

/// Language model answering with a fixed text, recording its prompts
#[derive(Debug)]
pub struct MockModel {
    answer: Result<String, String>,
    prompts: Mutex<Vec<(String, String)>>,
    histories: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockModel {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Ok(answer.to_string()),
            prompts: Mutex::new(Vec::new()),
            histories: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            answer: Err(reason.to_string()),
            prompts: Mutex::new(Vec::new()),
            histories: Mutex::new(Vec::new()),
        }
    }

    /// (preamble, prompt) pairs received so far
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }

    /// Earlier turns passed along with each prompt
    pub fn histories(&self) -> Vec<Vec<ChatMessage>> {
        self.histories.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    async fn chat(&self, preamble: &str, prompt: &str, history: &[ChatMessage]) -> BotResult<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((preamble.to_string(), prompt.to_string()));
        self.histories.lock().unwrap().push(history.to_vec());

        match &self.answer {
            Ok(answer) => Ok(answer.clone()),
            Err(reason) => Err(llm_error(reason)),
        }
    }
}

/// Handler replying with a fixed text
#[derive(Debug)]
pub struct EchoHandler {
    pub reply: String,
}

#[async_trait]
impl Handler for EchoHandler {
    fn name(&self) -> &'static str {
        "echo_agent"
    }

    async fn respond(&self, _history: &[ChatMessage]) -> BotResult<ChatMessage> {
        Ok(ChatMessage::assistant(self.reply.clone()))
    }
}
