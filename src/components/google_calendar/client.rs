use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use super::models::{CalendarListEntry, CalendarListResponse, EventItem, EventsResponse};
use super::token::CredentialProvider;
use crate::error::{retrieval_error, BotResult};

/// Google Calendar v3 API root
pub const GOOGLE_CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";

/// The calendar provider the reporting pipeline reads from
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// List the calendars visible to the account
    async fn list_calendars(&self) -> BotResult<Vec<CalendarListEntry>>;

    /// List events starting at or after `not_before`, ordered by start time,
    /// with recurring events expanded into single occurrences
    async fn list_upcoming_events(
        &self,
        calendar_id: &str,
        not_before: DateTime<Utc>,
        max_results: u32,
    ) -> BotResult<Vec<EventItem>>;
}

/// REST client for the Google Calendar API
pub struct GoogleCalendarClient {
    client: Client,
    base_url: Url,
    credentials: Arc<dyn CredentialProvider>,
}

impl GoogleCalendarClient {
    pub fn new(credentials: Arc<dyn CredentialProvider>) -> BotResult<Self> {
        Self::with_base_url(GOOGLE_CALENDAR_API, credentials)
    }

    /// Create a client against another API root
    pub fn with_base_url(base_url: &str, credentials: Arc<dyn CredentialProvider>) -> BotResult<Self> {
        Ok(Self {
            client: Client::new(),
            base_url: Url::parse(base_url)?,
            credentials,
        })
    }

    /// Append path segments to the API root, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> BotResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| retrieval_error("Calendar API URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> BotResult<T> {
        let access_token = self.credentials.access_token().await?;

        debug!("GET {}", url.path());
        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| retrieval_error(&format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(retrieval_error(&format!(
                "HTTP {} - {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| retrieval_error(&format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendarClient {
    async fn list_calendars(&self) -> BotResult<Vec<CalendarListEntry>> {
        let mut calendars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.endpoint(&["users", "me", "calendarList"])?;
            if let Some(token) = &page_token {
                url.query_pairs_mut().append_pair("pageToken", token);
            }

            let page: CalendarListResponse = self.get_json(url).await?;
            calendars.extend(page.items);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!("Listed {} calendars", calendars.len());
        Ok(calendars)
    }

    async fn list_upcoming_events(
        &self,
        calendar_id: &str,
        not_before: DateTime<Utc>,
        max_results: u32,
    ) -> BotResult<Vec<EventItem>> {
        let mut url = self.endpoint(&["calendars", calendar_id, "events"])?;
        url.query_pairs_mut()
            .append_pair(
                "timeMin",
                &not_before.to_rfc3339_opts(SecondsFormat::Secs, true),
            )
            .append_pair("maxResults", &max_results.to_string())
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime");

        let response: EventsResponse = self.get_json(url).await?;
        Ok(response.items)
    }
}
