use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info};

use super::client::CalendarProvider;
use super::fetcher::{fetch_events, EVENTS_MAX_RESULTS, REMINDERS_MAX_RESULTS};
use super::filter::{filter_by_hour, HourWindow};
use super::models::{CalendarEvent, CalendarRef};
use super::render::render;
use super::resolver::{resolve_with, CalendarSelection};
use crate::error::{retrieval_error, BotResult, Error};

/// The two reports the calendar capability offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Daytime events, 6:00-24:00
    Events,
    /// Early-hours items, 0:00-6:00
    Reminders,
}

impl ReportKind {
    pub fn window(&self) -> HourWindow {
        match self {
            ReportKind::Events => HourWindow::DAYTIME,
            ReportKind::Reminders => HourWindow::REMINDERS,
        }
    }

    pub fn max_results(&self) -> u32 {
        match self {
            ReportKind::Events => EVENTS_MAX_RESULTS,
            ReportKind::Reminders => REMINDERS_MAX_RESULTS,
        }
    }

    pub fn header(&self) -> &'static str {
        match self {
            ReportKind::Events => "Tus próximos eventos:",
            ReportKind::Reminders => "Tus recordatorios de madrugada:",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            ReportKind::Events => "No tienes eventos próximos.",
            ReportKind::Reminders => "No tienes recordatorios de madrugada.",
        }
    }
}

/// Calendar reporting pipeline: resolve, fetch, filter, render
pub struct CalendarService {
    provider: Arc<dyn CalendarProvider>,
    selection: CalendarSelection,
    concurrent_fetch: bool,
}

impl CalendarService {
    pub fn new(provider: Arc<dyn CalendarProvider>) -> Self {
        Self {
            provider,
            selection: CalendarSelection::default(),
            concurrent_fetch: false,
        }
    }

    /// Use another calendar selection
    pub fn with_selection(mut self, selection: CalendarSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Fetch the selected calendars concurrently instead of one after another
    pub fn with_concurrent_fetch(mut self, enabled: bool) -> Self {
        self.concurrent_fetch = enabled;
        self
    }

    /// Daytime report across all selected calendars
    pub async fn get_events(&self) -> BotResult<String> {
        self.report_at(ReportKind::Events, Utc::now()).await
    }

    /// Early-hours report across all selected calendars
    pub async fn get_reminders(&self) -> BotResult<String> {
        self.report_at(ReportKind::Reminders, Utc::now()).await
    }

    /// Build a report as of `now`
    pub async fn report_at(&self, kind: ReportKind, now: DateTime<Utc>) -> BotResult<String> {
        let events = self.collect(now, kind.max_results()).await?;
        let window = kind.window();
        let events = filter_by_hour(events, window);
        info!(
            "{:?} report ({}:00-{}:00): {} events",
            kind,
            window.start(),
            window.end(),
            events.len()
        );

        Ok(render(&events, kind.empty_message(), kind.header()))
    }

    /// Resolve the calendars and fetch their upcoming events, concatenated in
    /// calendar order. No matching calendar yields an empty batch.
    pub async fn collect(&self, now: DateTime<Utc>, max_results: u32) -> BotResult<Vec<CalendarEvent>> {
        let calendars = self
            .provider
            .list_calendars()
            .await
            .map_err(|e| match e {
                Error::Retrieval(_) => e,
                other => retrieval_error(&format!("Failed to list calendars: {}", other)),
            })?;
        let selected = match resolve_with(&calendars, &self.selection) {
            Ok(selected) => selected,
            Err(Error::NoMatchingCalendars) => {
                info!("No calendars matched the selection, nothing to report");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let batches = if self.concurrent_fetch {
            debug!("Fetching {} calendars concurrently", selected.len());
            try_join_all(
                selected
                    .iter()
                    .map(|calendar| self.fetch(calendar, now, max_results)),
            )
            .await?
        } else {
            let mut batches = Vec::with_capacity(selected.len());
            for calendar in &selected {
                batches.push(self.fetch(calendar, now, max_results).await?);
            }
            batches
        };

        Ok(batches.into_iter().flatten().collect())
    }

    async fn fetch(
        &self,
        calendar: &CalendarRef,
        now: DateTime<Utc>,
        max_results: u32,
    ) -> BotResult<Vec<CalendarEvent>> {
        fetch_events(self.provider.as_ref(), calendar, now, max_results).await
    }
}
