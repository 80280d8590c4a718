use super::models::CalendarEvent;
use crate::error::{config_error, BotResult};

/// Start hour of the daytime window. Events without a time of day are only
/// reported in a window starting here (all-day events are daytime-only).
pub const DAYTIME_START_HOUR: u32 = 6;

/// Half-open range of UTC hours `[start, end)` a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourWindow {
    start: u32,
    end: u32,
}

impl HourWindow {
    /// 6:00-24:00, the main events report
    pub const DAYTIME: HourWindow = HourWindow {
        start: DAYTIME_START_HOUR,
        end: 24,
    };

    /// 0:00-6:00, the early-hours reminders report
    pub const REMINDERS: HourWindow = HourWindow {
        start: 0,
        end: DAYTIME_START_HOUR,
    };

    /// Create a window, requiring `start < end <= 24`
    pub fn new(start: u32, end: u32) -> BotResult<Self> {
        if start >= end || end > 24 {
            return Err(config_error(&format!(
                "Invalid hour window {}-{}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        self.start <= hour && hour < self.end
    }

    /// Whether events without a time of day belong to this window
    pub fn includes_all_day(&self) -> bool {
        self.start == DAYTIME_START_HOUR
    }

    fn keeps(&self, event: &CalendarEvent) -> bool {
        match event.start().hour() {
            Some(hour) => self.contains_hour(hour),
            None => self.includes_all_day(),
        }
    }
}

/// Keep the events whose start hour falls inside `window`
pub fn filter_by_hour(events: Vec<CalendarEvent>, window: HourWindow) -> Vec<CalendarEvent> {
    events.into_iter().filter(|event| window.keeps(event)).collect()
}
