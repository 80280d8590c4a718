use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use tracing::warn;

/// `dateTime` without a UTC offset
const LOCAL_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parsed start of a calendar event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStart {
    /// Concrete instant, normalized to UTC
    Timed(DateTime<Utc>),
    /// Date-only (all-day) event
    AllDay(NaiveDate),
    /// Missing or unreadable start
    Unknown,
}

impl EventStart {
    /// Parse the provider's `dateTime` / `date` pair. `dateTime` wins when both are set.
    pub fn parse(date_time: Option<&str>, date: Option<&str>) -> Self {
        if let Some(date_time) = date_time {
            if let Ok(dt) = DateTime::parse_from_rfc3339(date_time) {
                return EventStart::Timed(dt.with_timezone(&Utc));
            }

            // No offset: read as UTC
            return match NaiveDateTime::parse_from_str(date_time, LOCAL_DATE_TIME_FORMAT) {
                Ok(dt) => EventStart::Timed(dt.and_utc()),
                Err(e) => {
                    warn!("Failed to parse event start '{}': {}", date_time, e);
                    EventStart::Unknown
                }
            };
        }

        if let Some(date) = date {
            return match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
                Ok(date) => EventStart::AllDay(date),
                Err(e) => {
                    warn!("Failed to parse event date '{}': {}", date, e);
                    EventStart::Unknown
                }
            };
        }

        EventStart::Unknown
    }

    /// UTC hour of day for timed events
    pub fn hour(&self) -> Option<u32> {
        match self {
            EventStart::Timed(dt) => Some(dt.hour()),
            _ => None,
        }
    }

    /// Comparable key. All-day events sort at midnight UTC of their date,
    /// unknown starts sort before everything else.
    pub fn sort_key(&self) -> Option<DateTime<Utc>> {
        match self {
            EventStart::Timed(dt) => Some(*dt),
            EventStart::AllDay(date) => date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()),
            EventStart::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timed_start_normalizes_to_utc() {
        let start = EventStart::parse(Some("2024-01-10T08:00:00+02:00"), None);
        assert_eq!(
            start,
            EventStart::Timed(Utc.with_ymd_and_hms(2024, 1, 10, 6, 0, 0).unwrap())
        );
        assert_eq!(start.hour(), Some(6));

        let start = EventStart::parse(Some("2024-01-10T23:30:00-03:00"), None);
        assert_eq!(start.hour(), Some(2));
    }

    #[test]
    fn test_parse_offsetless_start_as_utc() {
        let start = EventStart::parse(Some("2024-01-10T03:00:00"), None);
        assert_eq!(
            start,
            EventStart::Timed(Utc.with_ymd_and_hms(2024, 1, 10, 3, 0, 0).unwrap())
        );
        assert_eq!(start.hour(), Some(3));

        let start = EventStart::parse(Some("2024-01-10T21:15:30.250"), None);
        assert_eq!(start.hour(), Some(21));
    }

    #[test]
    fn test_parse_all_day_start() {
        let start = EventStart::parse(None, Some("2024-01-10"));
        assert_eq!(
            start,
            EventStart::AllDay(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
        );
        assert_eq!(start.hour(), None);
    }

    #[test]
    fn test_parse_missing_or_invalid_start() {
        assert_eq!(EventStart::parse(None, None), EventStart::Unknown);
        assert_eq!(EventStart::parse(Some("tomorrow"), None), EventStart::Unknown);
        assert_eq!(EventStart::parse(None, Some("10.1.2024")), EventStart::Unknown);
    }

    #[test]
    fn test_sort_key_ordering() {
        let unknown = EventStart::Unknown.sort_key();
        let all_day = EventStart::parse(None, Some("2024-01-10")).sort_key();
        let morning = EventStart::parse(Some("2024-01-10T08:00:00Z"), None).sort_key();
        let next_day = EventStart::parse(None, Some("2024-01-11")).sort_key();

        assert!(unknown < all_day);
        assert!(all_day < morning);
        assert!(morning < next_day);
    }
}
