use super::models::CalendarEvent;

/// Shown in place of a missing summary
pub const UNTITLED_EVENT: &str = "(sin título)";

/// Shown in place of a missing start value
pub const UNKNOWN_START: &str = "(sin fecha)";

/// Prefix of the description line
pub const DESCRIPTION_LABEL: &str = "Descripción";

/// Sort events ascending by parsed start. The sort is stable, exact ties keep
/// their incoming order.
pub fn sort_by_start(events: &mut [CalendarEvent]) {
    events.sort_by_key(|event| event.start().sort_key());
}

/// Render a merged batch of events as a report.
///
/// An empty batch yields `empty_message` verbatim. Otherwise the report is the
/// header line followed by one line per event:
///
/// ```text
/// - [label] start: summary
///   Descripción: description
/// ```
///
/// where the description line only appears for non-empty descriptions.
pub fn render(events: &[CalendarEvent], empty_message: &str, header_message: &str) -> String {
    if events.is_empty() {
        return empty_message.to_string();
    }

    let mut sorted = events.to_vec();
    sort_by_start(&mut sorted);

    let mut report = format!("{}\n", header_message);
    for event in &sorted {
        report.push_str(&format!(
            "- [{}] {}: {}\n",
            event.calendar_label,
            event.start_value().unwrap_or(UNKNOWN_START),
            event.summary.as_deref().unwrap_or(UNTITLED_EVENT)
        ));

        if let Some(description) = event.description.as_deref().filter(|d| !d.is_empty()) {
            report.push_str(&format!("  {}: {}\n", DESCRIPTION_LABEL, description));
        }
    }

    report
}
