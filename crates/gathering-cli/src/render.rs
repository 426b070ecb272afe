//! Terminal rendering for events, notices, and validation reports.

use std::io::Write;

use chrono::NaiveDate;
use gathering_core::Notifier;
use gathering_types::{Event, FieldErrors, Notice};

const PIN_MARKER: &str = "[pinned]";

/// `March 20, 2024`.
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// One event as a multi-line card.
pub fn card(event: &Event) -> String {
    let heading = if event.is_pinned {
        format!("{} {PIN_MARKER}", event.title)
    } else {
        event.title.clone()
    };

    format!(
        "{heading}\n  Date:     {}\n  Location: {}\n  Category: {}\n  {}\n  id: {}",
        long_date(event.date),
        event.location,
        event.category.label(),
        event.description,
        event.id,
    )
}

/// Cards separated by blank lines.
pub fn listing(events: &[&Event]) -> String {
    events
        .iter()
        .map(|event| card(event))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Per-field validation report, one line per failing field.
pub fn field_report(errors: &FieldErrors) -> String {
    let mut out = String::from("The event could not be saved:");
    for (field, reason) in errors.iter() {
        out.push_str("\n  ");
        out.push_str(field.as_str());
        out.push_str(": ");
        out.push_str(reason);
    }
    out
}

/// Prints each notice as a single line on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        let mut stdout = std::io::stdout().lock();
        if let Err(err) = writeln!(stdout, "{}: {}", notice.title, notice.description) {
            tracing::warn!(error = %err, "Failed to print notice");
        }
    }
}
