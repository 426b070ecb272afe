//! Query engine: the pure filter-and-sort derivation over the event list.
//!
//! Given the full collection and an [`EventQuery`], the engine:
//! 1. keeps events admitted by the category filter,
//! 2. keeps events whose title, location or description contains the search
//!    text (case-insensitive; empty search keeps everything),
//! 3. orders pinned events first, then by ascending date.
//!
//! The sort is stable, so events on the same date keep their creation order.

use std::borrow::Borrow;

use gathering_types::{Event, EventQuery};

/// Message a presentation layer shows when a query returns nothing.
pub const EMPTY_RESULT_MESSAGE: &str = "No events found. Try adjusting your search or filters.";

/// Whether `event` satisfies both the category and search criteria.
pub fn matches(event: &Event, query: &EventQuery) -> bool {
    admits(event, query, &query.search.to_lowercase())
}

/// Filter and order `events` for display.
pub fn run_query<'a>(events: &'a [Event], query: &EventQuery) -> Vec<&'a Event> {
    let needle = query.search.to_lowercase();

    let mut visible: Vec<&Event> = events
        .iter()
        .filter(|event| admits(event, query, &needle))
        .collect();
    sort_for_display(&mut visible);

    tracing::debug!(
        category = %query.category,
        search = %query.search,
        total = events.len(),
        visible = visible.len(),
        "Query evaluated"
    );
    visible
}

/// Order events pinned-first, then by ascending date. Stable.
pub fn sort_for_display<E: Borrow<Event>>(events: &mut [E]) {
    events.sort_by(|a, b| {
        let (a, b): (&Event, &Event) = (a.borrow(), b.borrow());
        b.is_pinned
            .cmp(&a.is_pinned)
            .then_with(|| a.date.cmp(&b.date))
    });
}

fn admits(event: &Event, query: &EventQuery, needle: &str) -> bool {
    query.category.admits(event.category) && (needle.is_empty() || event.mentions(needle))
}
