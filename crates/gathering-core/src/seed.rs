//! Built-in sample events.
//!
//! Used when the storage slot is empty or holds data that cannot be parsed.
//! Seed events bypass the validator, so their dates may lie in the past.

use chrono::NaiveDate;
use gathering_types::{Category, Event, EventId};

/// The two sample events a fresh store starts with.
pub fn seed_events() -> Vec<Event> {
    vec![
        Event {
            id: EventId::from("1"),
            title: "Interfaith Dialog Session".to_owned(),
            date: seed_date(2024, 3, 20),
            location: "Community Center".to_owned(),
            description: "Join us for an evening of meaningful dialogue between different faith communities.".to_owned(),
            category: Category::Religious,
            is_pinned: false,
        },
        Event {
            id: EventId::from("2"),
            title: "Community Cleanup Day".to_owned(),
            date: seed_date(2024, 3, 25),
            location: "City Park".to_owned(),
            description: "Help keep our community clean and beautiful. All supplies provided.".to_owned(),
            category: Category::Charity,
            is_pinned: false,
        },
    ]
}

fn seed_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
