//! Query criteria accepted by the event listing.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::CategoryFilter;

/// Filter and search criteria for listing events.
///
/// The default query keeps every event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventQuery {
    /// Category criterion.
    #[serde(default)]
    pub category: CategoryFilter,
    /// Case-insensitive text matched against title, location and
    /// description. Empty matches everything.
    #[serde(default)]
    pub search: String,
}

impl EventQuery {
    /// A query that keeps every event.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to a category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<CategoryFilter>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the search text.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }
}
