//! Enumeration types for community events.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Classification tag carried by every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Category {
    /// Worship, interfaith and faith-community gatherings.
    Religious,
    /// Social meetups and celebrations.
    Social,
    /// Volunteering, fundraising and service days.
    Charity,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 3] = [Self::Religious, Self::Social, Self::Charity];

    /// The wire/storage name (`religious`, `social`, `charity`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Religious => "religious",
            Self::Social => "social",
            Self::Charity => "charity",
        }
    }

    /// Capitalized label for display.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Religious => "Religious",
            Self::Social => "Social",
            Self::Charity => "Charity",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl core::str::FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "religious" => Ok(Self::Religious),
            "social" => Ok(Self::Social),
            "charity" => Ok(Self::Charity),
            other => Err(UnknownCategory(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// CategoryFilter
// ---------------------------------------------------------------------------

/// Category criterion applied by the query engine.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum CategoryFilter {
    /// Keep every event.
    #[default]
    All,
    /// Keep only religious events.
    Religious,
    /// Keep only social events.
    Social,
    /// Keep only charity events.
    Charity,
}

impl CategoryFilter {
    /// Whether an event of `category` passes this filter.
    pub const fn admits(self, category: Category) -> bool {
        matches!(
            (self, category),
            (Self::All, _)
                | (Self::Religious, Category::Religious)
                | (Self::Social, Category::Social)
                | (Self::Charity, Category::Charity)
        )
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        match category {
            Category::Religious => Self::Religious,
            Category::Social => Self::Social,
            Category::Charity => Self::Charity,
        }
    }
}

impl core::str::FromStr for CategoryFilter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        s.parse::<Category>().map(Self::from)
    }
}

impl core::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Religious => f.write_str("religious"),
            Self::Social => f.write_str("social"),
            Self::Charity => f.write_str("charity"),
        }
    }
}

// ---------------------------------------------------------------------------
// EventField
// ---------------------------------------------------------------------------

/// The user-editable fields of an event, used to key validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum EventField {
    /// The event title.
    Title,
    /// The calendar date.
    Date,
    /// Where the event takes place.
    Location,
    /// Free-text description.
    Description,
    /// The category tag.
    Category,
}

impl EventField {
    /// The field name as it appears in stored records and form payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Date => "date",
            Self::Location => "location",
            Self::Description => "description",
            Self::Category => "category",
        }
    }
}

impl core::fmt::Display for EventField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
