//! Core entity structs for community events.
//!
//! [`Event`] is the stored record. [`EventDraft`] is what a submission form
//! produces before validation, [`EventFields`] is the normalized record the
//! validator accepts, and [`EventPatch`] names exactly what an edit may
//! change.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Category, EventField};
use crate::ids::EventId;

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A single community event.
///
/// This is also the persisted shape: stored snapshots are a JSON array of
/// these records with camelCase keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Event {
    /// Immutable unique identifier.
    pub id: EventId,
    /// Title, 3 to 100 characters.
    pub title: String,
    /// Calendar date, serialized as `YYYY-MM-DD`.
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// Venue, 3 to 100 characters.
    pub location: String,
    /// Description, 10 to 500 characters.
    pub description: String,
    /// Classification tag.
    pub category: Category,
    /// Pinned events sort ahead of everything else. Absent in older
    /// snapshots, which read as unpinned.
    #[serde(default)]
    pub is_pinned: bool,
}

impl Event {
    /// Build a new event from validated fields.
    pub fn new(id: EventId, fields: EventFields, is_pinned: bool) -> Self {
        Self {
            id,
            title: fields.title,
            date: fields.date,
            location: fields.location,
            description: fields.description,
            category: fields.category,
            is_pinned,
        }
    }

    /// Replace every editable field, keeping `id` and `is_pinned`.
    pub fn apply_fields(&mut self, fields: EventFields) {
        self.title = fields.title;
        self.date = fields.date;
        self.location = fields.location;
        self.description = fields.description;
        self.category = fields.category;
    }

    /// Whether `needle` (already lowercased) occurs in the title, location
    /// or description, ignoring case.
    pub fn mentions(&self, needle: &str) -> bool {
        [&self.title, &self.location, &self.description]
            .iter()
            .any(|text| text.to_lowercase().contains(needle))
    }
}

// ---------------------------------------------------------------------------
// Submission shapes
// ---------------------------------------------------------------------------

/// Raw, unvalidated event data as submitted by a form.
///
/// Every field is kept as text so the validator can report unparsable dates
/// and unknown categories against the field that carried them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventDraft {
    /// Proposed title.
    pub title: String,
    /// Proposed date, expected as `YYYY-MM-DD`.
    pub date: String,
    /// Proposed location.
    pub location: String,
    /// Proposed description.
    pub description: String,
    /// Proposed category name.
    pub category: String,
}

impl From<&Event> for EventDraft {
    /// Prefill an edit form from a stored event.
    fn from(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            date: event.date.format("%Y-%m-%d").to_string(),
            location: event.location.clone(),
            description: event.description.clone(),
            category: event.category.as_str().to_owned(),
        }
    }
}

/// Validated, normalized event fields.
///
/// Only the validator produces these, so holding one means every rule held
/// at the moment it was checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventFields {
    /// Trimmed title.
    pub title: String,
    /// Parsed date.
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// Trimmed location.
    pub location: String,
    /// Trimmed description.
    pub description: String,
    /// Parsed category.
    pub category: Category,
}

/// An edit to an existing event.
///
/// All editable fields are replaced from `draft`. The pin flag is only
/// touched when `is_pinned` is `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct EventPatch {
    /// Replacement field values, validated before they are applied.
    pub draft: EventDraft,
    /// Explicit pin state, or `None` to keep the stored flag.
    pub is_pinned: Option<bool>,
}

impl EventPatch {
    /// Set the pin flag explicitly as part of the edit.
    #[must_use]
    pub fn with_pinned(mut self, is_pinned: bool) -> Self {
        self.is_pinned = Some(is_pinned);
        self
    }
}

impl From<EventDraft> for EventPatch {
    fn from(draft: EventDraft) -> Self {
        Self {
            draft,
            is_pinned: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation report
// ---------------------------------------------------------------------------

/// Field name to human-readable reason, one entry per violated field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FieldErrors(BTreeMap<EventField, String>);

impl FieldErrors {
    /// Create an empty report.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record a reason for `field`. A field keeps its first reason.
    pub fn add(&mut self, field: EventField, reason: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| reason.into());
    }

    /// The reason recorded for `field`, if any.
    pub fn get(&self, field: EventField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Whether no field failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failed fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate failures in form order.
    pub fn iter(&self) -> impl Iterator<Item = (EventField, &str)> {
        self.0.iter().map(|(field, reason)| (*field, reason.as_str()))
    }
}

impl core::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, (field, reason)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {reason}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

/// A `(title, description)` message for the notification collaborator,
/// emitted after each successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Notice {
    /// Short headline, e.g. `Event Created`.
    pub title: String,
    /// One-sentence detail.
    pub description: String,
}

impl Notice {
    /// Create a notice.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}
