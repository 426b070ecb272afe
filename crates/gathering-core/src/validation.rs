//! Field-level validation for submitted events.
//!
//! Every rule runs on every submission so the caller sees all failing
//! fields at once:
//! 1. Title -- 3 to 100 characters after trimming.
//! 2. Date -- a valid `YYYY-MM-DD` date no earlier than today.
//! 3. Location -- 3 to 100 characters after trimming.
//! 4. Description -- 10 to 500 characters after trimming.
//! 5. Category -- exactly `religious`, `social` or `charity`.
//!
//! The validator is pure: it neither reads the clock nor consults the store.

use chrono::NaiveDate;
use gathering_types::{Category, EventDraft, EventField, EventFields, FieldErrors};
use validator::ValidateLength;

/// Inclusive character-count bounds for a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthRule {
    /// Fewest characters allowed.
    pub min: u64,
    /// Most characters allowed.
    pub max: u64,
}

impl LengthRule {
    /// Whether `value`, trimmed, falls within the bounds.
    pub fn admits(self, value: &str) -> bool {
        value
            .trim()
            .to_owned()
            .validate_length(Some(self.min), Some(self.max), None)
    }
}

/// Bounds for [`EventField::Title`].
pub const TITLE_LENGTH: LengthRule = LengthRule { min: 3, max: 100 };

/// Bounds for [`EventField::Location`].
pub const LOCATION_LENGTH: LengthRule = LengthRule { min: 3, max: 100 };

/// Bounds for [`EventField::Description`].
pub const DESCRIPTION_LENGTH: LengthRule = LengthRule { min: 10, max: 500 };

/// Format accepted for the date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validate a draft against every field rule.
///
/// `today` is the current local date; dates before it are rejected.
/// On success the returned fields are trimmed and parsed.
pub fn validate_draft(draft: &EventDraft, today: NaiveDate) -> Result<EventFields, FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = check_length(EventField::Title, &draft.title, TITLE_LENGTH, &mut errors);
    let date = check_date(&draft.date, today, &mut errors);
    let location = check_length(
        EventField::Location,
        &draft.location,
        LOCATION_LENGTH,
        &mut errors,
    );
    let description = check_length(
        EventField::Description,
        &draft.description,
        DESCRIPTION_LENGTH,
        &mut errors,
    );
    let category = check_category(&draft.category, &mut errors);

    match (title, date, location, description, category) {
        (Some(title), Some(date), Some(location), Some(description), Some(category)) => {
            Ok(EventFields {
                title,
                date,
                location,
                description,
                category,
            })
        }
        _ => {
            tracing::debug!(failed = errors.len(), "Draft rejected");
            Err(errors)
        }
    }
}

/// Trim `raw` and check its length, recording a reason on failure.
fn check_length(
    field: EventField,
    raw: &str,
    rule: LengthRule,
    errors: &mut FieldErrors,
) -> Option<String> {
    let value = raw.trim().to_owned();

    if !value.validate_length(Some(rule.min), None, None) {
        errors.add(field, format!("must be at least {} characters", rule.min));
        return None;
    }
    if !value.validate_length(None, Some(rule.max), None) {
        errors.add(field, format!("must be at most {} characters", rule.max));
        return None;
    }
    Some(value)
}

/// Parse the date and require it to be today or later.
fn check_date(raw: &str, today: NaiveDate, errors: &mut FieldErrors) -> Option<NaiveDate> {
    let Ok(date) = NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) else {
        errors.add(EventField::Date, "must be a valid date (YYYY-MM-DD)");
        return None;
    };
    if date < today {
        errors.add(EventField::Date, "must be today or in the future");
        return None;
    }
    Some(date)
}

/// Require an exact category name.
fn check_category(raw: &str, errors: &mut FieldErrors) -> Option<Category> {
    raw.parse::<Category>().map_or_else(
        |_unknown| {
            errors.add(
                EventField::Category,
                "must be one of: religious, social, charity",
            );
            None
        },
        Some,
    )
}
