//! Source of "today" for date validation.
//!
//! The validator never reads the system clock directly. Production code
//! uses [`LocalClock`]; tests pin the date with [`FixedClock`].

use chrono::NaiveDate;

/// Supplies the current calendar date.
pub trait Clock {
    /// Today's date, truncated to midnight in the relevant time zone.
    fn today(&self) -> NaiveDate;
}

/// The machine's local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// A clock frozen on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
