//! Shared type definitions for the Gathering community events store.
//!
//! This crate is the plain-data boundary between the event store and any
//! presentation layer. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for a web front end.
//!
//! # Modules
//!
//! - [`ids`] -- Opaque event identifiers
//! - [`enums`] -- Categories, the category filter, and validated field names
//! - [`structs`] -- Events, submission drafts, patches, validation reports, notices
//! - [`query`] -- Listing criteria

pub mod enums;
pub mod ids;
pub mod query;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Category, CategoryFilter, EventField, UnknownCategory};
pub use ids::EventId;
pub use query::EventQuery;
pub use structs::{Event, EventDraft, EventFields, EventPatch, FieldErrors, Notice};
