//! Identifier wrapper for stored events.
//!
//! Event ids are opaque strings. Ids minted by the store are UUID v7
//! (time-ordered). This type accepts any string; the store rejects
//! snapshots with empty or repeated ids when rehydrating. The built-in seed
//! list uses `"1"` and `"2"`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Unique identifier for an event in the store.
///
/// Assigned once at creation and never reassigned.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventId(String);

impl EventId {
    /// Mint a fresh identifier using UUID v7 (time-ordered).
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the inner string value.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for EventId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<EventId> for String {
    fn from(id: EventId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = EventId::generate();
        let b = EventId::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn serializes_as_bare_string() {
        let id = EventId::from("1");
        assert_eq!(serde_json::to_string(&id).ok().as_deref(), Some("\"1\""));

        let restored: Result<EventId, _> = serde_json::from_str("\"2\"");
        assert_eq!(restored.ok(), Some(EventId::from("2")));
    }

    #[test]
    fn display_matches_inner_string() {
        let id = EventId::from("abc");
        assert_eq!(id.to_string(), "abc");
        assert_eq!(String::from(id), "abc");
    }
}
