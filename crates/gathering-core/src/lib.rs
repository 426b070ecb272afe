//! Event store, query engine, and validation for the Gathering community
//! events store.
//!
//! The [`EventStore`] owns the event collection. It validates submissions,
//! applies mutations, writes a full snapshot through a [`SnapshotStorage`]
//! port after every change, and hands a [`Notice`] to a [`Notifier`].
//! Listing goes through the pure query engine.
//!
//! # Modules
//!
//! - [`clock`] -- Source of "today" for date validation.
//! - [`config`] -- YAML configuration with environment overrides.
//! - [`error`] -- [`EventError`] and [`StorageError`].
//! - [`notify`] -- [`Notifier`] port and notice texts.
//! - [`query`] -- Filter and display ordering.
//! - [`seed`] -- Sample events for a fresh store.
//! - [`storage`] -- [`SnapshotStorage`] port, in-memory and file adapters.
//! - [`store`] -- The [`EventStore`] itself.
//! - [`validation`] -- Field rules for drafts.
//!
//! [`Notice`]: gathering_types::Notice

pub mod clock;
pub mod config;
pub mod error;
pub mod notify;
pub mod query;
pub mod seed;
pub mod storage;
pub mod store;
pub mod validation;

pub use clock::{Clock, FixedClock, LocalClock};
pub use config::{ConfigError, GatheringConfig, LogFormat};
pub use error::{EventError, StorageError};
pub use notify::{Notifier, TracingNotifier};
pub use storage::{DEFAULT_STORAGE_KEY, FileStorage, MemoryStorage, SnapshotStorage};
pub use store::{Applied, Durability, EmptySlot, EventStore};
pub use validation::validate_draft;
