//! Snapshot persistence boundary for entity collections.
//!
//! # Responsibility
//! - Define the slot snapshot contract the stores persist through.
//! - Keep serialization and SQLite details out of the store layer.
//!
//! # Invariants
//! - `load`/`save` never propagate failures; degraded outcomes are logged
//!   and the in-memory collection stays authoritative.
//! - One slot holds exactly one entity kind as a JSON array.

use serde::de::DeserializeOwned;
use serde::Serialize;

mod sqlite;

pub use sqlite::SqliteSlotStorage;

pub const TASKS_SLOT: &str = "tasks";
pub const GOALS_SLOT: &str = "goals";
pub const ROUTINES_SLOT: &str = "routines";

/// Durable snapshot storage keyed by slot name.
///
/// Timestamps and calendar dates round-trip through their string forms
/// (RFC 3339 / `YYYY-MM-DD`) inside the JSON payload; serde reconstructs
/// them as point-in-time values on load.
pub trait SlotStorage {
    /// Loads the snapshot stored under `slot`.
    ///
    /// Returns an empty collection when the slot is missing, unreadable, or
    /// holds a payload that no longer parses. Those outcomes are logged;
    /// store construction must never fail because of them.
    fn load<T: DeserializeOwned>(&self, slot: &str) -> Vec<T>;

    /// Replaces the snapshot stored under `slot` with `records`.
    ///
    /// Write failures are logged and swallowed; the caller's in-memory
    /// state is the source of truth until the next successful save.
    fn save<T: Serialize>(&self, slot: &str, records: &[T]);
}
