//! SQLite-backed slot storage.
//!
//! # Responsibility
//! - Persist one JSON array payload per slot row.
//! - Absorb read/write/parse failures at this boundary, logging each one.
//!
//! # Invariants
//! - Requires a connection prepared by `db::open_db` (migrations applied).
//! - Saves are last-write-wins upserts on the slot name.

use chrono::Utc;
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::storage::SlotStorage;

pub struct SqliteSlotStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotStorage<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn read_payload(&self, slot: &str) -> rusqlite::Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT payload FROM slots WHERE slot = ?1",
                params![slot],
                |row| row.get(0),
            )
            .optional()
    }
}

impl SlotStorage for SqliteSlotStorage<'_> {
    fn load<T: DeserializeOwned>(&self, slot: &str) -> Vec<T> {
        let payload = match self.read_payload(slot) {
            Ok(payload) => payload,
            Err(err) => {
                error!(
                    "event=slot_load module=storage status=error slot={slot} \
                     error_code=read_failed error={err}"
                );
                return Vec::new();
            }
        };

        let Some(payload) = payload else {
            debug!("event=slot_load module=storage status=ok slot={slot} records=0 outcome=missing");
            return Vec::new();
        };

        match serde_json::from_str::<Vec<T>>(&payload) {
            Ok(records) => {
                debug!(
                    "event=slot_load module=storage status=ok slot={slot} records={}",
                    records.len()
                );
                records
            }
            Err(err) => {
                error!(
                    "event=slot_load module=storage status=error slot={slot} \
                     error_code=parse_failed error={err}"
                );
                Vec::new()
            }
        }
    }

    fn save<T: Serialize>(&self, slot: &str, records: &[T]) {
        let payload = match serde_json::to_string(records) {
            Ok(payload) => payload,
            Err(err) => {
                error!(
                    "event=slot_save module=storage status=error slot={slot} \
                     error_code=encode_failed error={err}"
                );
                return;
            }
        };

        let written = self.conn.execute(
            "INSERT INTO slots (slot, payload, saved_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(slot) DO UPDATE SET
                 payload = excluded.payload,
                 saved_at = excluded.saved_at",
            params![slot, payload, Utc::now().to_rfc3339()],
        );

        match written {
            Ok(_) => debug!(
                "event=slot_save module=storage status=ok slot={slot} records={} bytes={}",
                records.len(),
                payload.len()
            ),
            Err(err) => error!(
                "event=slot_save module=storage status=error slot={slot} \
                 error_code=write_failed error={err}"
            ),
        }
    }
}
