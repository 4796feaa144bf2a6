use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{Result, StorageError};
use crate::models::{AppSettings, UserProfile, WaterDayRecord};

const ONBOARDING_COMPLETED_KEY: &str = "onboarding_completed";
const USER_PROFILE_KEY: &str = "user_profile";
const APP_SETTINGS_KEY: &str = "app_settings";
const WATER_DATA_PREFIX: &str = "water_data_";

/// String key-value persistence
///
/// Writes take `&mut self`, so a single owner serializes access per store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> std::result::Result<(), StorageError>;

    /// All keys starting with `prefix`, in ascending order
    fn keys_with_prefix(&self, prefix: &str) -> std::result::Result<Vec<String>, StorageError>;
}

/// SQLite-backed key-value store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create or open a store at the specified path
    pub fn open<P: AsRef<Path>>(db_path: P) -> std::result::Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> std::result::Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> std::result::Result<Self, StorageError> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
            [],
        )?;

        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> std::result::Result<(), StorageError> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> std::result::Result<Vec<String>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key")?;
        let keys = stmt
            .query_map(params![prefix], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

/// In-memory store, mainly for tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> std::result::Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> std::result::Result<Vec<String>, StorageError> {
        Ok(self
            .entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }
}

/// Typed access to the app's records on top of a [`KeyValueStore`]
///
/// Records are JSON documents under fixed keys; daily water records are keyed
/// by `water_data_YYYY-MM-DD`.
pub struct HydrationStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> HydrationStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn is_onboarding_completed(&self) -> Result<bool> {
        Ok(self.store.get(ONBOARDING_COMPLETED_KEY)?.as_deref() == Some("true"))
    }

    pub fn complete_onboarding(&mut self) -> Result<()> {
        debug!("Marking onboarding as completed");
        self.store.set(ONBOARDING_COMPLETED_KEY, "true")?;
        Ok(())
    }

    pub fn profile(&self) -> Result<Option<UserProfile>> {
        self.get_json(USER_PROFILE_KEY)
    }

    pub fn save_profile(&mut self, profile: &UserProfile) -> Result<()> {
        self.set_json(USER_PROFILE_KEY, profile)
    }

    pub fn settings(&self) -> Result<Option<AppSettings>> {
        self.get_json(APP_SETTINGS_KEY)
    }

    pub fn save_settings(&mut self, settings: &AppSettings) -> Result<()> {
        self.set_json(APP_SETTINGS_KEY, settings)
    }

    pub fn water_record(&self, date: NaiveDate) -> Result<Option<WaterDayRecord>> {
        self.get_json(&water_key(date))
    }

    pub fn save_water_record(&mut self, record: &WaterDayRecord) -> Result<()> {
        self.set_json(&water_key(record.date), record)
    }

    /// All records of a calendar month, in date order
    pub fn month_records(&self, year: i32, month: u32) -> Result<Vec<WaterDayRecord>> {
        let prefix = format!("{}{:04}-{:02}-", WATER_DATA_PREFIX, year, month);
        let keys = self.store.keys_with_prefix(&prefix)?;

        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            match self.get_json::<WaterDayRecord>(&key) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => warn!(key = %key, error = %e, "Skipping unreadable water record"),
            }
        }
        records.sort_by_key(|record| record.date);

        Ok(records)
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            debug!(key, "No stored record");
            return Ok(None);
        };

        let value = serde_json::from_str(&raw).map_err(|e| StorageError::Corrupted {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(value))
    }

    fn set_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        debug!(key, bytes = raw.len(), "Saving record");
        self.store.set(key, &raw)?;
        Ok(())
    }
}

fn water_key(date: NaiveDate) -> String {
    format!("{}{}", WATER_DATA_PREFIX, date.format("%Y-%m-%d"))
}
