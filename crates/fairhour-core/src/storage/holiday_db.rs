//! SQLite-backed holiday cache.
//!
//! One row per (scope, country, year): the holiday list as JSON plus an
//! RFC3339 `cached_at` timestamp. Writes are upserts (last write wins,
//! entries are idempotent given identical inputs); freshness is the
//! caller's concern, the store just hands back `cached_at`.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use crate::error::StorageError;
use crate::holiday::Holiday;

/// A cached holiday list with its write timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedHolidays {
    pub holidays: Vec<Holiday>,
    pub cached_at: DateTime<Utc>,
}

/// Holiday cache store. Short-critical-section mutex around the connection;
/// all statements are single-row reads or upserts.
pub struct HolidayStore {
    conn: Mutex<Connection>,
}

impl HolidayStore {
    /// Open the store at the default location (`<data dir>/holidays.db`).
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()?.join("holidays.db");
        Self::open_at(&path)
    }

    /// Open the store at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        Self::init(conn)
    }

    /// In-memory store, for tests and ephemeral scopes.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|source| StorageError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS holiday_cache (
                scope TEXT NOT NULL,
                country TEXT NOT NULL,
                year INTEGER NOT NULL,
                holidays TEXT NOT NULL,
                cached_at TEXT NOT NULL,
                PRIMARY KEY (scope, country, year)
            );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|_| StorageError::QueryFailed("connection lock poisoned".to_string()))
    }

    /// Cached entry for (scope, country, year), if any.
    pub fn get(
        &self,
        scope: &str,
        country: &str,
        year: i32,
    ) -> Result<Option<CachedHolidays>, StorageError> {
        let conn = self.lock()?;
        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT holidays, cached_at FROM holiday_cache
                 WHERE scope = ?1 AND country = ?2 AND year = ?3",
                params![scope, country, year],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((holidays_json, cached_at_str)) = row else {
            return Ok(None);
        };

        let holidays: Vec<Holiday> = serde_json::from_str(&holidays_json)
            .map_err(|e| StorageError::QueryFailed(format!("corrupt holiday payload: {e}")))?;
        // A corrupt timestamp reads as the epoch: the entry looks stale and
        // gets refreshed instead of erroring.
        let cached_at = DateTime::parse_from_rfc3339(&cached_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(DateTime::UNIX_EPOCH);

        Ok(Some(CachedHolidays {
            holidays,
            cached_at,
        }))
    }

    /// Insert or overwrite the entry for (scope, country, year).
    pub fn upsert(
        &self,
        scope: &str,
        country: &str,
        year: i32,
        holidays: &[Holiday],
        cached_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let holidays_json = serde_json::to_string(holidays)
            .map_err(|e| StorageError::QueryFailed(format!("serialize holidays: {e}")))?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO holiday_cache (scope, country, year, holidays, cached_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (scope, country, year) DO UPDATE SET
                 holidays = excluded.holidays,
                 cached_at = excluded.cached_at",
            params![scope, country, year, holidays_json, cached_at.to_rfc3339()],
        )?;
        Ok(())
    }
}
