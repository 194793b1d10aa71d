//! SQLite-backed repository for the catalog, the response cache, favorites
//! and play history.
//!
//! Every public method takes the connection lock once and runs as a single
//! statement or a single transaction.

mod cache;
mod favorites;
mod plays;
mod schema;
mod tracks;

use crate::clock::{Clock, SystemClock};
use crate::error::{CatalogError, Result};
use crate::models::StoreCounts;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

pub struct SqliteStore {
    conn: Mutex<Connection>,
    clock: Arc<dyn Clock>,
}

impl SqliteStore {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened catalog database");
        Self::from_connection(conn, Arc::new(SystemClock))
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, Arc::new(SystemClock))
    }

    /// Open from a `DATABASE_URL` style string: `sqlite://path`,
    /// `sqlite::memory:`, `:memory:` or a bare path.
    pub fn open_url(url: &str) -> Result<Self> {
        match database_path(url) {
            None => Self::open_in_memory(),
            Some(path) => Self::open(path),
        }
    }

    /// Replace the clock used for record timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn from_connection(conn: Connection, clock: Arc<dyn Clock>) -> Result<Self> {
        conn.execute_batch(schema::SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            clock,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| CatalogError::LockPoisoned)
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn counts(&self) -> Result<StoreCounts> {
        let now = to_millis(self.now());
        let conn = self.lock()?;
        let count = |sql: &str| -> Result<usize> {
            let n: i64 = conn.query_row(sql, [], |row| row.get(0))?;
            Ok(n as usize)
        };
        let expired: i64 = conn.query_row(
            "SELECT COUNT(*) FROM jamendo_api_cache WHERE expires_at <= ?1",
            params![now],
            |row| row.get(0),
        )?;

        Ok(StoreCounts {
            tracks: count("SELECT COUNT(*) FROM jamendo_tracks")?,
            favorites: count("SELECT COUNT(*) FROM user_favorite_tracks")?,
            plays: count("SELECT COUNT(*) FROM user_play_history")?,
            cache_entries: count("SELECT COUNT(*) FROM jamendo_api_cache")?,
            expired_cache_entries: expired as usize,
        })
    }
}

/// `None` means an in-memory database.
pub fn database_path(url: &str) -> Option<&str> {
    let trimmed = url.trim();
    let path = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    match path {
        "" | ":memory:" => None,
        path => Some(path),
    }
}

fn ensure_track(conn: &Connection, track_id: i64) -> Result<()> {
    conn.query_row(
        "SELECT 1 FROM jamendo_tracks WHERE id = ?1",
        params![track_id],
        |_| Ok(()),
    )
    .optional()?
    .ok_or(CatalogError::TrackNotFound(track_id))
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

pub(crate) fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

pub(crate) fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}
