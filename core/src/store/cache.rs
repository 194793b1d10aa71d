use super::{SqliteStore, from_millis, to_millis};
use crate::cache::CacheStore;
use crate::error::Result;
use crate::models::CacheEntry;
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, params};

impl CacheStore for SqliteStore {
    fn load_entry(&self, key: &str) -> Result<Option<CacheEntry>> {
        let conn = self.lock()?;
        let row: Option<(String, i64, i64)> = conn
            .query_row(
                "SELECT response_data, created_at, expires_at
                 FROM jamendo_api_cache WHERE cache_key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let Some((data, created_at, expires_at)) = row else {
            return Ok(None);
        };

        Ok(Some(CacheEntry {
            key: key.to_string(),
            payload: serde_json::from_str(&data)?,
            created_at: from_millis(created_at),
            expires_at: from_millis(expires_at),
        }))
    }

    fn save_entry(&self, entry: &CacheEntry) -> Result<DateTime<Utc>> {
        let data = serde_json::to_string(&entry.payload)?;
        let conn = self.lock()?;
        let created_at: i64 = conn.query_row(
            "INSERT INTO jamendo_api_cache (cache_key, response_data, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(cache_key) DO UPDATE SET
                response_data = excluded.response_data,
                expires_at = excluded.expires_at
             RETURNING created_at",
            params![
                entry.key,
                data,
                to_millis(entry.created_at),
                to_millis(entry.expires_at)
            ],
            |row| row.get(0),
        )?;
        Ok(from_millis(created_at))
    }

    fn remove_expired_entry(&self, key: &str, now: DateTime<Utc>) -> Result<bool> {
        let conn = self.lock()?;
        let removed = conn.execute(
            "DELETE FROM jamendo_api_cache WHERE cache_key = ?1 AND expires_at <= ?2",
            params![key, to_millis(now)],
        )?;
        Ok(removed > 0)
    }

    fn remove_all_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let conn = self.lock()?;
        let removed = conn.execute(
            "DELETE FROM jamendo_api_cache WHERE expires_at <= ?1",
            params![to_millis(now)],
        )?;
        Ok(removed)
    }
}
