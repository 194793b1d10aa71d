use super::tracks::{TRACK_COLUMNS, track_from_row};
use super::{SqliteStore, ensure_track, is_unique_violation, to_millis};
use crate::error::{CatalogError, Result};
use crate::models::{FavoriteChange, StoredTrack};
use rusqlite::{Connection, OptionalExtension, params};

impl SqliteStore {
    /// Mark a track as a user's favorite and bump the track's counter in the
    /// same transaction.
    pub fn add_favorite(&self, user_id: &str, track_id: i64) -> Result<FavoriteChange> {
        let now = to_millis(self.now());
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        ensure_track(&tx, track_id)?;

        let inserted = tx.execute(
            "INSERT INTO user_favorite_tracks (user_id, track_id, created_at)
             VALUES (?1, ?2, ?3)",
            params![user_id, track_id, now],
        );
        match inserted {
            Err(err) if is_unique_violation(&err) => {
                return Err(CatalogError::AlreadyFavorited {
                    user_id: user_id.to_string(),
                    track_id,
                });
            }
            other => other?,
        };

        let favorite_count = increment_favorite_count(&tx, track_id)?;
        tx.commit()?;

        tracing::debug!(user_id, track_id, favorite_count, "track favorited");
        Ok(FavoriteChange {
            track_id,
            favorited: true,
            favorite_count,
        })
    }

    /// Remove a favorite and decrement the track's counter, never below zero.
    pub fn remove_favorite(&self, user_id: &str, track_id: i64) -> Result<FavoriteChange> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let removed = tx.execute(
            "DELETE FROM user_favorite_tracks WHERE user_id = ?1 AND track_id = ?2",
            params![user_id, track_id],
        )?;
        if removed == 0 {
            return Err(CatalogError::FavoriteNotFound {
                user_id: user_id.to_string(),
                track_id,
            });
        }

        let favorite_count = decrement_favorite_count(&tx, track_id)?;
        tx.commit()?;

        tracing::debug!(user_id, track_id, favorite_count, "track unfavorited");
        Ok(FavoriteChange {
            track_id,
            favorited: false,
            favorite_count,
        })
    }

    pub fn is_favorite(&self, user_id: &str, track_id: i64) -> Result<bool> {
        let conn = self.lock()?;
        let found = conn
            .query_row(
                "SELECT 1 FROM user_favorite_tracks WHERE user_id = ?1 AND track_id = ?2",
                params![user_id, track_id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    pub fn favorite_count(&self, user_id: &str) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM user_favorite_tracks WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// A user's favorite tracks, most recently favorited first.
    pub fn list_favorites(&self, user_id: &str) -> Result<Vec<StoredTrack>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {TRACK_COLUMNS} FROM user_favorite_tracks f
             JOIN jamendo_tracks t ON t.id = f.track_id
             WHERE f.user_id = ?1
             ORDER BY f.created_at DESC, f.id DESC"
        ))?;
        let tracks = stmt
            .query_map(params![user_id], track_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tracks)
    }
}

/// Single-statement update, no read-modify-write.
fn increment_favorite_count(conn: &Connection, track_id: i64) -> Result<i64> {
    let count = conn.query_row(
        "UPDATE jamendo_tracks SET stats_playlisted = stats_playlisted + 1
         WHERE id = ?1 RETURNING stats_playlisted",
        params![track_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn decrement_favorite_count(conn: &Connection, track_id: i64) -> Result<i64> {
    let count = conn.query_row(
        "UPDATE jamendo_tracks SET stats_playlisted = MAX(stats_playlisted - 1, 0)
         WHERE id = ?1 RETURNING stats_playlisted",
        params![track_id],
        |row| row.get(0),
    )?;
    Ok(count)
}
