use super::{SqliteStore, ensure_track, from_millis, to_millis};
use crate::error::{CatalogError, Result};
use crate::models::{ListeningStats, NewPlay, PlayRecord, decode_tags};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rustc_hash::FxHashMap;

const PLAY_COLUMNS: &str = "p.id, p.user_id, p.session_id, p.track_id, p.played_at, \
     p.duration_played, p.completed, p.user_agent, p.ip_address";

fn play_from_row(row: &Row<'_>) -> rusqlite::Result<PlayRecord> {
    Ok(PlayRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        session_id: row.get(2)?,
        track_id: row.get(3)?,
        played_at: from_millis(row.get(4)?),
        duration_played: row.get(5)?,
        completed: row.get(6)?,
        user_agent: row.get(7)?,
        ip_address: row.get(8)?,
    })
}

impl SqliteStore {
    /// Append a play event. Plays by a known user also roll into that user's
    /// listening totals within the same transaction.
    pub fn record_play(&self, play: &NewPlay) -> Result<PlayRecord> {
        let user_id = play
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());
        let session_id = play.session_id.as_deref().map(str::trim).unwrap_or_default();
        if user_id.is_none() && session_id.is_empty() {
            return Err(CatalogError::MissingListener);
        }

        let now = self.now();
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        ensure_track(&tx, play.track_id)?;

        tx.execute(
            "INSERT INTO user_play_history (
                user_id, track_id, session_id, played_at, duration_played, completed,
                user_agent, ip_address
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                user_id,
                play.track_id,
                session_id,
                to_millis(now),
                play.duration_played,
                play.completed,
                play.user_agent,
                play.ip_address,
            ],
        )?;
        let id = tx.last_insert_rowid();

        if let Some(user_id) = user_id {
            add_to_listening_totals(&tx, user_id, play, to_millis(now))?;
        }
        tx.commit()?;

        Ok(PlayRecord {
            id,
            user_id: user_id.map(str::to_string),
            session_id: session_id.to_string(),
            track_id: play.track_id,
            played_at: now,
            duration_played: play.duration_played,
            completed: play.completed,
            user_agent: play.user_agent.clone(),
            ip_address: play.ip_address.clone(),
        })
    }

    /// A user's plays, newest first.
    pub fn play_history(&self, user_id: &str, limit: usize) -> Result<Vec<PlayRecord>> {
        let plays = self.play_history_with_durations(user_id, limit)?;
        Ok(plays.into_iter().map(|(play, _)| play).collect())
    }

    /// `play_history` paired with each played track's duration, read in the
    /// same query.
    pub fn play_history_with_durations(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<(PlayRecord, i64)>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PLAY_COLUMNS}, COALESCE(t.duration, 0) FROM user_play_history p
             LEFT JOIN jamendo_tracks t ON t.id = p.track_id
             WHERE p.user_id = ?1
             ORDER BY p.played_at DESC, p.id DESC
             LIMIT ?2"
        ))?;
        let plays = stmt
            .query_map(params![user_id, limit as i64], |row| {
                Ok((play_from_row(row)?, row.get(9)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(plays)
    }

    pub fn listening_stats(&self, user_id: &str) -> Result<ListeningStats> {
        let conn = self.lock()?;
        let mut stats = conn
            .query_row(
                "SELECT total_listening_time, total_tracks_played, total_tracks_completed,
                        updated_at
                 FROM user_listening_stats WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(ListeningStats {
                        user_id: user_id.to_string(),
                        total_listening_time: row.get(0)?,
                        total_tracks_played: row.get(1)?,
                        total_tracks_completed: row.get(2)?,
                        favorite_genre: None,
                        most_played_track: None,
                        updated_at: Some(from_millis(row.get(3)?)),
                    })
                },
            )
            .optional()?
            .unwrap_or_else(|| ListeningStats::empty(user_id));

        stats.most_played_track = conn
            .query_row(
                "SELECT track_id FROM user_play_history
                 WHERE user_id = ?1
                 GROUP BY track_id
                 ORDER BY COUNT(*) DESC, MAX(played_at) DESC
                 LIMIT 1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;
        stats.favorite_genre = favorite_genre(&conn, user_id)?;
        Ok(stats)
    }
}

fn add_to_listening_totals(
    conn: &Connection,
    user_id: &str,
    play: &NewPlay,
    now: i64,
) -> Result<()> {
    conn.execute(
        "INSERT INTO user_listening_stats (
            user_id, total_listening_time, total_tracks_played, total_tracks_completed,
            updated_at
         ) VALUES (?1, ?2, 1, ?3, ?4)
         ON CONFLICT(user_id) DO UPDATE SET
            total_listening_time = total_listening_time + excluded.total_listening_time,
            total_tracks_played = total_tracks_played + 1,
            total_tracks_completed = total_tracks_completed + excluded.total_tracks_completed,
            updated_at = excluded.updated_at",
        params![user_id, play.duration_played, i64::from(play.completed), now],
    )?;
    Ok(())
}

/// Most frequent genre over every play of the user; ties go to the
/// alphabetically first genre.
fn favorite_genre(conn: &Connection, user_id: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare(
        "SELECT t.musicinfo_tags_genres FROM user_play_history p
         JOIN jamendo_tracks t ON t.id = p.track_id
         WHERE p.user_id = ?1",
    )?;
    let mut counts: FxHashMap<String, usize> = FxHashMap::default();
    let rows = stmt.query_map(params![user_id], |row| row.get::<_, String>(0))?;
    for raw in rows {
        for genre in decode_tags(&raw?) {
            *counts.entry(genre).or_default() += 1;
        }
    }

    Ok(counts
        .into_iter()
        .max_by(|(a_name, a_count), (b_name, b_count)| {
            a_count.cmp(b_count).then_with(|| b_name.cmp(a_name))
        })
        .map(|(genre, _)| genre))
}
