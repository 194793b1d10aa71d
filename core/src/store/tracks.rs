use super::{SqliteStore, from_millis, to_millis};
use crate::error::Result;
use crate::import::{ImportReport, parse_release_date, response_results};
use crate::models::{CatalogTrack, StoredTrack};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde_json::Value;

pub(super) const TRACK_COLUMNS: &str = "t.id, t.jamendo_id, t.name, t.artist_name, t.artist_id, \
     t.album_name, t.album_id, t.duration, t.position, t.releasedate, t.audio, t.audiodownload, \
     t.image, t.album_image, t.musicinfo_tags_genres, t.musicinfo_tags_instruments, \
     t.musicinfo_tags_vartags, t.stats_rate, t.stats_downloads_total, t.stats_playlisted, \
     t.cached_at, t.created_at";

pub(super) fn track_from_row(row: &Row<'_>) -> rusqlite::Result<StoredTrack> {
    let releasedate: Option<String> = row.get(9)?;
    Ok(StoredTrack {
        id: row.get(0)?,
        track: CatalogTrack {
            jamendo_id: row.get(1)?,
            name: row.get(2)?,
            artist_name: row.get(3)?,
            artist_id: row.get(4)?,
            album_name: row.get(5)?,
            album_id: row.get(6)?,
            duration: row.get(7)?,
            position: row.get(8)?,
            releasedate: releasedate.as_deref().and_then(parse_release_date),
            audio: row.get(10)?,
            audiodownload: row.get(11)?,
            image: row.get(12)?,
            album_image: row.get(13)?,
            musicinfo_tags_genres: row.get(14)?,
            musicinfo_tags_instruments: row.get(15)?,
            musicinfo_tags_vartags: row.get(16)?,
            stats_rate: row.get(17)?,
            stats_downloads_total: row.get(18)?,
            stats_playlisted: row.get(19)?,
        },
        cached_at: from_millis(row.get(20)?),
        created_at: from_millis(row.get(21)?),
    })
}

impl SqliteStore {
    /// Insert a track or refresh an existing one with the same Jamendo id.
    /// The locally maintained favorite counter and `created_at` survive a refresh.
    pub fn upsert_track(&self, track: &CatalogTrack) -> Result<StoredTrack> {
        let now = to_millis(self.now());
        let conn = self.lock()?;
        write_track(&conn, track, now)?;
        let stored = conn.query_row(
            &format!("SELECT {TRACK_COLUMNS} FROM jamendo_tracks t WHERE t.jamendo_id = ?1"),
            params![track.jamendo_id],
            track_from_row,
        )?;
        Ok(stored)
    }

    /// Import every track in a Jamendo response. Records that fail to parse
    /// are logged and skipped; storage failures abort the batch.
    pub fn import_results(&self, payload: &Value) -> Result<ImportReport> {
        self.import_with_progress(payload, |_| {})
    }

    /// Like [`SqliteStore::import_results`], calling `on_record` after each record.
    pub fn import_with_progress(
        &self,
        payload: &Value,
        mut on_record: impl FnMut(usize),
    ) -> Result<ImportReport> {
        let now = to_millis(self.now());
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut report = ImportReport::default();

        for (index, record) in response_results(payload).iter().enumerate() {
            match CatalogTrack::from_jamendo(record) {
                Ok(track) => {
                    write_track(&tx, &track, now)?;
                    report.imported += 1;
                }
                Err(err) => {
                    tracing::warn!(index, error = %err, "skipping Jamendo record");
                    report.skipped += 1;
                    report.errors.push(err.to_string());
                }
            }
            on_record(index + 1);
        }

        tx.commit()?;
        tracing::debug!(imported = report.imported, skipped = report.skipped, "import finished");
        Ok(report)
    }

    pub fn find_track(&self, track_id: i64) -> Result<Option<StoredTrack>> {
        let conn = self.lock()?;
        let track = conn
            .query_row(
                &format!("SELECT {TRACK_COLUMNS} FROM jamendo_tracks t WHERE t.id = ?1"),
                params![track_id],
                track_from_row,
            )
            .optional()?;
        Ok(track)
    }

    pub fn find_track_by_jamendo_id(&self, jamendo_id: i64) -> Result<Option<StoredTrack>> {
        let conn = self.lock()?;
        let track = conn
            .query_row(
                &format!("SELECT {TRACK_COLUMNS} FROM jamendo_tracks t WHERE t.jamendo_id = ?1"),
                params![jamendo_id],
                track_from_row,
            )
            .optional()?;
        Ok(track)
    }

    /// Tracks in the catalog's default order: best rated, then most downloaded.
    pub fn top_tracks(&self, limit: usize) -> Result<Vec<StoredTrack>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {TRACK_COLUMNS} FROM jamendo_tracks t
             ORDER BY t.stats_rate DESC, t.stats_downloads_total DESC, t.id ASC
             LIMIT ?1"
        ))?;
        let tracks = stmt
            .query_map(params![limit as i64], track_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tracks)
    }
}

fn write_track(conn: &Connection, track: &CatalogTrack, now: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO jamendo_tracks (
            jamendo_id, name, artist_name, artist_id, album_name, album_id, duration,
            position, releasedate, audio, audiodownload, image, album_image,
            musicinfo_tags_genres, musicinfo_tags_instruments, musicinfo_tags_vartags,
            stats_rate, stats_downloads_total, stats_playlisted, cached_at, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                   ?17, ?18, ?19, ?20, ?20)
         ON CONFLICT(jamendo_id) DO UPDATE SET
            name = excluded.name,
            artist_name = excluded.artist_name,
            artist_id = excluded.artist_id,
            album_name = excluded.album_name,
            album_id = excluded.album_id,
            duration = excluded.duration,
            position = excluded.position,
            releasedate = excluded.releasedate,
            audio = excluded.audio,
            audiodownload = excluded.audiodownload,
            image = excluded.image,
            album_image = excluded.album_image,
            musicinfo_tags_genres = excluded.musicinfo_tags_genres,
            musicinfo_tags_instruments = excluded.musicinfo_tags_instruments,
            musicinfo_tags_vartags = excluded.musicinfo_tags_vartags,
            stats_rate = excluded.stats_rate,
            stats_downloads_total = excluded.stats_downloads_total,
            cached_at = excluded.cached_at",
        params![
            track.jamendo_id,
            track.name,
            track.artist_name,
            track.artist_id,
            track.album_name,
            track.album_id,
            track.duration,
            track.position,
            track.releasedate.map(|d| d.format("%Y-%m-%d").to_string()),
            track.audio,
            track.audiodownload,
            track.image,
            track.album_image,
            track.musicinfo_tags_genres,
            track.musicinfo_tags_instruments,
            track.musicinfo_tags_vartags,
            track.stats_rate,
            track.stats_downloads_total,
            track.stats_playlisted,
            now,
        ],
    )?;
    Ok(())
}
