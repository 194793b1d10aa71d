use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One cached upstream response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// An entry is live only while `now` is strictly before `expires_at`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Local projection of a Jamendo track record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogTrack {
    pub jamendo_id: i64,
    pub name: String,
    pub artist_name: String,
    pub artist_id: i64,
    pub album_name: String,
    pub album_id: Option<i64>,
    pub duration: i64,
    pub position: i64,
    pub releasedate: Option<NaiveDate>,
    pub audio: String,
    pub audiodownload: String,
    pub image: String,
    pub album_image: String,
    /// JSON-encoded lists, kept as text the way they are stored.
    pub musicinfo_tags_genres: String,
    pub musicinfo_tags_instruments: String,
    pub musicinfo_tags_vartags: String,
    pub stats_rate: f64,
    pub stats_downloads_total: i64,
    pub stats_playlisted: i64,
}

impl CatalogTrack {
    pub fn genres(&self) -> Vec<String> {
        decode_tags(&self.musicinfo_tags_genres)
    }

    pub fn instruments(&self) -> Vec<String> {
        decode_tags(&self.musicinfo_tags_instruments)
    }

    pub fn vartags(&self) -> Vec<String> {
        decode_tags(&self.musicinfo_tags_vartags)
    }

    pub fn duration_formatted(&self) -> String {
        format_duration(self.duration)
    }
}

/// A catalog track as persisted, with its local id and bookkeeping times.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredTrack {
    pub id: i64,
    #[serde(flatten)]
    pub track: CatalogTrack,
    pub cached_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FavoriteMark {
    pub id: i64,
    pub user_id: String,
    pub track_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a favorite/unfavorite call with the track's counter after the write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FavoriteChange {
    pub track_id: i64,
    pub favorited: bool,
    pub favorite_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewPlay {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub track_id: i64,
    pub duration_played: u32,
    pub completed: bool,
    pub user_agent: String,
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayRecord {
    pub id: i64,
    pub user_id: Option<String>,
    pub session_id: String,
    pub track_id: i64,
    pub played_at: DateTime<Utc>,
    pub duration_played: u32,
    pub completed: bool,
    pub user_agent: String,
    pub ip_address: Option<String>,
}

impl PlayRecord {
    /// Percentage of the track that was heard. Zero when either side is unknown.
    pub fn completion_rate(&self, track_duration: i64) -> f64 {
        if track_duration > 0 && self.duration_played > 0 {
            f64::from(self.duration_played) / track_duration as f64 * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListeningStats {
    pub user_id: String,
    pub total_listening_time: i64,
    pub total_tracks_played: i64,
    pub total_tracks_completed: i64,
    pub favorite_genre: Option<String>,
    pub most_played_track: Option<i64>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ListeningStats {
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            total_listening_time: 0,
            total_tracks_played: 0,
            total_tracks_completed: 0,
            favorite_genre: None,
            most_played_track: None,
            updated_at: None,
        }
    }
}

/// Row counts used by health and operator tooling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub tracks: usize,
    pub favorites: usize,
    pub plays: usize,
    pub cache_entries: usize,
    pub expired_cache_entries: usize,
}

/// Decode a stored tag list. Anything that is not a JSON list of strings
/// reads as empty.
pub fn decode_tags(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    serde_json::from_str(raw).unwrap_or_default()
}

pub fn format_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return "00:00".to_string();
    }
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
