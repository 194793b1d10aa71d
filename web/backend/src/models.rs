use chrono::{DateTime, NaiveDate, Utc};
use jamcache_core::{ListeningStats, PlayRecord, StoredTrack};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_FEED_LIMIT: u32 = 50;
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Genres offered by the `tags/` endpoint.
pub const AVAILABLE_TAGS: [&str; 10] = [
    "pop",
    "rock",
    "electronic",
    "jazz",
    "classical",
    "hiphop",
    "metal",
    "world",
    "soundtrack",
    "lounge",
];

fn default_feed_limit() -> u32 {
    DEFAULT_FEED_LIMIT
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_feed_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

#[derive(Deserialize)]
pub struct TagQuery {
    #[serde(default)]
    pub tag: String,
    #[serde(default = "default_feed_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

#[derive(Deserialize)]
pub struct FeedParams {
    #[serde(default = "default_feed_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: String,
    pub jamendo_configured: bool,
    pub active_apps: Vec<&'static str>,
    pub features: Features,
}

#[derive(Serialize)]
pub struct Features {
    pub jamendo_integration: bool,
}

#[derive(Serialize)]
pub struct AppHealthResponse {
    pub status: &'static str,
    pub app: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Serialize)]
pub struct JamendoConfigResponse {
    pub available: bool,
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct FeedResponse {
    pub results: Vec<Value>,
    pub count: usize,
    pub cached: bool,
}

#[derive(Serialize)]
pub struct TagsResponse {
    pub results: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct TrackStats {
    pub rate: f64,
    pub downloads_total: i64,
    pub playlisted: i64,
}

/// A catalog track with its tag lists decoded for clients.
#[derive(Serialize)]
pub struct TrackResponse {
    pub id: i64,
    pub jamendo_id: i64,
    pub name: String,
    pub artist_name: String,
    pub artist_id: i64,
    pub album_name: String,
    pub album_id: Option<i64>,
    pub duration: i64,
    pub duration_formatted: String,
    pub position: i64,
    pub releasedate: Option<NaiveDate>,
    pub audio: String,
    pub audiodownload: String,
    pub image: String,
    pub album_image: String,
    pub genres: Vec<String>,
    pub instruments: Vec<String>,
    pub vartags: Vec<String>,
    pub stats: TrackStats,
    pub cached_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

impl From<StoredTrack> for TrackResponse {
    fn from(stored: StoredTrack) -> Self {
        let track = stored.track;
        Self {
            id: stored.id,
            duration_formatted: track.duration_formatted(),
            genres: track.genres(),
            instruments: track.instruments(),
            vartags: track.vartags(),
            jamendo_id: track.jamendo_id,
            name: track.name,
            artist_name: track.artist_name,
            artist_id: track.artist_id,
            album_name: track.album_name,
            album_id: track.album_id,
            duration: track.duration,
            position: track.position,
            releasedate: track.releasedate,
            audio: track.audio,
            audiodownload: track.audiodownload,
            image: track.image,
            album_image: track.album_image,
            stats: TrackStats {
                rate: track.stats_rate,
                downloads_total: track.stats_downloads_total,
                playlisted: track.stats_playlisted,
            },
            cached_at: stored.cached_at,
            is_favorite: None,
        }
    }
}

#[derive(Serialize)]
pub struct TrackListResponse {
    pub results: Vec<TrackResponse>,
    pub count: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayRequest {
    pub session_id: Option<String>,
    #[serde(default)]
    pub duration_played: u32,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Serialize)]
pub struct PlayResponse {
    #[serde(flatten)]
    pub play: PlayRecord,
    pub completion_rate: f64,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub results: Vec<PlayResponse>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: ListeningStats,
    pub favorites_count: usize,
}
