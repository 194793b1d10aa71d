/// Timestamps are stored as Unix milliseconds so range checks compare integers.
pub(super) const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS jamendo_api_cache (
    cache_key TEXT PRIMARY KEY NOT NULL,
    response_data TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    expires_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_api_cache_expires
    ON jamendo_api_cache(expires_at);

CREATE TABLE IF NOT EXISTS jamendo_tracks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    jamendo_id INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    artist_name TEXT NOT NULL,
    artist_id INTEGER NOT NULL,
    album_name TEXT NOT NULL DEFAULT '',
    album_id INTEGER,
    duration INTEGER NOT NULL,
    position INTEGER NOT NULL DEFAULT 1,
    releasedate TEXT,
    audio TEXT NOT NULL,
    audiodownload TEXT NOT NULL,
    image TEXT NOT NULL DEFAULT '',
    album_image TEXT NOT NULL DEFAULT '',
    musicinfo_tags_genres TEXT NOT NULL DEFAULT '',
    musicinfo_tags_instruments TEXT NOT NULL DEFAULT '',
    musicinfo_tags_vartags TEXT NOT NULL DEFAULT '',
    stats_rate REAL NOT NULL DEFAULT 0,
    stats_downloads_total INTEGER NOT NULL DEFAULT 0,
    stats_playlisted INTEGER NOT NULL DEFAULT 0,
    cached_at INTEGER NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tracks_artist ON jamendo_tracks(artist_name);
CREATE INDEX IF NOT EXISTS idx_tracks_album ON jamendo_tracks(album_name);
CREATE INDEX IF NOT EXISTS idx_tracks_rate ON jamendo_tracks(stats_rate);
CREATE INDEX IF NOT EXISTS idx_tracks_cached ON jamendo_tracks(cached_at);

CREATE TABLE IF NOT EXISTS user_favorite_tracks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    track_id INTEGER NOT NULL REFERENCES jamendo_tracks(id) ON DELETE CASCADE,
    created_at INTEGER NOT NULL,
    UNIQUE (user_id, track_id)
);

CREATE INDEX IF NOT EXISTS idx_favorites_user
    ON user_favorite_tracks(user_id, created_at);
CREATE INDEX IF NOT EXISTS idx_favorites_track
    ON user_favorite_tracks(track_id);

CREATE TABLE IF NOT EXISTS user_play_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT,
    track_id INTEGER NOT NULL REFERENCES jamendo_tracks(id) ON DELETE CASCADE,
    session_id TEXT NOT NULL DEFAULT '',
    played_at INTEGER NOT NULL,
    duration_played INTEGER NOT NULL DEFAULT 0,
    completed INTEGER NOT NULL DEFAULT 0,
    user_agent TEXT NOT NULL DEFAULT '',
    ip_address TEXT
);

CREATE INDEX IF NOT EXISTS idx_plays_user ON user_play_history(user_id, played_at);
CREATE INDEX IF NOT EXISTS idx_plays_session ON user_play_history(session_id, played_at);
CREATE INDEX IF NOT EXISTS idx_plays_track ON user_play_history(track_id, played_at);
CREATE INDEX IF NOT EXISTS idx_plays_played ON user_play_history(played_at);

CREATE TABLE IF NOT EXISTS user_listening_stats (
    user_id TEXT PRIMARY KEY NOT NULL,
    total_listening_time INTEGER NOT NULL DEFAULT 0,
    total_tracks_played INTEGER NOT NULL DEFAULT 0,
    total_tracks_completed INTEGER NOT NULL DEFAULT 0,
    updated_at INTEGER NOT NULL
);
"#;
