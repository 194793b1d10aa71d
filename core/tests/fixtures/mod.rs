#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use jamcache_core::{CatalogTrack, ManualClock, SqliteStore, StoredTrack};
use serde_json::{Value, json};
use std::sync::Arc;

pub fn start_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn store_with_clock() -> (Arc<SqliteStore>, ManualClock) {
    let clock = ManualClock::new(start_time());
    let store = SqliteStore::open_in_memory()
        .unwrap()
        .with_clock(Arc::new(clock.clone()));
    (Arc::new(store), clock)
}

/// A track record shaped like Jamendo's `/tracks` results.
pub fn jamendo_track(id: &str, name: &str, genres: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "duration": 245,
        "artist_id": "7890",
        "artist_name": "Tryad",
        "album_name": "Public Domain",
        "album_id": "1234",
        "position": 3,
        "releasedate": "2008-03-17",
        "album_image": "https://usercontent.jamendo.com/album/1234.jpg",
        "audio": format!("https://prod-1.storage.jamendo.com/?trackid={id}&format=mp31"),
        "audiodownload": format!("https://prod-1.storage.jamendo.com/download/track/{id}/mp32/"),
        "image": "https://usercontent.jamendo.com/track/1.jpg",
        "musicinfo": {
            "vocalinstrumental": "instrumental",
            "tags": {
                "genres": genres,
                "instruments": ["synthesizer"],
                "vartags": ["energetic"]
            }
        },
        "stats": {
            "rate": 4.5,
            "downloads_total": 1200,
            "playlisted": 2
        }
    })
}

pub fn seed_track(store: &SqliteStore, jamendo_id: i64, genres: &[&str]) -> StoredTrack {
    let data = jamendo_track(&jamendo_id.to_string(), "Beauty Mark", genres);
    let track = CatalogTrack::from_jamendo(&data).unwrap();
    store.upsert_track(&track).unwrap()
}
