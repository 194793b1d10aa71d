#![allow(dead_code)]

use serde_json::{Value, json};
use std::path::PathBuf;
use tempfile::TempDir;

pub fn track(id: &str, name: &str, rate: f64, downloads: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "duration": 185,
        "artist_id": "42",
        "artist_name": "Tryad",
        "audio": format!("https://prod-1.storage.jamendo.com/?trackid={id}&format=mp31"),
        "audiodownload": format!("https://prod-1.storage.jamendo.com/download/track/{id}/mp32/"),
        "musicinfo": {"tags": {"genres": ["rock"]}},
        "stats": {"rate": rate, "downloads_total": downloads, "playlisted": 0}
    })
}

/// Write `payload` to a JSON file inside a fresh temp dir.
pub fn write_payload(payload: &Value) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tracks.json");
    std::fs::write(&path, payload.to_string()).unwrap();
    (dir, path)
}
