#![allow(dead_code)]

use axum::{
    Json, Router,
    body::Body,
    extract::{Query, State},
    http::{Method, Request, StatusCode},
    routing::get,
};
use chrono::{TimeZone, Utc};
use jamcache_core::{CatalogTrack, ManualClock, SqliteStore, StoredTrack};
use jamcache_web::{jamendo::JamendoClient, state::AppState};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;

pub const CACHE_TTL_SECONDS: u64 = 3600;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<SqliteStore>,
    pub clock: ManualClock,
    upstream_hits: Arc<AtomicUsize>,
}

impl TestApp {
    pub fn upstream_hits(&self) -> usize {
        self.upstream_hits.load(Ordering::SeqCst)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn get_as(&self, uri: &str, user: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(user), None).await
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}

/// App wired to a local fake Jamendo. `hot_ttl_seconds` of zero leaves only
/// the persistent cache tier in front of the upstream.
pub async fn test_app(client_id: Option<&str>, hot_ttl_seconds: u64) -> TestApp {
    let (base_url, upstream_hits) = spawn_upstream().await;

    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
    let store = Arc::new(
        SqliteStore::open_in_memory()
            .unwrap()
            .with_clock(Arc::new(clock.clone())),
    );
    let state = AppState::new(
        store.clone(),
        Arc::new(clock.clone()),
        JamendoClient::new(client_id.map(str::to_string), base_url),
        CACHE_TTL_SECONDS,
        hot_ttl_seconds,
    );
    let origins = vec!["http://localhost:5173".to_string()];

    TestApp {
        router: jamcache_web::router(Arc::new(state), &origins),
        store,
        clock,
        upstream_hits,
    }
}

async fn spawn_upstream() -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/tracks/", get(fake_tracks))
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), hits)
}

/// Serves at most three tracks per page. `search=explode` answers the way
/// Jamendo does for a rejected request.
async fn fake_tracks(
    State(hits): State<Arc<AtomicUsize>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    hits.fetch_add(1, Ordering::SeqCst);

    if params.get("search").map(String::as_str) == Some("explode") {
        return Json(json!({
            "headers": {"status": "failed", "code": 5, "error_message": "Invalid client id"},
            "results": []
        }));
    }

    let limit: u64 = params
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(3)
        .min(3);
    let offset: u64 = params
        .get("offset")
        .and_then(|o| o.parse().ok())
        .unwrap_or(0);
    let results: Vec<Value> = (1..=limit)
        .map(|i| jamendo_track(offset + i, &format!("Track {}", offset + i)))
        .collect();

    Json(json!({
        "headers": {"status": "success", "code": 0, "error_message": "", "results_count": results.len()},
        "results": results
    }))
}

pub fn jamendo_track(id: u64, name: &str) -> Value {
    json!({
        "id": id.to_string(),
        "name": name,
        "duration": 245,
        "artist_id": "7890",
        "artist_name": "Tryad",
        "album_name": "Public Domain",
        "album_id": "1234",
        "position": 1,
        "releasedate": "2008-03-17",
        "album_image": "https://usercontent.jamendo.com/album/1234.jpg",
        "audio": format!("https://prod-1.storage.jamendo.com/?trackid={id}&format=mp31"),
        "audiodownload": format!("https://prod-1.storage.jamendo.com/download/track/{id}/mp32/"),
        "image": "https://usercontent.jamendo.com/track/1.jpg",
        "musicinfo": {
            "tags": {
                "genres": ["electronic", "ambient"],
                "instruments": ["synthesizer"],
                "vartags": ["calm"]
            }
        },
        "stats": {"rate": 4.5, "downloads_total": 1200, "playlisted": 2}
    })
}

pub fn seed_track(store: &SqliteStore, jamendo_id: u64) -> StoredTrack {
    let track = CatalogTrack::from_jamendo(&jamendo_track(jamendo_id, "Beauty Mark")).unwrap();
    store.upsert_track(&track).unwrap()
}
