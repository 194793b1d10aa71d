pub mod config;
pub mod error;
pub mod feeds;
pub mod handlers;
pub mod jamendo;
pub mod library;
pub mod models;
pub mod state;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    routing::{get, post},
};
use state::AppState;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::EnvFilter;

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!("http.request", method = %request.method(), uri = %request.uri())
        })
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/api/health/", get(handlers::api_health))
        .route("/api/music/health/", get(handlers::music_health))
        .route("/api/users/health/", get(handlers::users_health))
        .route("/api/playlists/health/", get(handlers::playlists_health))
        .route("/api/jamendo/config/", get(handlers::jamendo_config))
        .route("/api/jamendo/search/", get(handlers::search_tracks))
        .route("/api/jamendo/tags/", get(handlers::available_tags))
        .route("/api/jamendo/tracks/tag/", get(handlers::tracks_by_tag))
        .route("/api/jamendo/tracks/popular/", get(handlers::popular_tracks))
        .route("/api/jamendo/tracks/latest/", get(handlers::latest_tracks))
        .route("/api/jamendo/tracks/random/", get(handlers::random_tracks))
        .route("/api/jamendo/tracks/:jamendo_id/", get(library::get_track))
        .route(
            "/api/jamendo/tracks/:jamendo_id/favorite/",
            post(library::favorite_track).delete(library::unfavorite_track),
        )
        .route("/api/jamendo/tracks/:jamendo_id/play/", post(library::record_play))
        .route("/api/users/favorites/", get(library::list_favorites))
        .route("/api/users/history/", get(library::play_history))
        .route("/api/users/stats/", get(library::listening_stats))
        .layer(trace)
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

/// `*` anywhere in the list opens CORS to every origin.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(library::USER_HEADER),
        ])
        .allow_credentials(true)
}
