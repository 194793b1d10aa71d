use crate::error::{ApiError, ApiResult};
use crate::feeds::FeedPage;
use crate::jamendo::{FeedQuery, MAX_LIMIT};
use crate::models::{
    AVAILABLE_TAGS, AppHealthResponse, Features, FeedParams, FeedResponse, HealthResponse,
    JamendoConfigResponse, SearchQuery, TagQuery, TagsResponse,
};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
};
use jamcache_core::response_results;
use rand::Rng;
use std::sync::Arc;

/// Upper bound for the offset a random page is drawn from.
const RANDOM_OFFSET_SPAN: u32 = 500;

pub async fn api_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let configured = state.feeds.is_configured();
    Json(HealthResponse {
        status: "healthy",
        message: "Jamcache API is running".to_string(),
        jamendo_configured: configured,
        active_apps: vec!["jamendo"],
        features: Features {
            jamendo_integration: configured,
        },
    })
}

pub async fn music_health() -> Json<AppHealthResponse> {
    Json(AppHealthResponse {
        status: "healthy",
        app: "music",
        message: Some("Music app is working"),
    })
}

pub async fn users_health() -> Json<AppHealthResponse> {
    Json(AppHealthResponse {
        status: "healthy",
        app: "users",
        message: None,
    })
}

pub async fn playlists_health() -> Json<AppHealthResponse> {
    Json(AppHealthResponse {
        status: "healthy",
        app: "playlists",
        message: None,
    })
}

pub async fn jamendo_config(State(state): State<Arc<AppState>>) -> Json<JamendoConfigResponse> {
    let available = state.feeds.is_configured();
    Json(JamendoConfigResponse {
        available,
        status: if available { "configured" } else { "not_configured" },
    })
}

pub async fn search_tracks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Json<FeedResponse>> {
    let query = params.q.trim();
    if query.is_empty() {
        return Ok(Json(FeedResponse {
            results: vec![],
            count: 0,
            cached: false,
        }));
    }

    let page = state
        .feeds
        .fetch(&FeedQuery::Search {
            query: query.to_string(),
            limit: clamp_limit(params.limit),
            offset: params.offset,
        })
        .await?;
    Ok(Json(feed_response(page)))
}

pub async fn tracks_by_tag(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TagQuery>,
) -> ApiResult<Json<FeedResponse>> {
    let tag = params.tag.trim();
    if tag.is_empty() {
        return Err(ApiError::bad_request("tag is required"));
    }

    let page = state
        .feeds
        .fetch(&FeedQuery::Tag {
            tag: tag.to_string(),
            limit: clamp_limit(params.limit),
            offset: params.offset,
        })
        .await?;
    Ok(Json(feed_response(page)))
}

pub async fn popular_tracks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FeedParams>,
) -> ApiResult<Json<FeedResponse>> {
    let page = state
        .feeds
        .fetch(&FeedQuery::Popular {
            limit: clamp_limit(params.limit),
            offset: params.offset,
        })
        .await?;
    Ok(Json(feed_response(page)))
}

pub async fn latest_tracks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FeedParams>,
) -> ApiResult<Json<FeedResponse>> {
    let page = state
        .feeds
        .fetch(&FeedQuery::Latest {
            limit: clamp_limit(params.limit),
            offset: params.offset,
        })
        .await?;
    Ok(Json(feed_response(page)))
}

/// A popular page at a random offset. The caller's `offset` is ignored.
pub async fn random_tracks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FeedParams>,
) -> ApiResult<Json<FeedResponse>> {
    let offset = rand::rng().random_range(0..=RANDOM_OFFSET_SPAN);
    let page = state
        .feeds
        .fetch(&FeedQuery::Random {
            limit: clamp_limit(params.limit),
            offset,
        })
        .await?;
    Ok(Json(feed_response(page)))
}

pub async fn available_tags() -> Json<TagsResponse> {
    Json(TagsResponse {
        results: AVAILABLE_TAGS.to_vec(),
    })
}

fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_LIMIT)
}

fn feed_response(page: FeedPage) -> FeedResponse {
    let results = response_results(&page.payload).to_vec();
    FeedResponse {
        count: results.len(),
        results,
        cached: page.cached,
    }
}
