//! Per-listener endpoints: favorites, plays and listening stats.

use crate::error::{ApiError, ApiResult};
use crate::models::{
    HistoryQuery, HistoryResponse, PlayRequest, PlayResponse, StatsResponse, TrackListResponse,
    TrackResponse,
};
use crate::state::AppState;
use axum::{
    Json,
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{HeaderMap, StatusCode, header, request::Parts},
};
use jamcache_core::{CatalogError, FavoriteChange, NewPlay, SqliteStore, StoredTrack};
use std::sync::Arc;

pub const USER_HEADER: &str = "x-user-id";

/// Caller identity taken from the `X-User-Id` header.
#[derive(Debug, Clone)]
pub struct UserId(pub String);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for UserId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| UserId(value.to_string()))
            .ok_or_else(|| ApiError::unauthorized("missing X-User-Id header"))
    }
}

/// `:jamendo_id` path segment. A non-integer id is rejected with the usual
/// JSON error body instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy)]
pub struct JamendoId(pub i64);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for JamendoId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(jamendo_id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(%rejection, "rejected track id");
                ApiError::bad_request("track id must be an integer")
            })?;
        Ok(JamendoId(jamendo_id))
    }
}

fn track_by_jamendo_id(store: &SqliteStore, jamendo_id: i64) -> jamcache_core::Result<StoredTrack> {
    store
        .find_track_by_jamendo_id(jamendo_id)?
        .ok_or(CatalogError::TrackNotFound(jamendo_id))
}

pub async fn get_track(
    State(state): State<Arc<AppState>>,
    JamendoId(jamendo_id): JamendoId,
    user: Option<UserId>,
) -> ApiResult<Json<TrackResponse>> {
    let (track, is_favorite) = state
        .db(move |store| {
            let track = track_by_jamendo_id(store, jamendo_id)?;
            let is_favorite = match user {
                Some(UserId(user_id)) => Some(store.is_favorite(&user_id, track.id)?),
                None => None,
            };
            Ok((track, is_favorite))
        })
        .await?;

    let mut response = TrackResponse::from(track);
    response.is_favorite = is_favorite;
    Ok(Json(response))
}

pub async fn favorite_track(
    State(state): State<Arc<AppState>>,
    JamendoId(jamendo_id): JamendoId,
    UserId(user_id): UserId,
) -> ApiResult<(StatusCode, Json<FavoriteChange>)> {
    let change = state
        .db(move |store| {
            let track = track_by_jamendo_id(store, jamendo_id)?;
            store.add_favorite(&user_id, track.id)
        })
        .await?;
    tracing::info!(jamendo_id, count = change.favorite_count, "track favorited");
    Ok((StatusCode::CREATED, Json(change)))
}

pub async fn unfavorite_track(
    State(state): State<Arc<AppState>>,
    JamendoId(jamendo_id): JamendoId,
    UserId(user_id): UserId,
) -> ApiResult<Json<FavoriteChange>> {
    let change = state
        .db(move |store| {
            let track = track_by_jamendo_id(store, jamendo_id)?;
            store.remove_favorite(&user_id, track.id)
        })
        .await?;
    tracing::info!(jamendo_id, count = change.favorite_count, "track unfavorited");
    Ok(Json(change))
}

/// Record a play. Anonymous listeners without a session get a fresh one,
/// returned in the response so the client can reuse it.
pub async fn record_play(
    State(state): State<Arc<AppState>>,
    JamendoId(jamendo_id): JamendoId,
    user: Option<UserId>,
    headers: HeaderMap,
    Json(request): Json<PlayRequest>,
) -> ApiResult<(StatusCode, Json<PlayResponse>)> {
    let user_id = user.map(|UserId(id)| id);
    let session_id = request
        .session_id
        .filter(|session| !session.trim().is_empty())
        .or_else(|| user_id.is_none().then(|| uuid::Uuid::new_v4().to_string()));

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let (play, duration) = state
        .db(move |store| {
            let track = track_by_jamendo_id(store, jamendo_id)?;
            let play = store.record_play(&NewPlay {
                user_id,
                session_id,
                track_id: track.id,
                duration_played: request.duration_played,
                completed: request.completed,
                user_agent,
                ip_address: client_ip(&headers),
            })?;
            Ok((play, track.track.duration))
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PlayResponse {
            completion_rate: play.completion_rate(duration),
            play,
        }),
    ))
}

pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
) -> ApiResult<Json<TrackListResponse>> {
    let tracks = state.db(move |store| store.list_favorites(&user_id)).await?;
    let results: Vec<TrackResponse> = tracks
        .into_iter()
        .map(|track| TrackResponse {
            is_favorite: Some(true),
            ..TrackResponse::from(track)
        })
        .collect();
    Ok(Json(TrackListResponse {
        count: results.len(),
        results,
    }))
}

pub async fn play_history(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Query(params): Query<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let limit = params.limit.clamp(1, 500);
    let plays = state
        .db(move |store| {
            let history = store.play_history_with_durations(&user_id, limit)?;
            Ok(history
                .into_iter()
                .map(|(play, duration)| PlayResponse {
                    completion_rate: play.completion_rate(duration),
                    play,
                })
                .collect::<Vec<_>>())
        })
        .await?;

    Ok(Json(HistoryResponse {
        count: plays.len(),
        results: plays,
    }))
}

pub async fn listening_stats(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
) -> ApiResult<Json<StatsResponse>> {
    let response = state
        .db(move |store| {
            let stats = store.listening_stats(&user_id)?;
            let favorites_count = store.favorite_count(&user_id)?;
            Ok(StatsResponse {
                stats,
                favorites_count,
            })
        })
        .await?;
    Ok(Json(response))
}

/// First hop of `X-Forwarded-For`, else `X-Real-IP`.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|value| value.to_str().ok())
        })
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn client_ip_prefers_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_ip(&headers).as_deref(), Some("10.0.0.2"));

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers).as_deref(), Some("203.0.113.9"));
        assert_eq!(client_ip(&HeaderMap::new()), None);
    }
}
