use crate::jamendo::JamendoError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use jamcache_core::CatalogError;
use serde::Serialize;

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

/// An error already mapped to the HTTP status and machine code clients see.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        let (status, code) = match &err {
            CatalogError::TrackNotFound(_) => (StatusCode::NOT_FOUND, "TRACK_NOT_FOUND"),
            CatalogError::FavoriteNotFound { .. } => (StatusCode::NOT_FOUND, "FAVORITE_NOT_FOUND"),
            CatalogError::AlreadyFavorited { .. } => (StatusCode::CONFLICT, "ALREADY_FAVORITED"),
            CatalogError::MissingField(_) | CatalogError::InvalidField { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_TRACK")
            }
            CatalogError::MissingListener => (StatusCode::BAD_REQUEST, "MISSING_LISTENER"),
            CatalogError::Storage(_)
            | CatalogError::Io(_)
            | CatalogError::Serialization(_)
            | CatalogError::LockPoisoned => {
                tracing::error!(error = %err, "catalog storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR")
            }
        };
        ApiError::new(status, code, err.to_string())
    }
}

impl From<JamendoError> for ApiError {
    fn from(err: JamendoError) -> Self {
        match err {
            JamendoError::NotConfigured => ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "JAMENDO_NOT_CONFIGURED",
                "Jamendo integration is not configured",
            ),
            JamendoError::Http(e) => {
                tracing::warn!(error = %e, "Jamendo request failed");
                ApiError::new(StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE", e.to_string())
            }
            JamendoError::Api(message) => {
                tracing::warn!(%message, "Jamendo rejected the request");
                ApiError::new(StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", message)
            }
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        tracing::error!(error = %err, "blocking task failed");
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "internal error",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_errors_map_to_statuses() {
        let cases = [
            (CatalogError::TrackNotFound(1), StatusCode::NOT_FOUND),
            (
                CatalogError::AlreadyFavorited { user_id: "a".into(), track_id: 1 },
                StatusCode::CONFLICT,
            ),
            (
                CatalogError::FavoriteNotFound { user_id: "a".into(), track_id: 1 },
                StatusCode::NOT_FOUND,
            ),
            (CatalogError::MissingField("id"), StatusCode::UNPROCESSABLE_ENTITY),
            (CatalogError::MissingListener, StatusCode::BAD_REQUEST),
            (CatalogError::LockPoisoned, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn unconfigured_jamendo_is_unavailable() {
        let err = ApiError::from(JamendoError::NotConfigured);
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.code(), "JAMENDO_NOT_CONFIGURED");
    }
}
