use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("missing required Jamendo field: {0}")]
    MissingField(&'static str),

    #[error("invalid value for Jamendo field {field}: {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("track {0} is not in the local catalog")]
    TrackNotFound(i64),

    #[error("user {user_id} already favorited track {track_id}")]
    AlreadyFavorited { user_id: String, track_id: i64 },

    #[error("user {user_id} has not favorited track {track_id}")]
    FavoriteNotFound { user_id: String, track_id: i64 },

    #[error("a play needs either a user or a session id")]
    MissingListener,

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("database lock poisoned")]
    LockPoisoned,
}

impl CatalogError {
    /// True for errors caused by the caller's input rather than the store.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            CatalogError::Storage(_)
                | CatalogError::Io(_)
                | CatalogError::Serialization(_)
                | CatalogError::LockPoisoned
        )
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
