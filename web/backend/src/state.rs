use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::feeds::{SharedCache, TrackFeeds};
use crate::jamendo::JamendoClient;
use jamcache_core::{CatalogError, Clock, ResponseCache, SqliteStore, SystemClock};
use std::sync::Arc;

pub struct AppState {
    pub store: Arc<SqliteStore>,
    pub cache: Arc<SharedCache>,
    pub feeds: TrackFeeds,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, CatalogError> {
        let store = Arc::new(SqliteStore::open_url(&config.database_url)?);
        let client = JamendoClient::new(
            config.jamendo_client_id.clone(),
            config.jamendo_api_base.clone(),
        );
        Ok(Self::new(
            store,
            Arc::new(SystemClock),
            client,
            config.cache_ttl_seconds,
            config.hot_cache_ttl_seconds,
        ))
    }

    pub fn new(
        store: Arc<SqliteStore>,
        clock: Arc<dyn Clock>,
        client: JamendoClient,
        cache_ttl_seconds: u64,
        hot_cache_ttl_seconds: u64,
    ) -> Self {
        let cache = Arc::new(
            ResponseCache::with_clock(store.clone(), clock).default_ttl(cache_ttl_seconds),
        );
        let feeds = TrackFeeds::new(client, store.clone(), cache.clone(), hot_cache_ttl_seconds);

        Self {
            store,
            cache,
            feeds,
        }
    }

    /// Run a store operation on the blocking pool.
    pub async fn db<T, F>(&self, f: F) -> ApiResult<T>
    where
        F: FnOnce(&SqliteStore) -> jamcache_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        run_blocking(move || f(&store)).await
    }
}

pub(crate) async fn run_blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> jamcache_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(ApiError::from)?
        .map_err(ApiError::from)
}
