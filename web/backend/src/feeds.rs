//! Track feeds served through two cache tiers.
//!
//! Lookups go to the in-process hot tier first, then the persistent
//! [`ResponseCache`], and only then to Jamendo. Fresh upstream pages are
//! written to both tiers and their tracks are imported into the catalog.

use crate::error::ApiResult;
use crate::jamendo::{FeedQuery, JamendoClient};
use crate::state::run_blocking;
use jamcache_core::{Clock, ResponseCache, SqliteStore};
use moka::future::Cache;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub type SharedCache = ResponseCache<Arc<SqliteStore>, Arc<dyn Clock>>;

/// A page of upstream results and whether it came from a cache tier.
#[derive(Debug, Clone)]
pub struct FeedPage {
    pub payload: Value,
    pub cached: bool,
}

pub struct TrackFeeds {
    client: JamendoClient,
    store: Arc<SqliteStore>,
    cache: Arc<SharedCache>,
    hot: Option<Cache<String, Value>>,
}

impl TrackFeeds {
    /// A `hot_ttl_seconds` of zero disables the in-process tier.
    pub fn new(
        client: JamendoClient,
        store: Arc<SqliteStore>,
        cache: Arc<SharedCache>,
        hot_ttl_seconds: u64,
    ) -> Self {
        let hot = (hot_ttl_seconds > 0).then(|| {
            Cache::builder()
                .max_capacity(1_000)
                .time_to_live(Duration::from_secs(hot_ttl_seconds))
                .build()
        });

        Self {
            client,
            store,
            cache,
            hot,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    pub async fn fetch(&self, query: &FeedQuery) -> ApiResult<FeedPage> {
        if !query.is_cacheable() {
            let payload = self.client.fetch_tracks(query).await?;
            self.import(&payload).await;
            return Ok(FeedPage {
                payload,
                cached: false,
            });
        }

        let key = query.cache_key();

        if let Some(hot) = &self.hot {
            if let Some(payload) = hot.get(&key).await {
                tracing::debug!(%key, "hot cache hit");
                return Ok(FeedPage {
                    payload,
                    cached: true,
                });
            }
        }

        let cache = self.cache.clone();
        let lookup_key = key.clone();
        if let Some(payload) = run_blocking(move || cache.get(&lookup_key)).await? {
            self.remember(&key, &payload).await;
            return Ok(FeedPage {
                payload,
                cached: true,
            });
        }

        let payload = self.client.fetch_tracks(query).await?;

        let cache = self.cache.clone();
        let store_key = key.clone();
        let stored = payload.clone();
        run_blocking(move || cache.put(&store_key, stored)).await?;

        self.import(&payload).await;
        self.remember(&key, &payload).await;

        Ok(FeedPage {
            payload,
            cached: false,
        })
    }

    async fn remember(&self, key: &str, payload: &Value) {
        if let Some(hot) = &self.hot {
            hot.insert(key.to_string(), payload.clone()).await;
        }
    }

    /// Import failures never fail the request that fetched the page.
    async fn import(&self, payload: &Value) {
        let store = self.store.clone();
        let payload = payload.clone();
        match run_blocking(move || store.import_results(&payload)).await {
            Ok(report) => {
                if report.skipped > 0 {
                    tracing::warn!(
                        imported = report.imported,
                        skipped = report.skipped,
                        "some Jamendo tracks could not be imported"
                    );
                } else {
                    tracing::debug!(imported = report.imported, "imported Jamendo tracks");
                }
            }
            Err(e) => tracing::warn!(error = e.message(), "failed to import Jamendo tracks"),
        }
    }
}
