use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.jamendo.com/v3.0";

/// Jamendo caps `limit` at 200 per request.
pub const MAX_LIMIT: u32 = 200;

#[derive(Debug, Error)]
pub enum JamendoError {
    #[error("Jamendo client id is not configured")]
    NotConfigured,

    #[error("Jamendo request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Jamendo API error: {0}")]
    Api(String),
}

/// A page of tracks the proxy knows how to ask Jamendo for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeedQuery {
    Search { query: String, limit: u32, offset: u32 },
    Tag { tag: String, limit: u32, offset: u32 },
    Popular { limit: u32, offset: u32 },
    Latest { limit: u32, offset: u32 },
    Random { limit: u32, offset: u32 },
}

impl FeedQuery {
    pub fn cache_key(&self) -> String {
        match self {
            FeedQuery::Search { query, limit, offset } => {
                format!("search:{}:{}:{}", query.to_lowercase(), limit, offset)
            }
            FeedQuery::Tag { tag, limit, offset } => {
                format!("tag:{}:{}:{}", tag.to_lowercase(), limit, offset)
            }
            FeedQuery::Popular { limit, offset } => format!("popular:{}:{}", limit, offset),
            FeedQuery::Latest { limit, offset } => format!("latest:{}:{}", limit, offset),
            FeedQuery::Random { limit, offset } => format!("random:{}:{}", limit, offset),
        }
    }

    /// Random pages are drawn fresh on every request.
    pub fn is_cacheable(&self) -> bool {
        !matches!(self, FeedQuery::Random { .. })
    }

    /// Search and tag text goes upstream lowercased, matching the cache key,
    /// so every casing of a query is served the same page.
    fn params(&self) -> Vec<(&'static str, String)> {
        let (mut params, limit, offset) = match self {
            FeedQuery::Search { query, limit, offset } => {
                (vec![("search", query.to_lowercase())], limit, offset)
            }
            FeedQuery::Tag { tag, limit, offset } => {
                (vec![("tags", tag.to_lowercase())], limit, offset)
            }
            FeedQuery::Popular { limit, offset } | FeedQuery::Random { limit, offset } => {
                (vec![("order", "popularity_total".to_string())], limit, offset)
            }
            FeedQuery::Latest { limit, offset } => {
                (vec![("order", "releasedate_desc".to_string())], limit, offset)
            }
        };
        params.push(("limit", limit.to_string()));
        params.push(("offset", offset.to_string()));
        params
    }
}

#[derive(Debug, Deserialize)]
struct JamendoHeaders {
    status: String,
    #[serde(default)]
    error_message: String,
}

#[derive(Clone)]
pub struct JamendoClient {
    client: Client,
    base_url: String,
    client_id: Option<String>,
}

impl JamendoClient {
    pub fn new(client_id: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client_id: client_id.filter(|id| !id.trim().is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client_id.is_some()
    }

    /// Fetch one page of tracks and return the raw response body.
    pub async fn fetch_tracks(&self, query: &FeedQuery) -> Result<Value, JamendoError> {
        let client_id = self.client_id.as_deref().ok_or(JamendoError::NotConfigured)?;

        let mut url = format!(
            "{}/tracks/?client_id={}&format=json&include=musicinfo+stats&audioformat=mp32",
            self.base_url,
            urlencoding::encode(client_id)
        );
        for (name, value) in query.params() {
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(&value));
        }

        tracing::debug!(key = %query.cache_key(), "requesting Jamendo tracks");
        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(10))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(JamendoError::Api(format!("HTTP {}", response.status())));
        }

        let body: Value = response.json().await?;
        check_headers(&body)?;
        Ok(body)
    }
}

/// Jamendo reports failures with HTTP 200 and a non-success `headers.status`.
fn check_headers(body: &Value) -> Result<(), JamendoError> {
    let Some(headers) = body.get("headers") else {
        return Ok(());
    };
    let headers: JamendoHeaders = serde_json::from_value(headers.clone())
        .map_err(|e| JamendoError::Api(format!("malformed response headers: {e}")))?;

    if headers.status == "success" {
        Ok(())
    } else if headers.error_message.is_empty() {
        Err(JamendoError::Api(headers.status))
    } else {
        Err(JamendoError::Api(headers.error_message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cache_keys_normalize_case() {
        let a = FeedQuery::Search { query: "LoFi".into(), limit: 50, offset: 0 };
        let b = FeedQuery::Search { query: "lofi".into(), limit: 50, offset: 0 };
        assert_eq!(a.cache_key(), b.cache_key());
        assert_ne!(
            FeedQuery::Popular { limit: 50, offset: 0 }.cache_key(),
            FeedQuery::Latest { limit: 50, offset: 0 }.cache_key()
        );
    }

    #[test]
    fn upstream_text_matches_the_cache_key() {
        let search = FeedQuery::Search { query: "LoFi".into(), limit: 50, offset: 0 };
        assert_eq!(search.cache_key(), "search:lofi:50:0");
        assert!(search.params().contains(&("search", "lofi".to_string())));

        let tag = FeedQuery::Tag { tag: "Jazz".into(), limit: 20, offset: 40 };
        assert_eq!(tag.cache_key(), "tag:jazz:20:40");
        assert_eq!(
            tag.params(),
            vec![
                ("tags", "jazz".to_string()),
                ("limit", "20".to_string()),
                ("offset", "40".to_string()),
            ]
        );
    }

    #[test]
    fn only_random_skips_cache() {
        assert!(FeedQuery::Popular { limit: 1, offset: 0 }.is_cacheable());
        assert!(!FeedQuery::Random { limit: 1, offset: 0 }.is_cacheable());
    }

    #[test]
    fn headers_with_failure_status_are_errors() {
        let ok = json!({"headers": {"status": "success"}, "results": []});
        assert!(check_headers(&ok).is_ok());

        let failed = json!({"headers": {"status": "failed", "error_message": "Invalid client id"}});
        match check_headers(&failed) {
            Err(JamendoError::Api(message)) => assert_eq!(message, "Invalid client id"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn unconfigured_client_refuses_to_fetch() {
        let client = JamendoClient::new(Some("  ".into()), DEFAULT_API_BASE);
        assert!(!client.is_configured());
        let err = client
            .fetch_tracks(&FeedQuery::Popular { limit: 1, offset: 0 })
            .await
            .unwrap_err();
        assert!(matches!(err, JamendoError::NotConfigured));
    }
}
