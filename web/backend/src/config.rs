use crate::jamendo::DEFAULT_API_BASE;
use jamcache_core::DEFAULT_TTL_SECONDS;
use std::net::SocketAddr;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_DATABASE_URL: &str = "db.sqlite3";
const DEFAULT_HOT_CACHE_TTL_SECONDS: u64 = 60;
const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub jamendo_client_id: Option<String>,
    pub jamendo_api_base: String,
    pub allowed_origins: Vec<String>,
    pub cache_ttl_seconds: u64,
    pub hot_cache_ttl_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_addr = parse_or(var("BIND_ADDR"), "BIND_ADDR", DEFAULT_BIND_ADDR)?;
        let cache_ttl_seconds = match var("CACHE_TTL_SECONDS") {
            Some(raw) => parse(&raw, "CACHE_TTL_SECONDS")?,
            None => DEFAULT_TTL_SECONDS,
        };
        let hot_cache_ttl_seconds = match var("HOT_CACHE_TTL_SECONDS") {
            Some(raw) => parse(&raw, "HOT_CACHE_TTL_SECONDS")?,
            None => DEFAULT_HOT_CACHE_TTL_SECONDS,
        };

        let allowed_origins = match var("ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            bind_addr,
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            jamendo_client_id: var("JAMENDO_CLIENT_ID"),
            jamendo_api_base: var("JAMENDO_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            allowed_origins,
            cache_ttl_seconds,
            hot_cache_ttl_seconds,
        })
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

fn parse<T: std::str::FromStr>(raw: &str, name: &'static str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Invalid {
        name,
        value: raw.to_string(),
    })
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    name: &'static str,
    default: &str,
) -> Result<T, ConfigError> {
    parse(raw.as_deref().unwrap_or(default), name)
}
