use jamcache_web::{config::Config, state::AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    jamcache_web::init_logging();

    let config = Config::from_env()?;
    let state = Arc::new(AppState::from_config(&config)?);
    let jamendo_configured = state.feeds.is_configured();
    if !jamendo_configured {
        tracing::warn!("JAMENDO_CLIENT_ID is not set; Jamendo feeds will answer 503");
    }

    let app = jamcache_web::router(state, &config.allowed_origins);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    tracing::info!(
        addr = %config.bind_addr,
        database = %config.database_url,
        jamendo_configured,
        "server running"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
