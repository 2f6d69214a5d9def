use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use taxon_client::{
    DEFAULT_INFERENCE_URL, DEFAULT_MODEL, DocTitleParser, MainTextExtractor, PageFetcher,
    ZeroShotClassifier,
};
use taxon_core::{ClassifyService, TitleCache, cache};
use taxon_server::routes;
use taxon_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("taxon=info".parse()?))
        .with_target(false)
        .init();

    let port = std::env::var("TAXON_SERVER_PORT").unwrap_or_else(|_| "8000".to_string());
    let addr = format!("0.0.0.0:{port}");

    let base_url = std::env::var("TAXON_CLASSIFIER_URL")
        .unwrap_or_else(|_| DEFAULT_INFERENCE_URL.to_string());
    let model =
        std::env::var("TAXON_CLASSIFIER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
    let token = std::env::var("TAXON_CLASSIFIER_TOKEN").ok();

    let capacity = env_or("TAXON_CACHE_CAPACITY", cache::DEFAULT_CAPACITY)?;
    let ttl_secs = env_or("TAXON_CACHE_TTL_SECS", cache::DEFAULT_TTL.as_secs())?;

    let pipeline = ClassifyService::new(
        PageFetcher::new()?,
        DocTitleParser,
        MainTextExtractor::new(),
        ZeroShotClassifier::with_config(&base_url, &model, token)?,
        Arc::new(TitleCache::new(capacity, Duration::from_secs(ttl_secs))),
    );

    let state = Arc::new(AppState { pipeline });

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Starting server on {addr}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Parse an environment variable, falling back to `default` when unset.
fn env_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {name}: {e}")),
        Err(_) => Ok(default),
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    tracing::info!("Shutdown signal received");
}
