mod config;
mod errors;
mod generation;
mod loader;
mod metrics;
mod parsers;
mod profiles;
mod routes;
mod sections;
mod state;

use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::generation::backend::HttpScriptBackend;
use crate::metrics::TracingMetrics;
use crate::profiles::ProfileSet;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let profiles = ProfileSet::load(config.profiles_path.as_deref())
        .context("failed to load industry profiles")?;
    tracing::info!(profiles = profiles.len(), "loaded industry profiles");

    let backend = HttpScriptBackend::new(&config.generator_url, config.generator_timeout_secs)?;
    tracing::info!(generator_url = %config.generator_url, "generation backend configured");

    let state = AppState {
        backend: Arc::new(backend),
        profiles: Arc::new(profiles),
        metrics: Arc::new(TracingMetrics),
        config: config.clone(),
    };

    let app = routes::build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, app)
        .await
        .context("server exited unexpectedly")?;

    Ok(())
}
