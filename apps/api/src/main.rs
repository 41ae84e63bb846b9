use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobagent::config::Config;
use jobagent::routes::build_router;
use jobagent::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobagent v{}", env!("CARGO_PKG_VERSION"));

    // Catalog, sample résumé, skill-overlap scorer, and the model description
    let state = AppState::from_config(config.clone());
    {
        let agent = state.agent.read().await;
        info!(
            "Agent ready: {} jobs, scorer={}",
            agent.catalog().job_count(),
            agent.scorer().backend()
        );
    }
    info!(
        "Language model: {} parameters ({} layers, hidden={}); not used for scoring",
        state.model_info.language_model_parameters,
        state.model_info.num_layers,
        state.model_info.hidden_dim
    );

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once a frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
