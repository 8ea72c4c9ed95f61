use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobfinder_api::config::Config;
use jobfinder_api::db::create_pool;
use jobfinder_api::routes::build_router;
use jobfinder_api::sources::registry::SourceRegistry;
use jobfinder_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.rust_log)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobFinder API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Construct the provider registry once and inject it everywhere
    let registry = Arc::new(SourceRegistry::with_default_providers());
    info!(
        "Registered job sources: {}",
        registry
            .get_all()
            .iter()
            .map(|s| s.id())
            .collect::<Vec<_>>()
            .join(", ")
    );

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        registry,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
