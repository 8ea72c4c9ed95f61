//! Periodic fetch runner. Runs every active search once (`--once`) or on an
//! hourly loop, and logs a summary per run.

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobfinder_api::config::Config;
use jobfinder_api::db::create_pool;
use jobfinder_api::ingest::service::{fetch_all_active_searches, FetchSummary};
use jobfinder_api::sources::registry::SourceRegistry;

const FETCH_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.rust_log)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("JobFinder worker starting");

    let db = create_pool(&config.database_url).await?;
    let registry = Arc::new(SourceRegistry::with_default_providers());

    let run_once = std::env::args().any(|arg| arg == "--once");
    if run_once {
        run_fetch(&db, &registry).await;
        info!("Single fetch complete");
        return Ok(());
    }

    info!(
        "Continuous mode: fetching every {}s (Ctrl+C to stop)",
        FETCH_INTERVAL.as_secs()
    );
    let mut ticker = tokio::time::interval(FETCH_INTERVAL);
    loop {
        tokio::select! {
            _ = ticker.tick() => run_fetch(&db, &registry).await,
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down worker");
                return Ok(());
            }
        }
    }
}

async fn run_fetch(db: &sqlx::PgPool, registry: &SourceRegistry) {
    info!("Starting job fetch run");

    let results = match fetch_all_active_searches(db, registry).await {
        Ok(results) => results,
        Err(e) => {
            error!("Fetch run failed: {e}");
            return;
        }
    };

    let summary = FetchSummary::from_results(&results);
    info!(
        "Fetch run complete: {} fetches, {} ok, {} failed, {} jobs found, {} new",
        summary.total_fetches,
        summary.successful,
        summary.failed,
        summary.total_jobs_found,
        summary.total_new_jobs
    );

    for failed in results.iter().filter(|r| !r.success) {
        warn!(
            "Failed fetch: provider={} error={}",
            failed.provider,
            failed.error.as_deref().unwrap_or("unknown")
        );
    }
}
