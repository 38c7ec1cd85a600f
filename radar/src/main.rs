use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use radar::api::{create_router, AppState};
use radar::config::Config;
use radar::db::{Database, LibSqlBackend, RadarBackend};
use radar::services::CacheSweepManager;
use radar::signals::{HttpSignalAdapter, SignalAdapter, UnconfiguredSignalAdapter};

#[derive(Parser)]
#[command(name = "radar")]
#[command(about = "A&R radar: artist scoring, pulse, insights and collaboration pairing")]
struct Args {
    /// Recompute every artist's score once, then exit without serving
    #[arg(long)]
    refresh_scores: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "radar=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if config.server.api_keys.is_empty() {
        tracing::warn!("RADAR_API_KEYS is not set. Every protected route will answer 401.");
    }

    tracing::info!("Initializing database...");
    let raw_db = Database::new(&config.database).await?;
    let db: Arc<dyn RadarBackend> = Arc::new(LibSqlBackend::new(raw_db));

    let adapter: Arc<dyn SignalAdapter> = match &config.signals.base_url {
        Some(url) => {
            tracing::info!("Using signal service at {}", url);
            Arc::new(HttpSignalAdapter::new(&config.signals)?)
        }
        None => {
            tracing::warn!(
                "SIGNALS_BASE_URL is not set. Scores will be computed from defaults and flagged partial."
            );
            Arc::new(UnconfiguredSignalAdapter)
        }
    };

    let state = AppState::new(config.clone(), db, adapter)?;

    if args.refresh_scores {
        let refreshed = state.refresher.run_once().await?;
        tracing::info!("Refreshed {} artist scores", refreshed);
        return Ok(());
    }

    let cancel_token = CancellationToken::new();

    tracing::info!(
        "Starting cache sweep manager... (interval={}s)",
        state.config.cache.sweep_interval_secs
    );
    let sweeper = CacheSweepManager::new(state.radar.clone(), state.config.cache.sweep_interval_secs);
    let token = cancel_token.child_token();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!("Cache sweep manager shutting down...");
                    break;
                }
                _ = tokio::time::sleep(tokio::time::Duration::from_secs(sweeper.interval_secs())) => {
                    if let Err(e) = sweeper.run_once().await {
                        tracing::error!("Cache sweep error: {}", e);
                    }
                }
            }
        }
    });

    if state.refresher.interval_secs() > 0 {
        tracing::info!(
            "Starting score refresh manager... (interval={}s)",
            state.refresher.interval_secs()
        );
        let refresher = state.refresher.clone();
        let token = cancel_token.child_token();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        tracing::info!("Score refresh manager shutting down...");
                        break;
                    }
                    _ = tokio::time::sleep(tokio::time::Duration::from_secs(refresher.interval_secs())) => {
                        if let Err(e) = refresher.run_once().await {
                            tracing::error!("Score refresh error: {}", e);
                        }
                    }
                }
            }
        });
    } else {
        tracing::info!("Periodic score refresh disabled");
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Radar starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token))
        .await?;

    Ok(())
}

async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, cancelling background tasks...");
    cancel_token.cancel();
}
