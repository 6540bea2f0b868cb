//! Periodic queue drain worker.
//!
//! Runs [`QueueDrainer::drain_once`] on a fixed interval, standing in for
//! an external cron trigger in deployments that do not have one. Each tick
//! is one complete cycle; overlap cannot occur because ticks are awaited
//! sequentially, and even a concurrent API-triggered cycle is safe thanks
//! to the store's status-guarded writes.

use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use dealdrop_dispatch::{HttpPushGateway, PgNotificationStore, QueueDrainer};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default seconds between drain cycles.
const DEFAULT_DRAIN_INTERVAL_SECS: u64 = 180;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dealdrop_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = dealdrop_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    dealdrop_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database connection established");

    let drainer = QueueDrainer::new(
        PgNotificationStore::new(pool),
        HttpPushGateway::from_env(),
    );

    let interval_secs: u64 = std::env::var("DRAIN_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_DRAIN_INTERVAL_SECS);
    tracing::info!(interval_secs, "Drain worker started");

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            signal_cancel.cancel();
        }
    });

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Drain worker stopping");
                break;
            }
            _ = interval.tick() => {
                match drainer.drain_once(Utc::now()).await {
                    Ok(report) => {
                        if report.processed > 0 {
                            tracing::info!(
                                processed = report.processed,
                                sent = report.sent,
                                skipped = report.skipped,
                                rescheduled = report.rescheduled,
                                "Drain cycle finished"
                            );
                        }
                    }
                    Err(e) => {
                        // Nothing was marked; the next tick retries.
                        tracing::error!(error = %e, "Drain cycle failed");
                    }
                }
            }
        }
    }

    Ok(())
}
