//! Loom posting worker.
//!
//! Drains the posting outbox on a fixed interval: each due request becomes
//! a journal draft, posted right away when the caller asked for it.

use std::time::Duration;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use loom_core::outbox::RetryPolicy;
use loom_db::{OutboxRepository, connect};
use loom_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loom=debug,loom_db=debug,loom_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = connect(&config.database)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    let outbox = OutboxRepository::new(db);
    let policy = RetryPolicy::from(&config.outbox);
    let batch_size = config.outbox.batch_size;

    let mut ticker = tokio::time::interval(Duration::from_secs(
        config.outbox.poll_interval_secs.max(1),
    ));
    info!(
        batch_size,
        max_attempts = policy.max_attempts,
        "posting worker started"
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match outbox.dispatch_due(&policy, batch_size).await {
                    Ok(report) if report.delivered + report.retried + report.dead > 0 => {
                        info!(
                            delivered = report.delivered,
                            retried = report.retried,
                            dead = report.dead,
                            "outbox round finished"
                        );
                    }
                    Ok(_) => {}
                    Err(err) => error!(error = %err, "outbox round failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}
