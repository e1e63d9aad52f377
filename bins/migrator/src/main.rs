//! Database migration runner for Loom.
//!
//! Usage:
//!   migrator up      - Apply the ledger and outbox schema
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show which migrations are applied
//!   migrator fresh   - Drop every table and re-apply

use loom_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The CLI reads DATABASE_URL and installs its own tracing subscriber.
    cli::run_cli(Migrator).await;
}
