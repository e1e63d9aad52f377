//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the chart of accounts and journal
//! - Repositories that run postings inside locked transactions
//! - Database migrations

pub mod convert;
pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    AccountRepository, CreateAccountInput, DashboardRepository, DispatchReport, EntryFilter,
    JournalRepository, OutboxRepository, PartyLedgerRepository, PostingReceipt, ReportRepository,
};

use loom_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a pooled connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);
    Database::connect(options).await
}
