//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration.

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_ledger;
mod m20250301_000002_posting_outbox;
mod m20250301_000003_voucher_sequences;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_ledger::Migration),
            Box::new(m20250301_000002_posting_outbox::Migration),
            Box::new(m20250301_000003_voucher_sequences::Migration),
        ]
    }
}
