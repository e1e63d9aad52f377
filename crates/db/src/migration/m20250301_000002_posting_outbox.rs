//! Posting outbox migration.
//!
//! Creates the table holding best-effort journal postings awaiting delivery.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(POSTING_OUTBOX_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS posting_outbox CASCADE;")
            .await?;
        Ok(())
    }
}

const POSTING_OUTBOX_SQL: &str = r"
CREATE TABLE posting_outbox (
    id UUID PRIMARY KEY,
    source VARCHAR(255) NOT NULL,
    payload TEXT NOT NULL,
    status VARCHAR(16) NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'delivered', 'dead')),
    attempts INTEGER NOT NULL DEFAULT 0 CHECK (attempts >= 0),
    next_attempt_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    last_error TEXT,
    entry_id UUID REFERENCES journal_entries(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Index for the worker's due-message scan
CREATE INDEX idx_outbox_due ON posting_outbox(next_attempt_at) WHERE status = 'pending';

-- Index for dead-letter review
CREATE INDEX idx_outbox_dead ON posting_outbox(updated_at DESC) WHERE status = 'dead';
";
