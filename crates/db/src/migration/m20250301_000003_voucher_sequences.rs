//! Voucher sequence migration.
//!
//! One counter row per entry category. Draft creation locks the row of its
//! category, so concurrent drafts take distinct numbers.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(VOUCHER_SEQUENCES_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS voucher_sequences CASCADE;")
            .await?;
        Ok(())
    }
}

const VOUCHER_SEQUENCES_SQL: &str = r"
CREATE TABLE voucher_sequences (
    category VARCHAR(16) PRIMARY KEY
        CHECK (category IN ('customer_due', 'receipt', 'supplier_due', 'payment', 'journal', 'contra')),
    last_value BIGINT NOT NULL DEFAULT 0 CHECK (last_value >= 0),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Carry forward numbers already issued before the counters existed
INSERT INTO voucher_sequences (category, last_value)
SELECT c.category,
       COALESCE((
           SELECT MAX(CAST(substring(e.voucher_no FROM '-([0-9]+)$') AS BIGINT))
           FROM journal_entries e
           WHERE e.category = c.category AND e.reverses_entry_id IS NULL
       ), 0)
FROM (VALUES ('customer_due'), ('receipt'), ('supplier_due'), ('payment'), ('journal'), ('contra'))
    AS c(category);
";
