//! Ledger schema migration.
//!
//! Creates the chart of accounts, journal entries and journal lines.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS journal_lines CASCADE;
             DROP TABLE IF EXISTS journal_entries CASCADE;
             DROP TABLE IF EXISTS accounts CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    code VARCHAR(20),
    category VARCHAR(16) NOT NULL
        CHECK (category IN ('asset', 'liability', 'equity', 'income', 'expense')),
    opening_balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    -- Cache of opening_balance plus posted line deltas; written only by posting
    balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    parent_id UUID REFERENCES accounts(id),
    is_control BOOLEAN NOT NULL DEFAULT false,
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE UNIQUE INDEX idx_accounts_code ON accounts(code) WHERE code IS NOT NULL;
CREATE INDEX idx_accounts_category ON accounts(category) WHERE is_deleted = false;
CREATE INDEX idx_accounts_parent ON accounts(parent_id) WHERE parent_id IS NOT NULL;
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY,
    voucher_no VARCHAR(64) NOT NULL UNIQUE,
    date DATE NOT NULL,
    category VARCHAR(16) NOT NULL
        CHECK (category IN ('customer_due', 'receipt', 'supplier_due', 'payment', 'journal', 'contra')),
    narration TEXT,
    status VARCHAR(16) NOT NULL DEFAULT 'draft'
        CHECK (status IN ('draft', 'posted')),
    buyer_id UUID,
    supplier_id UUID,
    company_profile_id UUID NOT NULL,
    reverses_entry_id UUID REFERENCES journal_entries(id),
    posted_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_posted_at CHECK ((status = 'posted') = (posted_at IS NOT NULL))
);

CREATE INDEX idx_entries_date ON journal_entries(date, created_at);
CREATE INDEX idx_entries_category ON journal_entries(category) WHERE reverses_entry_id IS NULL;
CREATE INDEX idx_entries_reverses ON journal_entries(reverses_entry_id) WHERE reverses_entry_id IS NOT NULL;
CREATE INDEX idx_entries_status ON journal_entries(status, date);
";

const JOURNAL_LINES_SQL: &str = r"
CREATE TABLE journal_lines (
    id UUID PRIMARY KEY,
    entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    line_no INTEGER NOT NULL,
    account_id UUID NOT NULL REFERENCES accounts(id),
    line_type VARCHAR(16) NOT NULL CHECK (line_type IN ('debit', 'credit')),
    amount NUMERIC(19, 4) NOT NULL CHECK (amount > 0),
    scope_kind VARCHAR(16) NOT NULL DEFAULT 'none'
        CHECK (scope_kind IN ('none', 'buyer', 'supplier', 'bank')),
    scope_id UUID,
    UNIQUE (entry_id, line_no),
    CONSTRAINT chk_scope_id CHECK ((scope_kind = 'none') = (scope_id IS NULL))
);

CREATE INDEX idx_lines_account ON journal_lines(account_id);
CREATE INDEX idx_lines_scope ON journal_lines(scope_kind, scope_id) WHERE scope_kind <> 'none';
";
