//! Conversions between stored rows and ledger domain types.

use chrono::Utc;
use loom_core::ledger::{
    self, Account, JournalEntry, JournalLine, LedgerError, LedgerScope, LineFact,
};
use loom_shared::types::{
    AccountId, BankId, BuyerId, CompanyProfileId, JournalEntryId, JournalLineId, SupplierId,
};
use sea_orm::DbErr;
use uuid::Uuid;

use crate::entities::{
    accounts, journal_entries, journal_lines,
    sea_orm_active_enums::{AccountCategory, EntryCategory, EntryStatus, LineType, ScopeKind},
};

/// Maps a storage failure into the engine error.
pub fn db_err(err: DbErr) -> LedgerError {
    LedgerError::Database(err.to_string())
}

impl From<ledger::AccountCategory> for AccountCategory {
    fn from(value: ledger::AccountCategory) -> Self {
        match value {
            ledger::AccountCategory::Asset => Self::Asset,
            ledger::AccountCategory::Liability => Self::Liability,
            ledger::AccountCategory::Equity => Self::Equity,
            ledger::AccountCategory::Income => Self::Income,
            ledger::AccountCategory::Expense => Self::Expense,
        }
    }
}

impl From<AccountCategory> for ledger::AccountCategory {
    fn from(value: AccountCategory) -> Self {
        match value {
            AccountCategory::Asset => Self::Asset,
            AccountCategory::Liability => Self::Liability,
            AccountCategory::Equity => Self::Equity,
            AccountCategory::Income => Self::Income,
            AccountCategory::Expense => Self::Expense,
        }
    }
}

impl From<ledger::EntryStatus> for EntryStatus {
    fn from(value: ledger::EntryStatus) -> Self {
        match value {
            ledger::EntryStatus::Draft => Self::Draft,
            ledger::EntryStatus::Posted => Self::Posted,
        }
    }
}

impl From<EntryStatus> for ledger::EntryStatus {
    fn from(value: EntryStatus) -> Self {
        match value {
            EntryStatus::Draft => Self::Draft,
            EntryStatus::Posted => Self::Posted,
        }
    }
}

impl From<ledger::EntryCategory> for EntryCategory {
    fn from(value: ledger::EntryCategory) -> Self {
        match value {
            ledger::EntryCategory::CustomerDue => Self::CustomerDue,
            ledger::EntryCategory::Receipt => Self::Receipt,
            ledger::EntryCategory::SupplierDue => Self::SupplierDue,
            ledger::EntryCategory::Payment => Self::Payment,
            ledger::EntryCategory::Journal => Self::Journal,
            ledger::EntryCategory::Contra => Self::Contra,
        }
    }
}

impl From<EntryCategory> for ledger::EntryCategory {
    fn from(value: EntryCategory) -> Self {
        match value {
            EntryCategory::CustomerDue => Self::CustomerDue,
            EntryCategory::Receipt => Self::Receipt,
            EntryCategory::SupplierDue => Self::SupplierDue,
            EntryCategory::Payment => Self::Payment,
            EntryCategory::Journal => Self::Journal,
            EntryCategory::Contra => Self::Contra,
        }
    }
}

impl From<ledger::LineType> for LineType {
    fn from(value: ledger::LineType) -> Self {
        match value {
            ledger::LineType::Debit => Self::Debit,
            ledger::LineType::Credit => Self::Credit,
        }
    }
}

impl From<LineType> for ledger::LineType {
    fn from(value: LineType) -> Self {
        match value {
            LineType::Debit => Self::Debit,
            LineType::Credit => Self::Credit,
        }
    }
}

/// Splits a scope into its stored `(scope_kind, scope_id)` columns.
pub fn encode_scope(scope: LedgerScope) -> (ScopeKind, Option<Uuid>) {
    match scope {
        LedgerScope::None => (ScopeKind::None, None),
        LedgerScope::Buyer(id) => (ScopeKind::Buyer, Some(id.into_inner())),
        LedgerScope::Supplier(id) => (ScopeKind::Supplier, Some(id.into_inner())),
        LedgerScope::Bank(id) => (ScopeKind::Bank, Some(id.into_inner())),
    }
}

/// Rebuilds a scope from its stored columns.
pub fn decode_scope(kind: ScopeKind, id: Option<Uuid>) -> Result<LedgerScope, LedgerError> {
    match (kind, id) {
        (ScopeKind::None, _) => Ok(LedgerScope::None),
        (ScopeKind::Buyer, Some(id)) => Ok(LedgerScope::Buyer(BuyerId::from_uuid(id))),
        (ScopeKind::Supplier, Some(id)) => Ok(LedgerScope::Supplier(SupplierId::from_uuid(id))),
        (ScopeKind::Bank, Some(id)) => Ok(LedgerScope::Bank(BankId::from_uuid(id))),
        (kind, None) => Err(LedgerError::Internal(format!(
            "journal line scoped to {kind:?} without an id"
        ))),
    }
}

impl From<accounts::Model> for Account {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: AccountId::from_uuid(model.id),
            name: model.name,
            code: model.code,
            category: model.category.into(),
            opening_balance: model.opening_balance,
            balance: model.balance,
            parent_id: model.parent_id.map(AccountId::from_uuid),
            is_control: model.is_control,
            is_deleted: model.is_deleted,
        }
    }
}

/// Converts a stored line.
pub fn line_from_model(model: journal_lines::Model) -> Result<JournalLine, LedgerError> {
    Ok(JournalLine {
        id: JournalLineId::from_uuid(model.id),
        entry_id: JournalEntryId::from_uuid(model.entry_id),
        line_no: model.line_no,
        account_id: AccountId::from_uuid(model.account_id),
        line_type: model.line_type.into(),
        amount: model.amount,
        scope: decode_scope(model.scope_kind, model.scope_id)?,
    })
}

/// Converts a stored entry and its lines, ordering lines by line number.
pub fn entry_from_models(
    entry: journal_entries::Model,
    lines: Vec<journal_lines::Model>,
) -> Result<JournalEntry, LedgerError> {
    let mut lines = lines
        .into_iter()
        .map(line_from_model)
        .collect::<Result<Vec<_>, _>>()?;
    lines.sort_by_key(|l| l.line_no);

    Ok(JournalEntry {
        id: JournalEntryId::from_uuid(entry.id),
        voucher_no: entry.voucher_no,
        date: entry.date,
        category: entry.category.into(),
        narration: entry.narration,
        status: entry.status.into(),
        buyer_id: entry.buyer_id.map(BuyerId::from_uuid),
        supplier_id: entry.supplier_id.map(SupplierId::from_uuid),
        company_profile_id: CompanyProfileId::from_uuid(entry.company_profile_id),
        reverses: entry.reverses_entry_id.map(JournalEntryId::from_uuid),
        posted_at: entry.posted_at.map(|t| t.with_timezone(&Utc)),
        created_at: entry.created_at.with_timezone(&Utc),
        lines,
    })
}

/// Flattens a line with its entry header.
pub fn fact_from_models(
    line: journal_lines::Model,
    entry: &journal_entries::Model,
) -> Result<LineFact, LedgerError> {
    Ok(LineFact {
        entry_id: JournalEntryId::from_uuid(entry.id),
        date: entry.date,
        status: entry.status.into(),
        account_id: AccountId::from_uuid(line.account_id),
        line_type: line.line_type.into(),
        amount: line.amount,
        scope: decode_scope(line.scope_kind, line.scope_id)?,
    })
}
