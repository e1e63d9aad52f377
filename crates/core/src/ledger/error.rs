//! Ledger error types for validation and state errors.
//!
//! Every failure of the journal engine surfaces as one of these variants,
//! each with a stable error code so operator mistakes (unbalanced vouchers,
//! double posting) are distinguishable from storage faults.

use loom_shared::types::{AccountId, JournalEntryId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines, got {0}")]
    InsufficientLines(usize),

    /// Line amount cannot be zero.
    #[error("Line amount cannot be zero (account {0})")]
    ZeroAmount(AccountId),

    /// Line amount cannot be negative.
    #[error("Line amount cannot be negative (account {0})")]
    NegativeAmount(AccountId),

    /// Date string could not be parsed.
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Line amount has more decimal places than the ledger stores.
    #[error("Line amount {amount} has more than {max_scale} decimal places (account {account_id})")]
    ExcessPrecision {
        /// Account of the offending line.
        account_id: AccountId,
        /// Amount as supplied.
        amount: Decimal,
        /// Largest scale accepted.
        max_scale: u32,
    },

    // ========== Posting Errors ==========
    /// Entry is not balanced (debits != credits).
    #[error("Unbalanced Entry: total debit {debit} does not equal total credit {credit}")]
    UnbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account is soft-deleted and cannot be used.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    /// Account is a control/aggregate account and takes no direct lines.
    #[error("Account {0} is a control account and does not allow direct posting")]
    ControlAccount(AccountId),

    // ========== Entry State Errors ==========
    /// Entry not found.
    #[error("Entry Not Found: {0}")]
    EntryNotFound(JournalEntryId),

    /// Entry has already been posted.
    #[error("Already Posted: journal entry {0} has already been posted")]
    AlreadyPosted(JournalEntryId),

    /// Posted entries cannot be discarded.
    #[error("Cannot discard posted journal entry {0}; reverse it instead")]
    CannotDiscardPosted(JournalEntryId),

    // ========== Database Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines(_) => "INSUFFICIENT_LINES",
            Self::ZeroAmount(_) => "ZERO_AMOUNT",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::InvalidDate(_) => "INVALID_DATE",
            Self::ExcessPrecision { .. } => "EXCESS_PRECISION",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::ControlAccount(_) => "CONTROL_ACCOUNT_NOT_POSTABLE",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::AlreadyPosted(_) => "ALREADY_POSTED",
            Self::CannotDiscardPosted(_) => "CANNOT_DISCARD_POSTED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InsufficientLines(_)
            | Self::ZeroAmount(_)
            | Self::NegativeAmount(_)
            | Self::InvalidDate(_)
            | Self::ExcessPrecision { .. }
            | Self::UnbalancedEntry { .. }
            | Self::AccountInactive(_)
            | Self::ControlAccount(_) => 400,

            // 404 Not Found
            Self::AccountNotFound(_) | Self::EntryNotFound(_) => 404,

            // 409 Conflict - state errors
            Self::AlreadyPosted(_) | Self::CannotDiscardPosted(_) => 409,

            // 500 Internal Server Error
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns true if retrying the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}
