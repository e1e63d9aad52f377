//! Double-entry bookkeeping logic.
//!
//! This module implements the journal engine's pure rules:
//! - Chart-of-accounts nodes and the category sign convention
//! - Journal entries, lines and their draft/posted state machine
//! - Draft validation and posting plans
//! - Reversal construction and voucher numbering
//! - Error types for ledger operations

pub mod account;
pub mod balance;
pub mod entry;
pub mod error;
pub mod reversal;
pub mod service;
pub mod types;
pub mod validation;
pub mod voucher;

#[cfg(test)]
mod service_props;

pub use account::Account;
pub use balance::{BalanceCheck, BalanceDelta, NormalSide, aggregate_deltas, replay_balance};
pub use entry::{JournalEntry, JournalLine, LineFact};
pub use error::LedgerError;
pub use reversal::{ReversalDraft, ReversalService};
pub use service::{AccountBalanceUpdate, LedgerService, PostingPlan};
pub use types::{
    AccountCategory, CreateDraftInput, EntryCategory, EntryStatus, EntryTotals,
    JournalLineInput, LedgerScope, LineType,
};
pub use validation::{ensure_balanced, parse_entry_date, validate_lines};
pub use validation::AMOUNT_SCALE;
pub use voucher::{next_voucher_no, reversal_sequence, reversal_voucher_no};
