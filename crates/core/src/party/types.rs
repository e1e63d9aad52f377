//! Party ledger types.

use chrono::NaiveDate;
use loom_shared::types::{BuyerId, JournalEntryId, PageMeta, PageRequest, SupplierId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{EntryCategory, EntryStatus, LedgerScope, LineType};

/// The party whose ledger is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum PartyRef {
    /// A buyer. Debit increases the amount due.
    Buyer(BuyerId),
    /// A supplier. Credit increases the amount due.
    Supplier(SupplierId),
}

impl PartyRef {
    /// Returns `+1` when a line of `line_type` increases the amount due.
    #[must_use]
    pub fn sign(self, line_type: LineType) -> Decimal {
        match (self, line_type) {
            (Self::Buyer(_), LineType::Debit) | (Self::Supplier(_), LineType::Credit) => {
                Decimal::ONE
            }
            (Self::Buyer(_), LineType::Credit) | (Self::Supplier(_), LineType::Debit) => {
                Decimal::NEGATIVE_ONE
            }
        }
    }

    /// Returns true if a line with `scope` belongs to this party.
    #[must_use]
    pub fn owns(self, scope: LedgerScope) -> bool {
        match self {
            Self::Buyer(id) => scope.buyer() == Some(id),
            Self::Supplier(id) => scope.supplier() == Some(id),
        }
    }

    /// The scope value lines of this party carry.
    #[must_use]
    pub fn scope(self) -> LedgerScope {
        match self {
            Self::Buyer(id) => LedgerScope::Buyer(id),
            Self::Supplier(id) => LedgerScope::Supplier(id),
        }
    }
}

/// Party ledger request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyLedgerQuery {
    /// The party.
    pub party: PartyRef,
    /// Inclusive window start. Without it the opening balance is zero.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Inclusive window end.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Page of entry rows to return.
    #[serde(default)]
    pub page: PageRequest,
}

impl PartyLedgerQuery {
    /// Creates an unbounded query for the first page.
    #[must_use]
    pub fn new(party: PartyRef) -> Self {
        Self {
            party,
            start_date: None,
            end_date: None,
            page: PageRequest::default(),
        }
    }

    /// Restricts the window.
    #[must_use]
    pub fn between(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Selects a page.
    #[must_use]
    pub fn page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    /// Returns true if `date` falls before the window.
    #[must_use]
    pub fn is_before_window(&self, date: NaiveDate) -> bool {
        self.start_date.is_some_and(|start| date < start)
    }

    /// Returns true if `date` falls inside the window.
    #[must_use]
    pub fn is_in_window(&self, date: NaiveDate) -> bool {
        !self.is_before_window(date) && self.end_date.is_none_or(|end| date <= end)
    }
}

/// One entry's effect on the party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyLedgerRow {
    /// The entry.
    pub entry_id: JournalEntryId,
    /// Voucher number.
    pub voucher_no: String,
    /// Entry date.
    pub date: NaiveDate,
    /// Entry category.
    pub category: EntryCategory,
    /// Narration.
    pub narration: Option<String>,
    /// Draft rows show pending obligations.
    pub status: EntryStatus,
    /// Name of the other side, or the multi-account label.
    pub counter_account: String,
    /// Party-scoped debits on the entry.
    pub debit: Decimal,
    /// Party-scoped credits on the entry.
    pub credit: Decimal,
    /// Running balance after this entry.
    pub balance: Decimal,
}

/// A reconstructed party statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyLedger {
    /// The party.
    pub party: PartyRef,
    /// Balance carried into the window.
    pub opening_balance: Decimal,
    /// Balance after the last row of the whole window.
    pub closing_balance: Decimal,
    /// The requested page of rows.
    pub rows: Vec<PartyLedgerRow>,
    /// Pagination over entry rows.
    pub pagination: PageMeta,
}
