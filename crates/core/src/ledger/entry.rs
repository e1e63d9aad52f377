//! Journal entry and journal line domain types.

use chrono::{DateTime, NaiveDate, Utc};
use loom_shared::types::{
    AccountId, BuyerId, CompanyProfileId, JournalEntryId, JournalLineId, SupplierId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{EntryCategory, EntryStatus, EntryTotals, LedgerScope, LineType};

/// A single debit or credit leg of a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Unique identifier for this line.
    pub id: JournalLineId,
    /// The entry this line belongs to.
    pub entry_id: JournalEntryId,
    /// Position within the entry (1-based).
    pub line_no: i32,
    /// The account affected by this line.
    pub account_id: AccountId,
    /// Whether this is a debit or credit.
    pub line_type: LineType,
    /// Positive amount.
    pub amount: Decimal,
    /// Sub-ledger tag.
    pub scope: LedgerScope,
}

/// A journal entry with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: JournalEntryId,
    /// Human-facing voucher number.
    pub voucher_no: String,
    /// Entry date.
    pub date: NaiveDate,
    /// Business event category.
    pub category: EntryCategory,
    /// Optional narration.
    pub narration: Option<String>,
    /// Current status.
    pub status: EntryStatus,
    /// Buyer link.
    pub buyer_id: Option<BuyerId>,
    /// Supplier link.
    pub supplier_id: Option<SupplierId>,
    /// Company profile link.
    pub company_profile_id: CompanyProfileId,
    /// The entry this one reverses, resolved by ID lookup.
    pub reverses: Option<JournalEntryId>,
    /// When the entry was posted.
    pub posted_at: Option<DateTime<Utc>>,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
    /// Lines in line-number order.
    #[serde(default)]
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Returns the debit and credit totals of the entry's lines.
    #[must_use]
    pub fn totals(&self) -> EntryTotals {
        EntryTotals::from_lines(self.lines.iter().map(|l| (l.line_type, l.amount)))
    }

    /// Returns true if the entry can be posted.
    #[must_use]
    pub fn can_post(&self) -> bool {
        self.status.can_post()
    }

}

/// A flattened view of one line together with the header fields the
/// read-side reports need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineFact {
    /// Owning entry.
    pub entry_id: JournalEntryId,
    /// Entry date.
    pub date: NaiveDate,
    /// Entry status.
    pub status: EntryStatus,
    /// Account of the line.
    pub account_id: AccountId,
    /// Debit or credit.
    pub line_type: LineType,
    /// Positive amount.
    pub amount: Decimal,
    /// Sub-ledger tag.
    pub scope: LedgerScope,
}

impl LineFact {
    /// Returns true if the owning entry is posted.
    #[must_use]
    pub fn is_posted(&self) -> bool {
        self.status == EntryStatus::Posted
    }
}
