//! Ledger domain types for journal entry creation and posting.
//!
//! This module defines the core enums and inputs used by the journal engine
//! in the double-entry bookkeeping system.

use chrono::NaiveDate;
use loom_shared::types::{AccountId, BankId, BuyerId, CompanyProfileId, SupplierId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Line type: either Debit or Credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LineType {
    /// Debit leg.
    Debit,
    /// Credit leg.
    Credit,
}

impl LineType {
    /// Returns the other side of the entry.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// Chart-of-accounts category.
///
/// The category fixes the sign convention applied when a posted line moves
/// the account's running balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountCategory {
    /// Resources owned. Increases with debit.
    Asset,
    /// Obligations owed. Increases with credit.
    Liability,
    /// Owner's residual interest. Increases with credit.
    Equity,
    /// Revenue earned. Increases with credit.
    Income,
    /// Costs incurred. Increases with debit.
    Expense,
}

/// Journal entry lifecycle status.
///
/// `Draft --post--> Posted` is the only transition; cancellation of a posted
/// entry is modelled by a reversing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryStatus {
    /// Entry is a placeholder and does not affect balances.
    Draft,
    /// Entry has been posted to the ledger (immutable).
    Posted,
}

impl EntryStatus {
    /// Returns true if the entry may be posted.
    #[must_use]
    pub const fn can_post(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry's lines may no longer change.
    #[must_use]
    pub const fn is_immutable(self) -> bool {
        matches!(self, Self::Posted)
    }
}

/// Business event that produced a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryCategory {
    /// Amount due from a buyer (sales invoice).
    CustomerDue,
    /// Money received from a buyer.
    Receipt,
    /// Amount due to a supplier (purchase bill).
    SupplierDue,
    /// Money paid to a supplier.
    Payment,
    /// General journal voucher.
    Journal,
    /// Transfer between cash and bank accounts.
    Contra,
}

impl EntryCategory {
    /// All categories, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::CustomerDue,
        Self::Receipt,
        Self::SupplierDue,
        Self::Payment,
        Self::Journal,
        Self::Contra,
    ];

    /// Voucher number prefix for entries of this category.
    #[must_use]
    pub const fn voucher_prefix(self) -> &'static str {
        match self {
            Self::CustomerDue => "CD",
            Self::Receipt => "RV",
            Self::SupplierDue => "SD",
            Self::Payment => "PV",
            Self::Journal => "JE",
            Self::Contra => "CV",
        }
    }
}

/// Sub-ledger scope of a journal line.
///
/// A line belongs to at most one party or bank sub-ledger; party ledgers
/// select lines by this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum LedgerScope {
    /// General ledger only.
    #[default]
    None,
    /// Buyer (receivable) sub-ledger.
    Buyer(BuyerId),
    /// Supplier (payable) sub-ledger.
    Supplier(SupplierId),
    /// Bank sub-ledger.
    Bank(BankId),
}

impl LedgerScope {
    /// Returns the buyer this line is scoped to, if any.
    #[must_use]
    pub const fn buyer(self) -> Option<BuyerId> {
        match self {
            Self::Buyer(id) => Some(id),
            _ => None,
        }
    }

    /// Returns the supplier this line is scoped to, if any.
    #[must_use]
    pub const fn supplier(self) -> Option<SupplierId> {
        match self {
            Self::Supplier(id) => Some(id),
            _ => None,
        }
    }

}

/// Input for a single journal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLineInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// Whether this is a debit or credit leg.
    pub line_type: LineType,
    /// The amount (must be positive).
    pub amount: Decimal,
    /// Sub-ledger tag.
    #[serde(default)]
    pub scope: LedgerScope,
}

impl JournalLineInput {
    /// Creates a general-ledger debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            line_type: LineType::Debit,
            amount,
            scope: LedgerScope::None,
        }
    }

    /// Creates a general-ledger credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            line_type: LineType::Credit,
            amount,
            scope: LedgerScope::None,
        }
    }

    /// Tags the line with a sub-ledger scope.
    #[must_use]
    pub fn scoped(mut self, scope: LedgerScope) -> Self {
        self.scope = scope;
        self
    }
}

/// Input for creating a draft journal entry.
///
/// Supplied by calling modules (invoices, loans, payments, receipts) with
/// lines they have already chosen and validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDraftInput {
    /// The date of the entry.
    pub date: NaiveDate,
    /// Business event category.
    pub category: EntryCategory,
    /// Optional narration.
    #[serde(default)]
    pub narration: Option<String>,
    /// Buyer the entry concerns, if any.
    #[serde(default)]
    pub buyer_id: Option<BuyerId>,
    /// Supplier the entry concerns, if any.
    #[serde(default)]
    pub supplier_id: Option<SupplierId>,
    /// Company profile the entry is booked under.
    pub company_profile_id: CompanyProfileId,
    /// The journal lines (must have at least 2).
    pub lines: Vec<JournalLineInput>,
}

/// Entry totals for validation and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTotals {
    /// Total debit amount.
    pub debit: Decimal,
    /// Total credit amount.
    pub credit: Decimal,
    /// Whether the entry is balanced (debits == credits).
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Creates new totals from debit and credit sums.
    #[must_use]
    pub fn new(debit: Decimal, credit: Decimal) -> Self {
        Self {
            debit,
            credit,
            is_balanced: debit == credit,
        }
    }

    /// Sums a sequence of `(line type, amount)` pairs.
    pub fn from_lines(lines: impl IntoIterator<Item = (LineType, Decimal)>) -> Self {
        let (debit, credit) = lines.into_iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(debit, credit), (line_type, amount)| match line_type {
                LineType::Debit => (debit + amount, credit),
                LineType::Credit => (debit, credit + amount),
            },
        );
        Self::new(debit, credit)
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }
}
