//! Report data types.

use chrono::NaiveDate;
use loom_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::AccountCategory;

/// One account's row in the trial balance.
///
/// Debit and credit columns are kept separate at every stage; closing
/// columns are opening plus period, never netted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Account name.
    pub account_name: String,
    /// Account code.
    pub account_code: Option<String>,
    /// Account category.
    pub account_type: AccountCategory,
    /// Debits on posted entries dated before the range.
    pub opening_debit: Decimal,
    /// Credits on posted entries dated before the range.
    pub opening_credit: Decimal,
    /// Debits on posted entries dated within the range.
    pub period_debit: Decimal,
    /// Credits on posted entries dated within the range.
    pub period_credit: Decimal,
    /// `opening_debit + period_debit`.
    pub closing_debit: Decimal,
    /// `opening_credit + period_credit`.
    pub closing_credit: Decimal,
}

impl TrialBalanceRow {
    /// Closing position expressed in the account's own sign convention.
    #[must_use]
    pub fn closing_balance(&self) -> Decimal {
        self.account_type
            .calculate_balance_change(self.closing_debit, self.closing_credit)
    }
}

/// Column totals of the trial balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Sum of opening debits.
    pub opening_debit: Decimal,
    /// Sum of opening credits.
    pub opening_credit: Decimal,
    /// Sum of period debits.
    pub period_debit: Decimal,
    /// Sum of period credits.
    pub period_credit: Decimal,
    /// Sum of closing debits.
    pub closing_debit: Decimal,
    /// Sum of closing credits.
    pub closing_credit: Decimal,
    /// Whether closing debits equal closing credits.
    pub is_balanced: bool,
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Period start date.
    pub start_date: NaiveDate,
    /// Period end date.
    pub end_date: NaiveDate,
    /// One row per active account, sorted by name.
    pub rows: Vec<TrialBalanceRow>,
    /// Totals.
    pub totals: TrialBalanceTotals,
}
