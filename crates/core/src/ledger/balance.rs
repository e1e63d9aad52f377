//! Account balance propagation.
//!
//! - Asset/Expense: balance += debit - credit (debit-normal)
//! - Liability/Equity/Income: balance += credit - debit (credit-normal)

use std::collections::BTreeMap;

use loom_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::LineFact;
use super::types::{AccountCategory, LineType};

/// Side on which an account category grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalSide {
    /// Debit-normal accounts (Asset, Expense).
    Debit,
    /// Credit-normal accounts (Liability, Equity, Income).
    Credit,
}

impl AccountCategory {
    /// Returns the side on which this category increases.
    #[must_use]
    pub const fn normal_side(self) -> NormalSide {
        match self {
            Self::Asset | Self::Expense => NormalSide::Debit,
            Self::Liability | Self::Equity | Self::Income => NormalSide::Credit,
        }
    }

    /// Returns `+1` when a line of `line_type` increases this category and
    /// `-1` when it decreases it.
    #[must_use]
    pub fn sign(self, line_type: LineType) -> Decimal {
        match (self.normal_side(), line_type) {
            (NormalSide::Debit, LineType::Debit) | (NormalSide::Credit, LineType::Credit) => {
                Decimal::ONE
            }
            (NormalSide::Debit, LineType::Credit) | (NormalSide::Credit, LineType::Debit) => {
                Decimal::NEGATIVE_ONE
            }
        }
    }

    /// Calculates the balance change one line causes.
    #[must_use]
    pub fn balance_delta(self, line_type: LineType, amount: Decimal) -> Decimal {
        amount * self.sign(line_type)
    }

    /// Calculates the balance change for aggregated debit and credit totals.
    #[must_use]
    pub fn calculate_balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self.normal_side() {
            NormalSide::Debit => debit - credit,
            NormalSide::Credit => credit - debit,
        }
    }
}

/// Net change one posting applies to one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceDelta {
    /// The account.
    pub account_id: AccountId,
    /// Signed change to the running balance.
    pub delta: Decimal,
}

/// Aggregates per-line deltas into one delta per account.
///
/// The result is ordered by account ID, which is the order in which the
/// posting path locks account rows.
pub fn aggregate_deltas(
    lines: impl IntoIterator<Item = (AccountId, AccountCategory, LineType, Decimal)>,
) -> Vec<BalanceDelta> {
    let mut per_account: BTreeMap<AccountId, Decimal> = BTreeMap::new();
    for (account_id, category, line_type, amount) in lines {
        *per_account.entry(account_id).or_default() += category.balance_delta(line_type, amount);
    }

    per_account
        .into_iter()
        .map(|(account_id, delta)| BalanceDelta { account_id, delta })
        .collect()
}

/// Recomputes an account balance from its opening balance and line history.
///
/// Only posted facts for `account_id` contribute; everything else is skipped.
pub fn replay_balance<'a>(
    account_id: AccountId,
    category: AccountCategory,
    opening_balance: Decimal,
    facts: impl IntoIterator<Item = &'a LineFact>,
) -> Decimal {
    facts
        .into_iter()
        .filter(|f| f.account_id == account_id && f.is_posted())
        .fold(opening_balance, |balance, f| {
            balance + category.balance_delta(f.line_type, f.amount)
        })
}

/// Result of cross-checking a cached balance against a full replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceCheck {
    /// The account checked.
    pub account_id: AccountId,
    /// Balance stored on the account row.
    pub cached: Decimal,
    /// Balance recomputed from posted lines.
    pub replayed: Decimal,
    /// `cached - replayed`.
    pub drift: Decimal,
}

impl BalanceCheck {
    /// Creates a check result.
    #[must_use]
    pub fn new(account_id: AccountId, cached: Decimal, replayed: Decimal) -> Self {
        Self {
            account_id,
            cached,
            replayed,
            drift: cached - replayed,
        }
    }

    /// Returns true if the cache agrees with the replay.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.drift.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use loom_shared::types::JournalEntryId;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use crate::ledger::types::{EntryStatus, LedgerScope};

    #[rstest]
    #[case(AccountCategory::Asset, LineType::Debit, dec!(1))]
    #[case(AccountCategory::Asset, LineType::Credit, dec!(-1))]
    #[case(AccountCategory::Expense, LineType::Debit, dec!(1))]
    #[case(AccountCategory::Expense, LineType::Credit, dec!(-1))]
    #[case(AccountCategory::Liability, LineType::Credit, dec!(1))]
    #[case(AccountCategory::Liability, LineType::Debit, dec!(-1))]
    #[case(AccountCategory::Equity, LineType::Credit, dec!(1))]
    #[case(AccountCategory::Equity, LineType::Debit, dec!(-1))]
    #[case(AccountCategory::Income, LineType::Credit, dec!(1))]
    #[case(AccountCategory::Income, LineType::Debit, dec!(-1))]
    fn test_sign_convention(
        #[case] category: AccountCategory,
        #[case] line_type: LineType,
        #[case] expected: Decimal,
    ) {
        assert_eq!(category.sign(line_type), expected);
        assert_eq!(category.balance_delta(line_type, dec!(100)), expected * dec!(100));
    }

    #[test]
    fn test_calculate_balance_change() {
        assert_eq!(
            AccountCategory::Asset.calculate_balance_change(dec!(100), dec!(30)),
            dec!(70)
        );
        assert_eq!(
            AccountCategory::Income.calculate_balance_change(dec!(30), dec!(100)),
            dec!(70)
        );
    }

    #[test]
    fn test_aggregate_deltas_groups_by_account() {
        let cash = AccountId::new();
        let sales = AccountId::new();
        let deltas = aggregate_deltas([
            (cash, AccountCategory::Asset, LineType::Debit, dec!(300)),
            (cash, AccountCategory::Asset, LineType::Debit, dec!(200)),
            (sales, AccountCategory::Income, LineType::Credit, dec!(500)),
        ]);

        assert_eq!(deltas.len(), 2);
        assert!(deltas.windows(2).all(|w| w[0].account_id < w[1].account_id));
        let cash_delta = deltas.iter().find(|d| d.account_id == cash).unwrap();
        let sales_delta = deltas.iter().find(|d| d.account_id == sales).unwrap();
        assert_eq!(cash_delta.delta, dec!(500));
        assert_eq!(sales_delta.delta, dec!(500));
    }

    fn fact(account_id: AccountId, line_type: LineType, amount: Decimal, status: EntryStatus) -> LineFact {
        LineFact {
            entry_id: JournalEntryId::new(),
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            status,
            account_id,
            line_type,
            amount,
            scope: LedgerScope::None,
        }
    }

    #[test]
    fn test_replay_ignores_drafts_and_other_accounts() {
        let cash = AccountId::new();
        let facts = vec![
            fact(cash, LineType::Debit, dec!(500), EntryStatus::Posted),
            fact(cash, LineType::Credit, dec!(120), EntryStatus::Posted),
            fact(cash, LineType::Debit, dec!(999), EntryStatus::Draft),
            fact(AccountId::new(), LineType::Debit, dec!(50), EntryStatus::Posted),
        ];

        let replayed = replay_balance(cash, AccountCategory::Asset, dec!(1000), &facts);
        assert_eq!(replayed, dec!(1380));
    }

    #[test]
    fn test_balance_check() {
        let id = AccountId::new();
        assert!(BalanceCheck::new(id, dec!(10), dec!(10)).is_consistent());
        let drifted = BalanceCheck::new(id, dec!(15), dec!(10));
        assert!(!drifted.is_consistent());
        assert_eq!(drifted.drift, dec!(5));
    }

    fn category_strategy() -> impl Strategy<Value = AccountCategory> {
        prop_oneof![
            Just(AccountCategory::Asset),
            Just(AccountCategory::Liability),
            Just(AccountCategory::Equity),
            Just(AccountCategory::Income),
            Just(AccountCategory::Expense),
        ]
    }

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// A debit and a credit of the same amount cancel on any account.
        #[test]
        fn prop_opposite_lines_cancel(
            category in category_strategy(),
            amount in amount_strategy(),
        ) {
            let total = category.balance_delta(LineType::Debit, amount)
                + category.balance_delta(LineType::Credit, amount);
            prop_assert_eq!(total, Decimal::ZERO);
        }

        /// The per-line delta has the amount's magnitude.
        #[test]
        fn prop_delta_magnitude_is_amount(
            category in category_strategy(),
            amount in amount_strategy(),
            debit in any::<bool>(),
        ) {
            let line_type = if debit { LineType::Debit } else { LineType::Credit };
            prop_assert_eq!(category.balance_delta(line_type, amount).abs(), amount);
        }
    }
}
