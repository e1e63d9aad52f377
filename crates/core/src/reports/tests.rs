//! Tests for the trial balance.

use chrono::NaiveDate;
use loom_shared::types::{AccountId, JournalEntryId};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::ReportError;
use super::service::ReportService;
use crate::ledger::{
    Account, AccountCategory, EntryStatus, LedgerScope, LineFact, LineType, replay_balance,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn account(name: &str, category: AccountCategory) -> Account {
    Account {
        id: AccountId::new(),
        name: name.to_string(),
        code: None,
        category,
        opening_balance: Decimal::ZERO,
        balance: Decimal::ZERO,
        parent_id: None,
        is_control: false,
        is_deleted: false,
    }
}

/// Two facts of one balanced entry.
fn posting(
    on: NaiveDate,
    status: EntryStatus,
    debit: &Account,
    credit: &Account,
    amount: Decimal,
) -> [LineFact; 2] {
    let entry_id = JournalEntryId::new();
    let fact = |account: &Account, line_type| LineFact {
        entry_id,
        date: on,
        status,
        account_id: account.id,
        line_type,
        amount,
        scope: LedgerScope::None,
    };
    [fact(debit, LineType::Debit), fact(credit, LineType::Credit)]
}

#[test]
fn test_trial_balance_columns() {
    let cash = account("Cash", AccountCategory::Asset);
    let sales = account("Sales Revenue", AccountCategory::Income);
    let accounts = vec![sales.clone(), cash.clone()];

    let mut facts = Vec::new();
    facts.extend(posting(date(2025, 1, 10), EntryStatus::Posted, &cash, &sales, dec!(300)));
    facts.extend(posting(date(2025, 2, 5), EntryStatus::Posted, &cash, &sales, dec!(500)));
    facts.extend(posting(date(2025, 2, 20), EntryStatus::Posted, &sales, &cash, dec!(50)));
    // Ignored: draft, and after the range.
    facts.extend(posting(date(2025, 2, 10), EntryStatus::Draft, &cash, &sales, dec!(999)));
    facts.extend(posting(date(2025, 3, 1), EntryStatus::Posted, &cash, &sales, dec!(70)));

    let report =
        ReportService::trial_balance(&accounts, &facts, date(2025, 2, 1), date(2025, 2, 28))
            .unwrap();

    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[0].account_name, "Cash");
    assert_eq!(report.rows[1].account_name, "Sales Revenue");

    let cash_row = &report.rows[0];
    assert_eq!(cash_row.opening_debit, dec!(300));
    assert_eq!(cash_row.opening_credit, dec!(0));
    assert_eq!(cash_row.period_debit, dec!(500));
    assert_eq!(cash_row.period_credit, dec!(50));
    assert_eq!(cash_row.closing_debit, dec!(800));
    assert_eq!(cash_row.closing_credit, dec!(50));
    assert_eq!(cash_row.closing_balance(), dec!(750));

    let sales_row = &report.rows[1];
    assert_eq!(sales_row.closing_balance(), dec!(750));

    assert!(report.totals.is_balanced);
    assert_eq!(report.totals.closing_debit, dec!(850));
    assert_eq!(report.totals.closing_credit, dec!(850));
}

#[test]
fn test_trial_balance_excludes_deleted_accounts() {
    let cash = account("Cash", AccountCategory::Asset);
    let mut old = account("Old Petty Cash", AccountCategory::Asset);
    old.is_deleted = true;

    let report = ReportService::trial_balance(
        &[cash, old],
        &Vec::new(),
        date(2025, 1, 1),
        date(2025, 12, 31),
    )
    .unwrap();

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].opening_debit, Decimal::ZERO);
    assert!(report.totals.is_balanced);
}

#[test]
fn test_trial_balance_rejects_inverted_range() {
    let result =
        ReportService::trial_balance(&[], &Vec::new(), date(2025, 3, 1), date(2025, 2, 1));
    assert!(matches!(result, Err(ReportError::InvalidDateRange { .. })));
    assert_eq!(
        result.unwrap_err().error_code(),
        "INVALID_DATE_RANGE"
    );
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

/// (debit index, credit index, amount in cents, day of year offset)
fn postings_strategy() -> impl Strategy<Value = Vec<(usize, usize, i64, u32)>> {
    prop::collection::vec((0usize..5, 0usize..5, 1i64..1_000_000i64, 0u32..365), 0..30)
}

proptest! {
    /// For a range covering all posted history, each row's closing position
    /// equals an independent replay of that account's lines.
    #[test]
    fn prop_closing_matches_replay(
        categories in prop::collection::vec(category_strategy(), 5),
        postings in postings_strategy(),
        split in 0u32..365,
    ) {
        let accounts: Vec<Account> = categories
            .iter()
            .enumerate()
            .map(|(i, c)| account(&format!("Account {i}"), *c))
            .collect();
        let year_start = date(2025, 1, 1);
        let facts: Vec<LineFact> = postings
            .iter()
            .flat_map(|(d, c, cents, day)| {
                posting(
                    year_start + chrono::Days::new(u64::from(*day)),
                    EntryStatus::Posted,
                    &accounts[*d],
                    &accounts[*c],
                    Decimal::new(*cents, 2),
                )
            })
            .collect();

        let start = year_start + chrono::Days::new(u64::from(split));
        let report =
            ReportService::trial_balance(&accounts, &facts, start, date(2025, 12, 31)).unwrap();

        prop_assert!(report.totals.is_balanced);
        for row in &report.rows {
            let replayed = replay_balance(row.account_id, row.account_type, Decimal::ZERO, &facts);
            prop_assert_eq!(row.closing_balance(), replayed);
            prop_assert_eq!(
                row.opening_debit - row.opening_credit + row.period_debit - row.period_credit,
                row.closing_debit - row.closing_credit
            );
        }
    }
}
