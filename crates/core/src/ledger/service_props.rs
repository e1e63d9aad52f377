//! Property-based tests for `LedgerService` and `ReversalService`.
//!
//! - Posting a balanced entry keeps debit-normal and credit-normal growth equal
//! - Posting an entry and then its reversal restores every balance
//! - Unbalanced entries never produce a posting plan

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use loom_shared::types::{AccountId, CompanyProfileId, JournalEntryId, JournalLineId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::account::Account;
use super::balance::NormalSide;
use super::entry::{JournalEntry, JournalLine};
use super::error::LedgerError;
use super::reversal::ReversalService;
use super::service::{LedgerService, PostingPlan};
use super::types::{AccountCategory, EntryCategory, EntryStatus, LedgerScope, LineType};

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate opening balances (-10,000.00 to 10,000.00).
fn opening_balance() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
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

/// Four accounts with random categories and balances.
fn chart_strategy() -> impl Strategy<Value = Vec<Account>> {
    prop::collection::vec((category_strategy(), opening_balance()), 4).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (category, balance))| Account {
                id: AccountId::new(),
                name: format!("Account {i}"),
                code: None,
                category,
                opening_balance: balance,
                balance,
                parent_id: None,
                is_control: false,
                is_deleted: false,
            })
            .collect()
    })
}

/// Debit amounts split across random accounts, credited back in one total.
fn balanced_legs() -> impl Strategy<Value = (Vec<(usize, Decimal)>, usize)> {
    (
        prop::collection::vec((0usize..4, positive_amount()), 1..6),
        0usize..4,
    )
}

fn draft_entry(lines: &[(AccountId, LineType, Decimal)]) -> JournalEntry {
    let id = JournalEntryId::new();
    JournalEntry {
        id,
        voucher_no: "JE-1".to_string(),
        date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        category: EntryCategory::Journal,
        narration: None,
        status: EntryStatus::Draft,
        buyer_id: None,
        supplier_id: None,
        company_profile_id: CompanyProfileId::new(),
        reverses: None,
        posted_at: None,
        created_at: Utc::now(),
        lines: lines
            .iter()
            .enumerate()
            .map(|(i, (account_id, line_type, amount))| JournalLine {
                id: JournalLineId::new(),
                entry_id: id,
                line_no: i32::try_from(i + 1).unwrap(),
                account_id: *account_id,
                line_type: *line_type,
                amount: *amount,
                scope: LedgerScope::None,
            })
            .collect(),
    }
}

fn build_lines(
    chart: &[Account],
    debits: &[(usize, Decimal)],
    credit_to: usize,
) -> Vec<(AccountId, LineType, Decimal)> {
    let total: Decimal = debits.iter().map(|(_, amount)| *amount).sum();
    let mut lines: Vec<_> = debits
        .iter()
        .map(|(i, amount)| (chart[*i].id, LineType::Debit, *amount))
        .collect();
    lines.push((chart[credit_to].id, LineType::Credit, total));
    lines
}

fn apply(plan: &PostingPlan, accounts: &mut HashMap<AccountId, Account>) {
    for update in &plan.updates {
        if let Some(account) = accounts.get_mut(&update.account_id) {
            account.balance = update.new_balance;
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Debit-normal growth equals credit-normal growth for any posting.
    #[test]
    fn prop_posting_preserves_accounting_equation(
        chart in chart_strategy(),
        (debits, credit_to) in balanced_legs(),
    ) {
        let accounts: HashMap<_, _> = chart.iter().map(|a| (a.id, a.clone())).collect();
        let entry = draft_entry(&build_lines(&chart, &debits, credit_to));

        let plan = LedgerService::plan_posting(&entry, &accounts).unwrap();
        let mut debit_side = Decimal::ZERO;
        let mut credit_side = Decimal::ZERO;
        for update in &plan.updates {
            match accounts[&update.account_id].category.normal_side() {
                NormalSide::Debit => debit_side += update.delta,
                NormalSide::Credit => credit_side += update.delta,
            }
        }
        prop_assert_eq!(debit_side, credit_side);
        prop_assert!(plan.totals.is_balanced);
    }

    /// Posting an entry followed by its reversal restores every balance.
    #[test]
    fn prop_reversal_restores_balances(
        chart in chart_strategy(),
        (debits, credit_to) in balanced_legs(),
    ) {
        let mut accounts: HashMap<_, _> = chart.iter().map(|a| (a.id, a.clone())).collect();
        let mut entry = draft_entry(&build_lines(&chart, &debits, credit_to));

        let plan = LedgerService::plan_posting(&entry, &accounts).unwrap();
        apply(&plan, &mut accounts);
        entry.status = EntryStatus::Posted;

        let reversal = ReversalService::build(&entry, 0);
        let reversing_lines: Vec<_> = reversal
            .input
            .lines
            .iter()
            .map(|l| (l.account_id, l.line_type, l.amount))
            .collect();
        let reversing = draft_entry(&reversing_lines);
        let plan = LedgerService::plan_posting(&reversing, &accounts).unwrap();
        apply(&plan, &mut accounts);

        for account in &chart {
            prop_assert_eq!(accounts[&account.id].balance, account.balance);
        }
    }

    /// Any imbalance between debit and credit totals is rejected.
    #[test]
    fn prop_unbalanced_rejected(
        chart in chart_strategy(),
        (debits, credit_to) in balanced_legs(),
        skew in positive_amount(),
    ) {
        let accounts: HashMap<_, _> = chart.iter().map(|a| (a.id, a.clone())).collect();
        let mut lines = build_lines(&chart, &debits, credit_to);
        if let Some(last) = lines.last_mut() {
            last.2 += skew;
        }
        let entry = draft_entry(&lines);

        let result = LedgerService::plan_posting(&entry, &accounts);
        let is_unbalanced = matches!(result, Err(LedgerError::UnbalancedEntry { .. }));
        prop_assert!(is_unbalanced);
    }
}
