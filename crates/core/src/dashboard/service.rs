//! Dashboard aggregation service.

use std::collections::HashMap;

use loom_shared::types::AccountId;
use rust_decimal::Decimal;

use super::types::DashboardStats;
use crate::ledger::{Account, AccountCategory, LedgerScope, LineFact, LineType};

/// Computes dashboard figures from accounts and line history.
pub struct DashboardService;

impl DashboardService {
    /// Computes every dashboard figure in one pass over `facts`.
    ///
    /// Account positions are `opening_balance` plus the deltas of posted
    /// lines, never the cached `balance`. Soft-deleted accounts are skipped.
    pub fn compute<'a, S: AsRef<str>>(
        accounts: &[Account],
        facts: impl IntoIterator<Item = &'a LineFact>,
        cash_account_patterns: &[S],
    ) -> DashboardStats {
        let categories: HashMap<AccountId, AccountCategory> =
            accounts.iter().map(|a| (a.id, a.category)).collect();

        let mut stats = DashboardStats::default();
        let mut activity: HashMap<AccountId, Decimal> = HashMap::new();

        for fact in facts.into_iter().filter(|f| f.is_posted()) {
            match (fact.scope, fact.line_type) {
                (LedgerScope::Buyer(_), LineType::Debit) => stats.total_receivables += fact.amount,
                (LedgerScope::Buyer(_), LineType::Credit) => stats.total_receivables -= fact.amount,
                (LedgerScope::Supplier(_), LineType::Credit) => stats.total_payables += fact.amount,
                (LedgerScope::Supplier(_), LineType::Debit) => stats.total_payables -= fact.amount,
                _ => {}
            }

            if let Some(category) = categories.get(&fact.account_id) {
                *activity.entry(fact.account_id).or_default() +=
                    category.balance_delta(fact.line_type, fact.amount);
            }
        }

        for account in accounts.iter().filter(|a| !a.is_deleted) {
            let position = account.opening_balance
                + activity.get(&account.id).copied().unwrap_or_default();
            match account.category {
                AccountCategory::Asset => {
                    stats.total_assets += position;
                    if account.name_matches_any(cash_account_patterns) {
                        stats.cash_and_bank_balance += position;
                    }
                }
                AccountCategory::Liability => stats.total_liabilities += position,
                AccountCategory::Equity | AccountCategory::Income | AccountCategory::Expense => {}
            }
        }

        stats
    }
}
