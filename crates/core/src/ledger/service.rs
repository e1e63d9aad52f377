//! Ledger service for draft validation and posting plans.
//!
//! This module provides the core business logic the journal engine runs
//! before it touches storage: checking a draft request against the chart of
//! accounts and turning a draft entry into the exact balance updates that
//! posting must apply.

use std::collections::HashMap;

use loom_shared::types::{AccountId, JournalEntryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::Account;
use super::balance::aggregate_deltas;
use super::entry::JournalEntry;
use super::error::LedgerError;
use super::types::{CreateDraftInput, EntryTotals, LedgerScope};
use super::validation::{ensure_balanced, validate_lines};

/// One account's balance before and after a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalanceUpdate {
    /// The account.
    pub account_id: AccountId,
    /// Balance read under lock.
    pub previous_balance: Decimal,
    /// Net change from the entry's lines on this account.
    pub delta: Decimal,
    /// Balance to write.
    pub new_balance: Decimal,
}

/// Everything posting an entry changes, computed before any write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingPlan {
    /// The entry being posted.
    pub entry_id: JournalEntryId,
    /// Debit and credit totals (always balanced).
    pub totals: EntryTotals,
    /// Balance updates, ordered by account ID.
    pub updates: Vec<AccountBalanceUpdate>,
}

/// Ledger service for journal validation.
///
/// This service contains pure business logic with no database dependencies.
pub struct LedgerService;

impl LedgerService {
    /// Validates a draft request.
    ///
    /// Performs, in order:
    /// 1. At least two lines
    /// 2. Every amount positive
    /// 3. Every referenced account exists, is not soft-deleted and is not a
    ///    control account
    ///
    /// Debit/credit equality is not required for drafts.
    ///
    /// # Arguments
    ///
    /// * `input` - The draft request
    /// * `account_lookup` - Resolves an account ID, `None` when unknown
    ///
    /// # Errors
    ///
    /// Returns the first validation failure encountered.
    pub fn validate_draft<'a, F>(
        input: &CreateDraftInput,
        mut account_lookup: F,
    ) -> Result<EntryTotals, LedgerError>
    where
        F: FnMut(AccountId) -> Option<&'a Account>,
    {
        let totals = validate_lines(
            input
                .lines
                .iter()
                .map(|l| (l.account_id, l.line_type, l.amount)),
        )?;

        for line in &input.lines {
            let account =
                account_lookup(line.account_id).ok_or(LedgerError::AccountNotFound(line.account_id))?;
            if account.is_deleted {
                return Err(LedgerError::AccountInactive(account.id));
            }
            if account.is_control {
                return Err(LedgerError::ControlAccount(account.id));
            }
        }

        Ok(totals)
    }

    /// Computes the balance updates for posting `entry`.
    ///
    /// `accounts` must hold the current (locked) state of every account the
    /// entry touches.
    ///
    /// # Errors
    ///
    /// - `AlreadyPosted` if the entry is not a draft
    /// - line-count and amount validation errors
    /// - `UnbalancedEntry` if total debit differs from total credit
    /// - `AccountNotFound` if a line's account is missing from `accounts`
    pub fn plan_posting(
        entry: &JournalEntry,
        accounts: &HashMap<AccountId, Account>,
    ) -> Result<PostingPlan, LedgerError> {
        if !entry.can_post() {
            return Err(LedgerError::AlreadyPosted(entry.id));
        }

        let totals = validate_lines(
            entry
                .lines
                .iter()
                .map(|l| (l.account_id, l.line_type, l.amount)),
        )?;
        ensure_balanced(&totals)?;

        let mut categorized = Vec::with_capacity(entry.lines.len());
        for line in &entry.lines {
            let account = accounts
                .get(&line.account_id)
                .ok_or(LedgerError::AccountNotFound(line.account_id))?;
            categorized.push((line.account_id, account.category, line.line_type, line.amount));
        }

        let updates = aggregate_deltas(categorized)
            .into_iter()
            .map(|d| {
                // Presence checked above.
                let previous_balance = accounts
                    .get(&d.account_id)
                    .map_or(Decimal::ZERO, |a| a.balance);
                AccountBalanceUpdate {
                    account_id: d.account_id,
                    previous_balance,
                    delta: d.delta,
                    new_balance: previous_balance + d.delta,
                }
            })
            .collect();

        Ok(PostingPlan {
            entry_id: entry.id,
            totals,
            updates,
        })
    }

    /// Returns the distinct accounts an entry touches, in lock order.
    #[must_use]
    pub fn accounts_to_lock(entry: &JournalEntry) -> Vec<AccountId> {
        let mut ids: Vec<AccountId> = entry.lines.iter().map(|l| l.account_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Returns true if any line is scoped to a party sub-ledger.
    #[must_use]
    pub fn has_party_lines(input: &CreateDraftInput) -> bool {
        input
            .lines
            .iter()
            .any(|l| matches!(l.scope, LedgerScope::Buyer(_) | LedgerScope::Supplier(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use loom_shared::types::{CompanyProfileId, JournalLineId};
    use rust_decimal_macros::dec;

    use crate::ledger::entry::JournalLine;
    use crate::ledger::types::{
        AccountCategory, EntryCategory, EntryStatus, JournalLineInput, LineType,
    };

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

    fn input(lines: Vec<JournalLineInput>) -> CreateDraftInput {
        CreateDraftInput {
            date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            category: EntryCategory::Journal,
            narration: Some("Cash sale".to_string()),
            buyer_id: None,
            supplier_id: None,
            company_profile_id: CompanyProfileId::new(),
            lines,
        }
    }

    fn entry(status: EntryStatus, lines: &[(AccountId, LineType, Decimal)]) -> JournalEntry {
        let id = JournalEntryId::new();
        JournalEntry {
            id,
            voucher_no: "JE-1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            category: EntryCategory::Journal,
            narration: None,
            status,
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

    fn index(accounts: &[&Account]) -> HashMap<AccountId, Account> {
        accounts.iter().map(|a| (a.id, (*a).clone())).collect()
    }

    #[test]
    fn test_validate_draft_accepts_unbalanced() {
        let cash = account("Cash", AccountCategory::Asset);
        let sales = account("Sales Revenue", AccountCategory::Income);
        let accounts = index(&[&cash, &sales]);
        let request = input(vec![
            JournalLineInput::debit(cash.id, dec!(500)),
            JournalLineInput::credit(sales.id, dec!(400)),
        ]);

        let totals = LedgerService::validate_draft(&request, |id| accounts.get(&id)).unwrap();
        assert!(!totals.is_balanced);
    }

    #[test]
    fn test_validate_draft_rejects_unknown_account() {
        let cash = account("Cash", AccountCategory::Asset);
        let accounts = index(&[&cash]);
        let missing = AccountId::new();
        let request = input(vec![
            JournalLineInput::debit(cash.id, dec!(10)),
            JournalLineInput::credit(missing, dec!(10)),
        ]);

        assert!(matches!(
            LedgerService::validate_draft(&request, |id| accounts.get(&id)),
            Err(LedgerError::AccountNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn test_validate_draft_rejects_control_and_deleted_accounts() {
        let cash = account("Cash", AccountCategory::Asset);
        let mut receivables = account("Trade Receivables", AccountCategory::Asset);
        receivables.is_control = true;
        let mut retired = account("Old Bank", AccountCategory::Asset);
        retired.is_deleted = true;
        let accounts = index(&[&cash, &receivables, &retired]);

        let to_control = input(vec![
            JournalLineInput::debit(receivables.id, dec!(10)),
            JournalLineInput::credit(cash.id, dec!(10)),
        ]);
        assert!(matches!(
            LedgerService::validate_draft(&to_control, |id| accounts.get(&id)),
            Err(LedgerError::ControlAccount(_))
        ));

        let to_deleted = input(vec![
            JournalLineInput::debit(retired.id, dec!(10)),
            JournalLineInput::credit(cash.id, dec!(10)),
        ]);
        assert!(matches!(
            LedgerService::validate_draft(&to_deleted, |id| accounts.get(&id)),
            Err(LedgerError::AccountInactive(_))
        ));
    }

    #[test]
    fn test_plan_posting_asset_and_liability_both_increase() {
        let bank = account("Bank", AccountCategory::Asset);
        let loan = account("Loan Payable", AccountCategory::Liability);
        let accounts = index(&[&bank, &loan]);
        let draft = entry(
            EntryStatus::Draft,
            &[
                (bank.id, LineType::Debit, dec!(100)),
                (loan.id, LineType::Credit, dec!(100)),
            ],
        );

        let plan = LedgerService::plan_posting(&draft, &accounts).unwrap();
        assert_eq!(plan.updates.len(), 2);
        for update in &plan.updates {
            assert_eq!(update.delta, dec!(100));
            assert_eq!(update.new_balance, dec!(100));
        }
    }

    #[test]
    fn test_plan_posting_rejects_unbalanced() {
        let cash = account("Cash", AccountCategory::Asset);
        let sales = account("Sales Revenue", AccountCategory::Income);
        let accounts = index(&[&cash, &sales]);
        let draft = entry(
            EntryStatus::Draft,
            &[
                (cash.id, LineType::Debit, dec!(500)),
                (sales.id, LineType::Credit, dec!(400)),
            ],
        );

        assert!(matches!(
            LedgerService::plan_posting(&draft, &accounts),
            Err(LedgerError::UnbalancedEntry { .. })
        ));
    }

    #[test]
    fn test_plan_posting_rejects_posted() {
        let cash = account("Cash", AccountCategory::Asset);
        let sales = account("Sales Revenue", AccountCategory::Income);
        let accounts = index(&[&cash, &sales]);
        let posted = entry(
            EntryStatus::Posted,
            &[
                (cash.id, LineType::Debit, dec!(500)),
                (sales.id, LineType::Credit, dec!(500)),
            ],
        );

        assert!(matches!(
            LedgerService::plan_posting(&posted, &accounts),
            Err(LedgerError::AlreadyPosted(id)) if id == posted.id
        ));
    }

    #[test]
    fn test_plan_posting_nets_repeated_account() {
        let mut cash = account("Cash", AccountCategory::Asset);
        cash.balance = dec!(1000);
        let sales = account("Sales Revenue", AccountCategory::Income);
        let accounts = index(&[&cash, &sales]);
        let draft = entry(
            EntryStatus::Draft,
            &[
                (cash.id, LineType::Debit, dec!(300)),
                (cash.id, LineType::Debit, dec!(200)),
                (sales.id, LineType::Credit, dec!(500)),
            ],
        );

        let plan = LedgerService::plan_posting(&draft, &accounts).unwrap();
        let cash_update = plan.updates.iter().find(|u| u.account_id == cash.id).unwrap();
        assert_eq!(cash_update.previous_balance, dec!(1000));
        assert_eq!(cash_update.new_balance, dec!(1500));
        assert_eq!(LedgerService::accounts_to_lock(&draft).len(), 2);
    }

    #[test]
    fn test_has_party_lines() {
        let receivables = account("Trade Receivables", AccountCategory::Asset);
        let sales = account("Fabric Sales", AccountCategory::Income);
        let mut request = input(vec![
            JournalLineInput::debit(receivables.id, dec!(80)),
            JournalLineInput::credit(sales.id, dec!(80)),
        ]);
        assert!(!LedgerService::has_party_lines(&request));

        request.lines[0].scope = LedgerScope::Buyer(loom_shared::types::BuyerId::new());
        assert!(LedgerService::has_party_lines(&request));
    }
}
