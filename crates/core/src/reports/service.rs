//! Report generation service.

use std::collections::HashMap;

use chrono::NaiveDate;
use loom_shared::types::AccountId;
use rust_decimal::Decimal;

use super::error::{ReportError, check_date_range};
use super::types::{TrialBalanceReport, TrialBalanceRow, TrialBalanceTotals};
use crate::ledger::{Account, LineFact, LineType};

#[derive(Default)]
struct Columns {
    opening_debit: Decimal,
    opening_credit: Decimal,
    period_debit: Decimal,
    period_credit: Decimal,
}

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Generates a trial balance for `[start_date, end_date]`.
    ///
    /// Each active account gets its debit and credit sums over posted lines
    /// dated before the range (opening) and within it (period). Draft lines,
    /// lines dated after the range and soft-deleted accounts are ignored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if `start_date > end_date`.
    pub fn trial_balance<'a>(
        accounts: &[Account],
        facts: impl IntoIterator<Item = &'a LineFact>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<TrialBalanceReport, ReportError> {
        check_date_range(Some(start_date), Some(end_date))?;

        let mut columns: HashMap<AccountId, Columns> = HashMap::new();
        for fact in facts {
            if !fact.is_posted() || fact.date > end_date {
                continue;
            }
            let c = columns.entry(fact.account_id).or_default();
            match (fact.date < start_date, fact.line_type) {
                (true, LineType::Debit) => c.opening_debit += fact.amount,
                (true, LineType::Credit) => c.opening_credit += fact.amount,
                (false, LineType::Debit) => c.period_debit += fact.amount,
                (false, LineType::Credit) => c.period_credit += fact.amount,
            }
        }

        let mut rows: Vec<TrialBalanceRow> = accounts
            .iter()
            .filter(|a| !a.is_deleted)
            .map(|account| {
                let c = columns.remove(&account.id).unwrap_or_default();
                TrialBalanceRow {
                    account_id: account.id,
                    account_name: account.name.clone(),
                    account_code: account.code.clone(),
                    account_type: account.category,
                    opening_debit: c.opening_debit,
                    opening_credit: c.opening_credit,
                    period_debit: c.period_debit,
                    period_credit: c.period_credit,
                    closing_debit: c.opening_debit + c.period_debit,
                    closing_credit: c.opening_credit + c.period_credit,
                }
            })
            .collect();
        rows.sort_by(|a, b| a.account_name.cmp(&b.account_name));

        let totals = Self::totals(&rows);
        Ok(TrialBalanceReport {
            start_date,
            end_date,
            rows,
            totals,
        })
    }

    fn totals(rows: &[TrialBalanceRow]) -> TrialBalanceTotals {
        let mut totals = rows.iter().fold(TrialBalanceTotals::default(), |mut t, row| {
            t.opening_debit += row.opening_debit;
            t.opening_credit += row.opening_credit;
            t.period_debit += row.period_debit;
            t.period_credit += row.period_credit;
            t.closing_debit += row.closing_debit;
            t.closing_credit += row.closing_credit;
            t
        });
        totals.is_balanced = totals.closing_debit == totals.closing_credit;
        totals
    }
}
