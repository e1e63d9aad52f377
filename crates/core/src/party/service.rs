//! Party ledger reconstruction service.

use std::collections::HashMap;

use loom_shared::types::{AccountId, PageResponse};
use rust_decimal::Decimal;

use super::types::{PartyLedger, PartyLedgerQuery, PartyLedgerRow, PartyRef};
use crate::ledger::{JournalEntry, JournalLine, LineType};
use crate::reports::{ReportError, check_date_range};

/// Builds party statements from journal entries.
///
/// Draft and posted entries both contribute, so the statement shows
/// obligations that are recorded but not yet posted.
pub struct PartyLedgerService;

impl PartyLedgerService {
    /// Reconstructs the ledger of `query.party`.
    ///
    /// `entries` may contain entries unrelated to the party; only lines
    /// scoped to it are counted. Every line of a contributing entry must be
    /// present so the counter-account can be resolved.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if the window start falls after its end.
    pub fn build(
        query: &PartyLedgerQuery,
        entries: &[JournalEntry],
        account_names: &HashMap<AccountId, String>,
        multi_account_label: &str,
    ) -> Result<PartyLedger, ReportError> {
        check_date_range(query.start_date, query.end_date)?;
        let party = query.party;

        let mut opening_balance = Decimal::ZERO;
        let mut window: Vec<&JournalEntry> = Vec::new();
        for entry in entries {
            if query.is_before_window(entry.date) {
                opening_balance += Self::signed_total(party, &entry.lines);
            } else {
                window.push(entry);
            }
        }

        Self::build_window(query, opening_balance, window, account_names, multi_account_label)
    }

    /// Builds the statement from a known opening balance.
    ///
    /// `window` holds the entries dated inside the query window; anything
    /// outside it, or without a line scoped to the party, is ignored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if the window start falls after its end.
    pub fn build_window<'a>(
        query: &PartyLedgerQuery,
        opening_balance: Decimal,
        window: impl IntoIterator<Item = &'a JournalEntry>,
        account_names: &HashMap<AccountId, String>,
        multi_account_label: &str,
    ) -> Result<PartyLedger, ReportError> {
        check_date_range(query.start_date, query.end_date)?;
        let party = query.party;

        let mut window: Vec<&JournalEntry> = window
            .into_iter()
            .filter(|entry| query.is_in_window(entry.date))
            .filter(|entry| entry.lines.iter().any(|l| party.owns(l.scope)))
            .collect();
        window.sort_by(|a, b| (a.date, a.created_at, a.id).cmp(&(b.date, b.created_at, b.id)));

        let mut balance = opening_balance;
        let rows: Vec<PartyLedgerRow> = window
            .into_iter()
            .map(|entry| {
                let mut debit = Decimal::ZERO;
                let mut credit = Decimal::ZERO;
                for line in Self::ordered_party_lines(party, &entry.lines) {
                    match line.line_type {
                        LineType::Debit => debit += line.amount,
                        LineType::Credit => credit += line.amount,
                    }
                    balance += line.amount * party.sign(line.line_type);
                }
                PartyLedgerRow {
                    entry_id: entry.id,
                    voucher_no: entry.voucher_no.clone(),
                    date: entry.date,
                    category: entry.category,
                    narration: entry.narration.clone(),
                    status: entry.status,
                    counter_account: Self::counter_account(
                        party,
                        &entry.lines,
                        account_names,
                        multi_account_label,
                    ),
                    debit,
                    credit,
                    balance,
                }
            })
            .collect();

        let closing_balance = rows.last().map_or(opening_balance, |row| row.balance);
        let page = PageResponse::from_items(rows, query.page);

        Ok(PartyLedger {
            party,
            opening_balance,
            closing_balance,
            rows: page.data,
            pagination: page.meta,
        })
    }

    /// Opening balance from the party's debit and credit totals before the
    /// window.
    #[must_use]
    pub fn opening_from_totals(party: PartyRef, debit: Decimal, credit: Decimal) -> Decimal {
        debit * party.sign(LineType::Debit) + credit * party.sign(LineType::Credit)
    }

    /// Signed sum of the party's lines in one entry.
    #[must_use]
    pub fn signed_total(party: PartyRef, lines: &[JournalLine]) -> Decimal {
        lines
            .iter()
            .filter(|l| party.owns(l.scope))
            .map(|l| l.amount * party.sign(l.line_type))
            .sum()
    }

    fn ordered_party_lines(party: PartyRef, lines: &[JournalLine]) -> Vec<&JournalLine> {
        let mut owned: Vec<&JournalLine> = lines.iter().filter(|l| party.owns(l.scope)).collect();
        owned.sort_by_key(|l| l.line_no);
        owned
    }

    /// Display name of the other side of an entry.
    ///
    /// More than two lines report `multi_account_label`. Otherwise the first
    /// line not scoped to the party is used, falling back to the first line.
    fn counter_account(
        party: PartyRef,
        lines: &[JournalLine],
        account_names: &HashMap<AccountId, String>,
        multi_account_label: &str,
    ) -> String {
        if lines.len() > 2 {
            return multi_account_label.to_string();
        }

        let mut ordered: Vec<&JournalLine> = lines.iter().collect();
        ordered.sort_by_key(|l| l.line_no);
        let counter = ordered
            .iter()
            .find(|l| !party.owns(l.scope))
            .or_else(|| ordered.first());

        counter.map_or_else(String::new, |line| {
            account_names
                .get(&line.account_id)
                .cloned()
                .unwrap_or_else(|| line.account_id.to_string())
        })
    }
}
