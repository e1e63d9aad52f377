//! Business rule validation for journal lines.

use chrono::NaiveDate;
use loom_shared::types::AccountId;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{EntryTotals, LineType};

/// Minimum number of lines in a journal entry.
pub const MIN_LINES: usize = 2;

/// Decimal places stored for line amounts and balances.
pub const AMOUNT_SCALE: u32 = 4;

/// Date format accepted from calling modules.
pub const ENTRY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Validates line count and amounts.
///
/// Drafts are allowed to be unbalanced, so this does not compare totals.
///
/// # Errors
///
/// Returns an error if there are fewer than two lines, any amount is not
/// positive, or an amount carries more than [`AMOUNT_SCALE`] decimal places.
pub fn validate_lines(
    lines: impl ExactSizeIterator<Item = (AccountId, LineType, Decimal)>,
) -> Result<EntryTotals, LedgerError> {
    if lines.len() < MIN_LINES {
        return Err(LedgerError::InsufficientLines(lines.len()));
    }

    let mut debit = Decimal::ZERO;
    let mut credit = Decimal::ZERO;

    for (account_id, line_type, amount) in lines {
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount(account_id));
        }
        if amount.is_sign_negative() {
            return Err(LedgerError::NegativeAmount(account_id));
        }
        // Trailing zeros do not count: 12.500000 is accepted.
        if amount.normalize().scale() > AMOUNT_SCALE {
            return Err(LedgerError::ExcessPrecision {
                account_id,
                amount,
                max_scale: AMOUNT_SCALE,
            });
        }

        match line_type {
            LineType::Debit => debit += amount,
            LineType::Credit => credit += amount,
        }
    }

    Ok(EntryTotals::new(debit, credit))
}

/// Requires exact equality of debit and credit totals.
///
/// # Errors
///
/// Returns `UnbalancedEntry` carrying both totals.
pub fn ensure_balanced(totals: &EntryTotals) -> Result<(), LedgerError> {
    if totals.is_balanced {
        Ok(())
    } else {
        Err(LedgerError::UnbalancedEntry {
            debit: totals.debit,
            credit: totals.credit,
        })
    }
}

/// Parses an entry date supplied as `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns `InvalidDate` for malformed input.
pub fn parse_entry_date(raw: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(raw.trim(), ENTRY_DATE_FORMAT)
        .map_err(|_| LedgerError::InvalidDate(raw.to_string()))
}
