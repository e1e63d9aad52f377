//! Voucher number generation.
//!
//! Regular entries are numbered `{PREFIX}-{n}` per category. Reversals are
//! numbered after the voucher they reverse: `REV-{original}` for the first,
//! `REV-{original}/{k}` for the k-th. Regular sequences come from a
//! per-category counter that only moves forward, so a discarded draft's
//! number is never issued again.

use super::types::EntryCategory;

/// Prefix carried by reversal vouchers.
pub const REVERSAL_PREFIX: &str = "REV";

/// Builds the voucher number of a regular entry.
///
/// `last_sequence` is the category counter before this entry, or 0 if none.
#[must_use]
pub fn next_voucher_no(category: EntryCategory, last_sequence: u64) -> String {
    format!("{}-{}", category.voucher_prefix(), last_sequence + 1)
}

/// Builds the voucher number of a reversal.
///
/// `last_reversal` is the highest reversal ordinal already issued against
/// the original, or 0 if none.
#[must_use]
pub fn reversal_voucher_no(original_voucher_no: &str, last_reversal: u64) -> String {
    if last_reversal == 0 {
        format!("{REVERSAL_PREFIX}-{original_voucher_no}")
    } else {
        format!("{REVERSAL_PREFIX}-{original_voucher_no}/{}", last_reversal + 1)
    }
}

/// Extracts the ordinal of a reversal voucher of `original_voucher_no`.
///
/// `REV-{original}` is ordinal 1.
#[must_use]
pub fn reversal_sequence(original_voucher_no: &str, voucher_no: &str) -> Option<u64> {
    let rest = voucher_no
        .strip_prefix(REVERSAL_PREFIX)?
        .strip_prefix('-')?
        .strip_prefix(original_voucher_no)?;
    if rest.is_empty() {
        return Some(1);
    }
    rest.strip_prefix('/')?.parse().ok()
}
