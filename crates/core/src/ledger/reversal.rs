//! Reversing entry construction.

use super::entry::JournalEntry;
use super::types::{CreateDraftInput, JournalLineInput};
use super::voucher::reversal_voucher_no;

/// A draft that cancels an existing entry once posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReversalDraft {
    /// Voucher number derived from the original.
    pub voucher_no: String,
    /// Header and swapped lines.
    pub input: CreateDraftInput,
}

/// Builds reversing entries.
pub struct ReversalService;

impl ReversalService {
    /// Builds the reversal of `original`.
    ///
    /// Lines are copied in order with debit and credit swapped; accounts and
    /// scopes are kept. Date, category and party links follow the original.
    #[must_use]
    pub fn build(original: &JournalEntry, last_reversal: u64) -> ReversalDraft {
        let lines = original
            .lines
            .iter()
            .map(|line| JournalLineInput {
                account_id: line.account_id,
                line_type: line.line_type.opposite(),
                amount: line.amount,
                scope: line.scope,
            })
            .collect();

        ReversalDraft {
            voucher_no: reversal_voucher_no(&original.voucher_no, last_reversal),
            input: CreateDraftInput {
                date: original.date,
                category: original.category,
                narration: Some(Self::narration(original)),
                buyer_id: original.buyer_id,
                supplier_id: original.supplier_id,
                company_profile_id: original.company_profile_id,
                lines,
            },
        }
    }

    fn narration(original: &JournalEntry) -> String {
        match original.narration.as_deref() {
            Some(text) if !text.is_empty() => {
                format!("Reversal of {}: {text}", original.voucher_no)
            }
            _ => format!("Reversal of {}", original.voucher_no),
        }
    }
}
