//! Chart-of-accounts node.

use loom_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::AccountCategory;

/// A chart-of-accounts node with its cached running balance.
///
/// `balance` is a cache of `opening_balance` plus the signed deltas of every
/// posted line on the account. Only the posting path writes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Display name.
    pub name: String,
    /// Optional account code.
    pub code: Option<String>,
    /// Category fixing the balance sign convention.
    pub category: AccountCategory,
    /// Balance carried in when the account was set up.
    pub opening_balance: Decimal,
    /// Cached running balance.
    pub balance: Decimal,
    /// Parent node in the hierarchy.
    pub parent_id: Option<AccountId>,
    /// Control/aggregate accounts take no direct lines.
    pub is_control: bool,
    /// Soft-delete flag.
    pub is_deleted: bool,
}

impl Account {
    /// Returns true if draft lines may reference this account.
    #[must_use]
    pub fn is_postable(&self) -> bool {
        !self.is_control && !self.is_deleted
    }

    /// Returns true if the name contains any of the given fragments,
    /// ignoring case.
    #[must_use]
    pub fn name_matches_any<S: AsRef<str>>(&self, patterns: &[S]) -> bool {
        let name = self.name.to_lowercase();
        patterns
            .iter()
            .any(|pattern| name.contains(&pattern.as_ref().to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(name: &str) -> Account {
        Account {
            id: AccountId::new(),
            name: name.to_string(),
            code: None,
            category: AccountCategory::Asset,
            opening_balance: Decimal::ZERO,
            balance: Decimal::ZERO,
            parent_id: None,
            is_control: false,
            is_deleted: false,
        }
    }

    #[test]
    fn test_postable() {
        let mut acc = account("Cash in Hand");
        assert!(acc.is_postable());
        acc.is_control = true;
        assert!(!acc.is_postable());
        acc.is_control = false;
        acc.is_deleted = true;
        assert!(!acc.is_postable());
    }

    #[test]
    fn test_name_matching() {
        let patterns = ["cash", "bank"];
        assert!(account("Cash in Hand").name_matches_any(&patterns));
        assert!(account("HBL BANK Current").name_matches_any(&patterns));
        assert!(!account("Accounts Receivable").name_matches_any(&patterns));
    }
}
