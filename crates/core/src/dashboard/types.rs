//! Dashboard data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Headline figures for the accounting dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Net of buyer-scoped posted lines, debit positive.
    pub total_receivables: Decimal,
    /// Net of supplier-scoped posted lines, credit positive.
    pub total_payables: Decimal,
    /// Position of asset accounts named like cash or bank.
    pub cash_and_bank_balance: Decimal,
    /// Position of all active asset accounts.
    pub total_assets: Decimal,
    /// Position of all active liability accounts.
    pub total_liabilities: Decimal,
}
