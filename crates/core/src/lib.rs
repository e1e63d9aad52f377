//! Core business logic for Loom.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Double-entry bookkeeping: journal state machine, posting plans, reversals
//! - `party` - Buyer and supplier ledger reconstruction
//! - `reports` - Trial balance
//! - `dashboard` - Receivable, payable and cash rollups
//! - `outbox` - Retry policy for best-effort postings

pub mod dashboard;
pub mod ledger;
pub mod outbox;
pub mod party;
pub mod reports;
