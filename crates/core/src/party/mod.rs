//! Party ledger reconstruction.
//!
//! Rebuilds a buyer's or supplier's statement from the journal lines tagged
//! with that party: an opening balance, one row per entry with a running
//! balance, and a closing balance.

pub mod service;
pub mod types;


pub use service::PartyLedgerService;
pub use types::{PartyLedger, PartyLedgerQuery, PartyLedgerRow, PartyRef};
