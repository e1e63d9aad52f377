//! Financial report generation.
//!
//! Read-only views computed from posted journal lines. Nothing in this
//! module writes account balances.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{ReportError, check_date_range};
pub use service::ReportService;
pub use types::*;
