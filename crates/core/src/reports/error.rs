//! Report error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while building ledgers and reports.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidDateRange { .. } => 400,
            Self::Database(_) => 500,
        }
    }
}

/// Rejects a range whose start falls after its end.
///
/// Open-ended ranges are always valid.
pub fn check_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ReportError> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => {
            Err(ReportError::InvalidDateRange { start, end })
        }
        _ => Ok(()),
    }
}
