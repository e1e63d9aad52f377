//! Outbox message types.

use serde::{Deserialize, Serialize};

use crate::ledger::{CreateDraftInput, LedgerError};

/// A journal side effect requested by a calling module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingRequest {
    /// Originating module and record, e.g. `invoice:INV-2031`.
    pub source: String,
    /// The entry to create.
    pub draft: CreateDraftInput,
    /// Post the draft right after creating it.
    #[serde(default)]
    pub post_immediately: bool,
}

impl PostingRequest {
    /// Encodes the request for storage.
    pub fn to_json(&self) -> Result<String, LedgerError> {
        serde_json::to_string(self).map_err(|e| LedgerError::Internal(e.to_string()))
    }

    /// Decodes a stored request.
    pub fn from_json(payload: &str) -> Result<Self, LedgerError> {
        serde_json::from_str(payload).map_err(|e| LedgerError::Internal(e.to_string()))
    }
}
