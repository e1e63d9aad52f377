//! Posting outbox rules.
//!
//! Calling modules record journal side effects as outbox messages instead of
//! posting inline, so their own operation never fails because of the ledger.
//! A worker replays the messages with retry and dead-lettering.

pub mod policy;
pub mod types;

pub use policy::{OutboxDecision, RetryPolicy};
pub use types::PostingRequest;
