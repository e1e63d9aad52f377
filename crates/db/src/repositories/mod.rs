//! Repository abstractions for data access.
//!
//! Repositories own the transaction boundaries and row locks. Ledger rules
//! live in `loom_core`; these types only load state, call into the domain
//! services and persist the result.

pub mod account;
pub mod dashboard;
pub mod journal;
mod line_facts;
pub mod outbox;
pub mod party_ledger;
pub mod report;

pub use account::{AccountRepository, CreateAccountInput};
pub use dashboard::DashboardRepository;
pub use journal::{EntryFilter, JournalRepository, PostingReceipt};
pub use outbox::{DispatchReport, OutboxRepository};
pub use party_ledger::PartyLedgerRepository;
pub use report::ReportRepository;
