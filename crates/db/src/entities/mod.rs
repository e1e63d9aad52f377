//! `SeaORM` entity definitions.

pub mod prelude;

pub mod accounts;
pub mod journal_entries;
pub mod journal_lines;
pub mod posting_outbox;
pub mod sea_orm_active_enums;
pub mod voucher_sequences;
