//! Shared loader for posted line history.

use chrono::NaiveDate;
use loom_core::ledger::{LedgerError, LineFact};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::convert::{db_err, fact_from_models};
use crate::entities::{journal_entries, journal_lines, sea_orm_active_enums::EntryStatus};

/// Loads every posted line dated on or before `until`, optionally for one
/// account only.
pub(crate) async fn load_posted_facts<C: ConnectionTrait>(
    conn: &C,
    until: Option<NaiveDate>,
    account_id: Option<Uuid>,
) -> Result<Vec<LineFact>, LedgerError> {
    let mut query = journal_lines::Entity::find()
        .find_also_related(journal_entries::Entity)
        .filter(journal_entries::Column::Status.eq(EntryStatus::Posted));

    if let Some(until) = until {
        query = query.filter(journal_entries::Column::Date.lte(until));
    }
    if let Some(account_id) = account_id {
        query = query.filter(journal_lines::Column::AccountId.eq(account_id));
    }

    let rows = query
        .order_by_asc(journal_entries::Column::Date)
        .order_by_asc(journal_lines::Column::LineNo)
        .all(conn)
        .await
        .map_err(db_err)?;

    rows.into_iter()
        .filter_map(|(line, entry)| entry.map(|entry| (line, entry)))
        .map(|(line, entry)| fact_from_models(line, &entry))
        .collect()
}
