//! Party ledger repository.
//!
//! The opening balance is summed in SQL over the party's lines dated before
//! the window. Only entries dated inside the window are loaded, each with
//! all of its lines so the counter-account can be named.

use std::collections::{BTreeSet, HashMap};

use loom_core::party::{PartyLedger, PartyLedgerQuery, PartyLedgerService, PartyRef};
use loom_core::reports::{ReportError, check_date_range};
use loom_shared::config::LedgerConfig;
use loom_shared::types::AccountId;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Query, SelectStatement};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::convert::entry_from_models;
use crate::entities::{
    accounts, journal_entries, journal_lines,
    sea_orm_active_enums::{LineType, ScopeKind},
};

fn report_err(err: DbErr) -> ReportError {
    ReportError::Database(err.to_string())
}

/// Reads buyer and supplier ledgers.
#[derive(Debug, Clone)]
pub struct PartyLedgerRepository {
    db: DatabaseConnection,
    multi_account_label: String,
}

impl PartyLedgerRepository {
    /// Creates a new party ledger repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: &LedgerConfig) -> Self {
        Self {
            db,
            multi_account_label: config.multi_account_label.clone(),
        }
    }

    /// Reconstructs a party ledger over draft and posted entries.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if the window start falls after its end,
    /// or a database error.
    #[instrument(skip(self), fields(party = ?query.party))]
    pub async fn get_party_ledger(
        &self,
        query: &PartyLedgerQuery,
    ) -> Result<PartyLedger, ReportError> {
        check_date_range(query.start_date, query.end_date)?;

        let opening_balance = self.opening_balance(query).await?;

        let mut window = journal_lines::Entity::find()
            .find_also_related(journal_entries::Entity)
            .filter(journal_lines::Column::EntryId.in_subquery(party_entry_ids(query.party)));
        if let Some(start) = query.start_date {
            window = window.filter(journal_entries::Column::Date.gte(start));
        }
        if let Some(end) = query.end_date {
            window = window.filter(journal_entries::Column::Date.lte(end));
        }
        let rows = window
            .order_by_asc(journal_entries::Column::Date)
            .order_by_asc(journal_lines::Column::LineNo)
            .all(&self.db)
            .await
            .map_err(report_err)?;

        let mut grouped: HashMap<Uuid, (journal_entries::Model, Vec<journal_lines::Model>)> =
            HashMap::new();
        for (line, header) in rows {
            let Some(header) = header else { continue };
            grouped
                .entry(header.id)
                .or_insert_with(|| (header, Vec::new()))
                .1
                .push(line);
        }

        let account_ids: BTreeSet<Uuid> = grouped
            .values()
            .flat_map(|(_, lines)| lines.iter().map(|line| line.account_id))
            .collect();
        let account_names: HashMap<AccountId, String> = accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(account_ids))
            .all(&self.db)
            .await
            .map_err(report_err)?
            .into_iter()
            .map(|a| (AccountId::from_uuid(a.id), a.name))
            .collect();

        let entries = grouped
            .into_values()
            .map(|(header, lines)| entry_from_models(header, lines))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ReportError::Database(e.to_string()))?;
        debug!(entries = entries.len(), %opening_balance, "party window loaded");

        PartyLedgerService::build_window(
            query,
            opening_balance,
            &entries,
            &account_names,
            &self.multi_account_label,
        )
    }

    /// Sums the party's lines dated before the window start.
    async fn opening_balance(&self, query: &PartyLedgerQuery) -> Result<Decimal, ReportError> {
        let Some(start) = query.start_date else {
            return Ok(Decimal::ZERO);
        };
        let (kind, party_id) = scope_of(query.party);

        let totals: Vec<(LineType, Option<Decimal>)> = journal_lines::Entity::find()
            .select_only()
            .column(journal_lines::Column::LineType)
            .column_as(journal_lines::Column::Amount.sum(), "total")
            .inner_join(journal_entries::Entity)
            .filter(journal_lines::Column::ScopeKind.eq(kind))
            .filter(journal_lines::Column::ScopeId.eq(party_id))
            .filter(journal_entries::Column::Date.lt(start))
            .group_by(journal_lines::Column::LineType)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(report_err)?;

        let mut debit = Decimal::ZERO;
        let mut credit = Decimal::ZERO;
        for (line_type, total) in totals {
            match line_type {
                LineType::Debit => debit += total.unwrap_or_default(),
                LineType::Credit => credit += total.unwrap_or_default(),
            }
        }
        Ok(PartyLedgerService::opening_from_totals(query.party, debit, credit))
    }
}

fn scope_of(party: PartyRef) -> (ScopeKind, Uuid) {
    match party {
        PartyRef::Buyer(id) => (ScopeKind::Buyer, id.into_inner()),
        PartyRef::Supplier(id) => (ScopeKind::Supplier, id.into_inner()),
    }
}

/// `SELECT entry_id FROM journal_lines` restricted to the party's lines.
fn party_entry_ids(party: PartyRef) -> SelectStatement {
    let (kind, party_id) = scope_of(party);
    Query::select()
        .column(journal_lines::Column::EntryId)
        .from(journal_lines::Entity)
        .and_where(journal_lines::Column::ScopeKind.eq(kind))
        .and_where(journal_lines::Column::ScopeId.eq(party_id))
        .to_owned()
}
