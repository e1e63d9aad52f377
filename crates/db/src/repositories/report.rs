//! Report repository for trial balance queries.

use chrono::NaiveDate;
use loom_core::ledger::Account;
use loom_core::reports::{ReportError, ReportService, TrialBalanceReport, check_date_range};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use tracing::instrument;

use super::line_facts::load_posted_facts;
use crate::entities::accounts;

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Generates the trial balance for `[start_date, end_date]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if `start_date > end_date`, or a database
    /// error.
    #[instrument(skip(self))]
    pub async fn get_trial_balance(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<TrialBalanceReport, ReportError> {
        check_date_range(Some(start_date), Some(end_date))?;

        let accounts: Vec<Account> = accounts::Entity::find()
            .order_by_asc(accounts::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| ReportError::Database(e.to_string()))?
            .into_iter()
            .map(Account::from)
            .collect();
        let facts = load_posted_facts(&self.db, Some(end_date), None)
            .await
            .map_err(|e| ReportError::Database(e.to_string()))?;

        ReportService::trial_balance(&accounts, &facts, start_date, end_date)
    }
}
