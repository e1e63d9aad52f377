//! Dashboard repository for headline figures.

use loom_core::dashboard::{DashboardService, DashboardStats};
use loom_core::ledger::{Account, LedgerError};
use loom_shared::config::LedgerConfig;
use sea_orm::{DatabaseConnection, EntityTrait};
use tracing::instrument;

use super::line_facts::load_posted_facts;
use crate::convert::db_err;
use crate::entities::accounts;

/// Dashboard repository.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
    cash_account_patterns: Vec<String>,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: &LedgerConfig) -> Self {
        Self {
            db,
            cash_account_patterns: config.cash_account_patterns.clone(),
        }
    }

    /// Recomputes the dashboard figures from posted lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn get_dashboard_stats(&self) -> Result<DashboardStats, LedgerError> {
        let accounts: Vec<Account> = accounts::Entity::find()
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(Account::from)
            .collect();
        let facts = load_posted_facts(&self.db, None, None).await?;

        Ok(DashboardService::compute(
            &accounts,
            &facts,
            &self.cash_account_patterns,
        ))
    }
}
