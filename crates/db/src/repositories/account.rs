//! Account repository for chart of accounts database operations.

use chrono::Utc;
use loom_core::ledger::{Account, AccountCategory, BalanceCheck, LedgerError, replay_balance};
use loom_shared::types::AccountId;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{info, instrument, warn};

use super::line_facts::load_posted_facts;
use crate::convert::db_err;
use crate::entities::accounts;

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Display name.
    pub name: String,
    /// Optional account code.
    pub code: Option<String>,
    /// Category.
    pub category: AccountCategory,
    /// Balance carried in at setup.
    pub opening_balance: Decimal,
    /// Parent node.
    pub parent_id: Option<AccountId>,
    /// Control accounts take no direct lines.
    pub is_control: bool,
}

impl CreateAccountInput {
    /// Creates a postable account with a zero opening balance.
    #[must_use]
    pub fn new(name: impl Into<String>, category: AccountCategory) -> Self {
        Self {
            name: name.into(),
            code: None,
            category,
            opening_balance: Decimal::ZERO,
            parent_id: None,
            is_control: false,
        }
    }

    /// Sets the opening balance.
    #[must_use]
    pub fn with_opening_balance(mut self, opening_balance: Decimal) -> Self {
        self.opening_balance = opening_balance;
        self
    }

    /// Sets the account code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Marks the account as a control account.
    #[must_use]
    pub fn control(mut self) -> Self {
        self.is_control = true;
        self
    }
}

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account whose cached balance starts at its opening balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_account(&self, input: CreateAccountInput) -> Result<Account, LedgerError> {
        let now = Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(AccountId::new().into_inner()),
            name: Set(input.name),
            code: Set(input.code),
            category: Set(input.category.into()),
            opening_balance: Set(input.opening_balance),
            balance: Set(input.opening_balance),
            parent_id: Set(input.parent_id.map(AccountId::into_inner)),
            is_control: Set(input.is_control),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = account.insert(&self.db).await.map_err(db_err)?;
        info!(account_id = %model.id, "account created");
        Ok(model.into())
    }

    /// Gets an account by ID, including soft-deleted accounts.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if no such account exists.
    pub async fn get_account(&self, account_id: AccountId) -> Result<Account, LedgerError> {
        accounts::Entity::find_by_id(account_id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(Account::from)
            .ok_or(LedgerError::AccountNotFound(account_id))
    }

    /// Lists accounts ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(&self, include_deleted: bool) -> Result<Vec<Account>, LedgerError> {
        let mut query = accounts::Entity::find();
        if !include_deleted {
            query = query.filter(accounts::Column::IsDeleted.eq(false));
        }

        let models = query
            .order_by_asc(accounts::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(Account::from).collect())
    }

    /// Flags an account as deleted. The row and its history are kept.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if no such account exists.
    #[instrument(skip(self))]
    pub async fn soft_delete_account(&self, account_id: AccountId) -> Result<Account, LedgerError> {
        let model = accounts::Entity::find_by_id(account_id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::AccountNotFound(account_id))?;

        let mut active: accounts::ActiveModel = model.into();
        active.is_deleted = Set(true);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await.map_err(db_err)?;

        info!(%account_id, "account soft-deleted");
        Ok(updated.into())
    }

    /// Replays the account's posted lines and compares the result with the
    /// cached balance. Never writes.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if no such account exists.
    #[instrument(skip(self))]
    pub async fn verify_account_balance(
        &self,
        account_id: AccountId,
    ) -> Result<BalanceCheck, LedgerError> {
        let account = self.get_account(account_id).await?;
        let facts = load_posted_facts(&self.db, None, Some(account_id.into_inner())).await?;

        let replayed =
            replay_balance(account.id, account.category, account.opening_balance, &facts);
        let check = BalanceCheck::new(account.id, account.balance, replayed);
        if !check.is_consistent() {
            warn!(
                %account_id,
                cached = %check.cached,
                replayed = %check.replayed,
                "account balance drift detected"
            );
        }
        Ok(check)
    }
}
