//! Journal repository: the engine's write path.
//!
//! Draft creation, posting and reversal each run inside one database
//! transaction. Posting is the only code path that writes account balances.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use loom_core::ledger::{
    Account, AccountBalanceUpdate, CreateDraftInput, EntryCategory, EntryStatus, JournalEntry,
    LedgerError, LedgerService, ReversalService, next_voucher_no, reversal_sequence,
};
use loom_shared::types::{
    AccountId, BuyerId, JournalEntryId, JournalLineId, PageRequest, PageResponse, SupplierId,
};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::convert::{db_err, encode_scope, entry_from_models};
use crate::entities::{
    accounts, journal_entries, journal_lines, sea_orm_active_enums, voucher_sequences,
};

/// Filter options for listing journal entries.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Filter by status.
    pub status: Option<EntryStatus>,
    /// Filter by category.
    pub category: Option<EntryCategory>,
    /// Filter by date range start (inclusive).
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end (inclusive).
    pub date_to: Option<NaiveDate>,
}

/// Result of a successful posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingReceipt {
    /// The posted entry.
    pub entry_id: JournalEntryId,
    /// Its voucher number.
    pub voucher_no: String,
    /// When it was posted.
    pub posted_at: DateTime<Utc>,
    /// Balance changes applied, ordered by account ID.
    pub updates: Vec<AccountBalanceUpdate>,
    /// Human-readable confirmation.
    pub message: String,
}

/// Journal repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a draft entry with its lines.
    ///
    /// Lines are validated for count, positive amounts and postable
    /// accounts. Debits need not equal credits until posting. No account
    /// balance changes.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `AccountNotFound`, `AccountInactive`,
    /// `ControlAccount`, or a database error.
    #[instrument(skip(self, input), fields(category = ?input.category, lines = input.lines.len()))]
    pub async fn create_draft(&self, input: CreateDraftInput) -> Result<JournalEntry, LedgerError> {
        create_draft_on(&self.db, input).await
    }

    /// Posts a draft entry and applies its balance deltas.
    ///
    /// The entry row and every affected account row are locked (accounts
    /// in ascending ID order) before any balance is read. Balance writes and
    /// the status flip commit together; any failure rolls back all of them.
    ///
    /// # Errors
    ///
    /// - `EntryNotFound` if the entry does not exist
    /// - `AlreadyPosted` if it is not a draft
    /// - `UnbalancedEntry` or a line validation error
    /// - a database error
    #[instrument(skip(self))]
    pub async fn post_entry(&self, entry_id: JournalEntryId) -> Result<PostingReceipt, LedgerError> {
        post_entry_on(&self.db, entry_id).await
    }

    /// Creates a new draft that reverses `entry_id`.
    ///
    /// The original is read in any status and never modified. Posting the
    /// reversal is a separate call.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the original does not exist.
    #[instrument(skip(self))]
    pub async fn reverse_entry(&self, entry_id: JournalEntryId) -> Result<JournalEntry, LedgerError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        // Locking the original serializes reversals of the same entry.
        let original_model = journal_entries::Entity::find_by_id(entry_id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;
        let original_lines = load_lines(&txn, original_model.id).await?;
        let original = entry_from_models(original_model, original_lines)?;
        let issued: Vec<String> = journal_entries::Entity::find()
            .select_only()
            .column(journal_entries::Column::VoucherNo)
            .filter(journal_entries::Column::ReversesEntryId.eq(entry_id.into_inner()))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(db_err)?;
        let last = issued
            .iter()
            .filter_map(|v| reversal_sequence(&original.voucher_no, v))
            .max()
            .unwrap_or(0);

        let reversal = ReversalService::build(&original, last);
        let entry = insert_entry(&txn, &reversal.voucher_no, &reversal.input, Some(entry_id)).await?;
        txn.commit().await.map_err(db_err)?;

        info!(
            original_id = %entry_id,
            entry_id = %entry.id,
            voucher_no = %entry.voucher_no,
            "reversal draft created"
        );
        Ok(entry)
    }

    /// Gets an entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the entry does not exist.
    pub async fn get_entry(&self, entry_id: JournalEntryId) -> Result<JournalEntry, LedgerError> {
        fetch_entry(&self.db, entry_id).await
    }

    /// Lists entries with their lines, ordered by date then creation time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_entries(
        &self,
        filter: EntryFilter,
        page: PageRequest,
    ) -> Result<PageResponse<JournalEntry>, LedgerError> {
        let page = page.normalized();
        let mut query = journal_entries::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(
                journal_entries::Column::Status.eq(sea_orm_active_enums::EntryStatus::from(status)),
            );
        }
        if let Some(category) = filter.category {
            query = query.filter(
                journal_entries::Column::Category
                    .eq(sea_orm_active_enums::EntryCategory::from(category)),
            );
        }
        if let Some(date_from) = filter.date_from {
            query = query.filter(journal_entries::Column::Date.gte(date_from));
        }
        if let Some(date_to) = filter.date_to {
            query = query.filter(journal_entries::Column::Date.lte(date_to));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;
        let headers = query
            .order_by_asc(journal_entries::Column::Date)
            .order_by_asc(journal_entries::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut lines_by_entry: HashMap<Uuid, Vec<journal_lines::Model>> = HashMap::new();
        for line in journal_lines::Entity::find()
            .filter(journal_lines::Column::EntryId.is_in(headers.iter().map(|h| h.id)))
            .all(&self.db)
            .await
            .map_err(db_err)?
        {
            lines_by_entry.entry(line.entry_id).or_default().push(line);
        }

        let entries = headers
            .into_iter()
            .map(|header| {
                let lines = lines_by_entry.remove(&header.id).unwrap_or_default();
                entry_from_models(header, lines)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PageResponse::new(entries, page.page, page.limit, total))
    }

    /// Deletes a draft entry and its lines.
    ///
    /// # Errors
    ///
    /// - `EntryNotFound` if the entry does not exist
    /// - `CannotDiscardPosted` if it has been posted
    #[instrument(skip(self))]
    pub async fn discard_draft(&self, entry_id: JournalEntryId) -> Result<(), LedgerError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let model = journal_entries::Entity::find_by_id(entry_id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;

        if EntryStatus::from(model.status).is_immutable() {
            return Err(LedgerError::CannotDiscardPosted(entry_id));
        }

        journal_lines::Entity::delete_many()
            .filter(journal_lines::Column::EntryId.eq(model.id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        model.delete(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        info!(%entry_id, "journal draft discarded");
        Ok(())
    }
}

/// Creates a draft on `conn`, inside a transaction of its own (a savepoint
/// when `conn` is already a transaction).
pub(crate) async fn create_draft_on<C: TransactionTrait>(
    conn: &C,
    input: CreateDraftInput,
) -> Result<JournalEntry, LedgerError> {
    let txn = conn.begin().await.map_err(db_err)?;

    let accounts = load_accounts(&txn, input.lines.iter().map(|l| l.account_id)).await?;
    LedgerService::validate_draft(&input, |id| accounts.get(&id))?;
    if (input.buyer_id.is_some() || input.supplier_id.is_some())
        && !LedgerService::has_party_lines(&input)
    {
        warn!(
            buyer_id = ?input.buyer_id,
            supplier_id = ?input.supplier_id,
            "draft links a party but no line is scoped to it"
        );
    }

    let last = advance_voucher_sequence(&txn, input.category).await?;
    let voucher_no = next_voucher_no(input.category, last);

    let entry = insert_entry(&txn, &voucher_no, &input, None).await?;
    txn.commit().await.map_err(db_err)?;

    info!(
        entry_id = %entry.id,
        voucher_no = %entry.voucher_no,
        lines = entry.lines.len(),
        "journal draft created"
    );
    Ok(entry)
}

/// Posts a draft on `conn`, inside a transaction of its own (a savepoint
/// when `conn` is already a transaction).
pub(crate) async fn post_entry_on<C: TransactionTrait>(
    conn: &C,
    entry_id: JournalEntryId,
) -> Result<PostingReceipt, LedgerError> {
    let txn = conn.begin().await.map_err(db_err)?;

    let entry_model = journal_entries::Entity::find_by_id(entry_id.into_inner())
        .lock_exclusive()
        .one(&txn)
        .await
        .map_err(db_err)?
        .ok_or(LedgerError::EntryNotFound(entry_id))?;
    let lines = load_lines(&txn, entry_model.id).await?;
    let entry = entry_from_models(entry_model.clone(), lines)?;

    let lock_order = LedgerService::accounts_to_lock(&entry);
    let account_models: HashMap<Uuid, accounts::Model> = accounts::Entity::find()
        .filter(accounts::Column::Id.is_in(lock_order.iter().map(|id| id.into_inner())))
        .order_by_asc(accounts::Column::Id)
        .lock_exclusive()
        .all(&txn)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();
    let snapshot: HashMap<AccountId, Account> = account_models
        .values()
        .map(|m| (AccountId::from_uuid(m.id), Account::from(m.clone())))
        .collect();

    let plan = match LedgerService::plan_posting(&entry, &snapshot) {
        Ok(plan) => plan,
        Err(err) => {
            warn!(
                %entry_id,
                voucher_no = %entry.voucher_no,
                code = err.error_code(),
                "posting rejected"
            );
            return Err(err);
        }
    };

    let now = Utc::now();
    for update in &plan.updates {
        let model = account_models
            .get(&update.account_id.into_inner())
            .cloned()
            .ok_or(LedgerError::AccountNotFound(update.account_id))?;
        let mut active: accounts::ActiveModel = model.into();
        active.balance = Set(update.new_balance);
        active.updated_at = Set(now.into());
        active.update(&txn).await.map_err(db_err)?;
    }

    let mut active: journal_entries::ActiveModel = entry_model.into();
    active.status = Set(sea_orm_active_enums::EntryStatus::Posted);
    active.posted_at = Set(Some(now.into()));
    active.update(&txn).await.map_err(db_err)?;

    txn.commit().await.map_err(db_err)?;

    info!(
        %entry_id,
        voucher_no = %entry.voucher_no,
        lines = entry.lines.len(),
        total = %plan.totals.debit,
        "journal entry posted"
    );
    Ok(PostingReceipt {
        entry_id,
        message: format!("Journal entry {} posted", entry.voucher_no),
        voucher_no: entry.voucher_no,
        posted_at: now,
        updates: plan.updates,
    })
}

/// Bumps the category counter and returns its previous value.
///
/// The counter row stays locked until `txn` ends, so a concurrent draft in
/// the same category waits for this one to commit or roll back.
async fn advance_voucher_sequence(
    txn: &DatabaseTransaction,
    category: EntryCategory,
) -> Result<u64, LedgerError> {
    let tag = sea_orm_active_enums::EntryCategory::from(category).to_value();
    let counter = voucher_sequences::Entity::find_by_id(tag)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| LedgerError::Internal(format!("no voucher sequence for {category:?}")))?;

    let last = counter.last_value;
    let mut active: voucher_sequences::ActiveModel = counter.into();
    active.last_value = Set(last + 1);
    active.updated_at = Set(Utc::now().into());
    active.update(txn).await.map_err(db_err)?;

    u64::try_from(last).map_err(|_| LedgerError::Internal(format!("negative voucher sequence {last}")))
}

/// Loads the accounts referenced by a set of lines.
async fn load_accounts<C: ConnectionTrait>(
    conn: &C,
    ids: impl Iterator<Item = AccountId>,
) -> Result<HashMap<AccountId, Account>, LedgerError> {
    let mut ids: Vec<Uuid> = ids.map(AccountId::into_inner).collect();
    ids.sort_unstable();
    ids.dedup();

    let models = accounts::Entity::find()
        .filter(accounts::Column::Id.is_in(ids))
        .all(conn)
        .await
        .map_err(db_err)?;
    Ok(models
        .into_iter()
        .map(|m| (AccountId::from_uuid(m.id), Account::from(m)))
        .collect())
}

async fn load_lines<C: ConnectionTrait>(
    conn: &C,
    entry_id: Uuid,
) -> Result<Vec<journal_lines::Model>, LedgerError> {
    journal_lines::Entity::find()
        .filter(journal_lines::Column::EntryId.eq(entry_id))
        .order_by_asc(journal_lines::Column::LineNo)
        .all(conn)
        .await
        .map_err(db_err)
}

pub(crate) async fn fetch_entry<C: ConnectionTrait>(
    conn: &C,
    entry_id: JournalEntryId,
) -> Result<JournalEntry, LedgerError> {
    let model = journal_entries::Entity::find_by_id(entry_id.into_inner())
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or(LedgerError::EntryNotFound(entry_id))?;
    let lines = load_lines(conn, model.id).await?;
    entry_from_models(model, lines)
}

/// Inserts a draft header and its lines.
async fn insert_entry(
    txn: &DatabaseTransaction,
    voucher_no: &str,
    input: &CreateDraftInput,
    reverses: Option<JournalEntryId>,
) -> Result<JournalEntry, LedgerError> {
    let entry_id = JournalEntryId::new().into_inner();

    let header = journal_entries::ActiveModel {
        id: Set(entry_id),
        voucher_no: Set(voucher_no.to_string()),
        date: Set(input.date),
        category: Set(input.category.into()),
        narration: Set(input.narration.clone()),
        status: Set(sea_orm_active_enums::EntryStatus::Draft),
        buyer_id: Set(input.buyer_id.map(BuyerId::into_inner)),
        supplier_id: Set(input.supplier_id.map(SupplierId::into_inner)),
        company_profile_id: Set(input.company_profile_id.into_inner()),
        reverses_entry_id: Set(reverses.map(JournalEntryId::into_inner)),
        posted_at: Set(None),
        created_at: Set(Utc::now().into()),
    }
    .insert(txn)
    .await
    .map_err(db_err)?;

    let mut lines = Vec::with_capacity(input.lines.len());
    for (line_no, line) in (1..).zip(&input.lines) {
        let (scope_kind, scope_id) = encode_scope(line.scope);
        let model = journal_lines::ActiveModel {
            id: Set(JournalLineId::new().into_inner()),
            entry_id: Set(entry_id),
            line_no: Set(line_no),
            account_id: Set(line.account_id.into_inner()),
            line_type: Set(line.line_type.into()),
            amount: Set(line.amount),
            scope_kind: Set(scope_kind),
            scope_id: Set(scope_id),
        }
        .insert(txn)
        .await
        .map_err(db_err)?;
        lines.push(model);
    }

    entry_from_models(header, lines)
}
