//! Posting outbox repository.
//!
//! Calling modules enqueue journal side effects here. The worker drains
//! due messages, retrying transient failures with backoff and dead-lettering
//! the rest. Each message is claimed with `FOR UPDATE SKIP LOCKED` and
//! delivered inside the claiming transaction, so concurrent workers never
//! deliver the same message twice.

use chrono::Utc;
use loom_core::ledger::{JournalEntry, LedgerError};
use loom_core::outbox::{OutboxDecision, PostingRequest, RetryPolicy};
use loom_shared::types::{JournalEntryId, OutboxMessageId};
use sea_orm::sea_query::{LockBehavior, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use super::journal::{create_draft_on, fetch_entry, post_entry_on};
use crate::convert::db_err;
use crate::entities::{posting_outbox, sea_orm_active_enums::OutboxStatus};

/// Counts from one dispatch round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    /// Messages whose entry was created (and posted if requested).
    pub delivered: u32,
    /// Messages rescheduled after a transient failure.
    pub retried: u32,
    /// Messages given up on.
    pub dead: u32,
}

/// Outbox repository.
#[derive(Debug, Clone)]
pub struct OutboxRepository {
    db: DatabaseConnection,
}

impl OutboxRepository {
    /// Creates a new outbox repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a posting request for later delivery.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be encoded or stored.
    #[instrument(skip(self, request), fields(source = %request.source))]
    pub async fn enqueue(&self, request: &PostingRequest) -> Result<OutboxMessageId, LedgerError> {
        let id = OutboxMessageId::new();
        let now = Utc::now().into();

        posting_outbox::ActiveModel {
            id: Set(id.into_inner()),
            source: Set(request.source.clone()),
            payload: Set(request.to_json()?),
            status: Set(OutboxStatus::Pending),
            attempts: Set(0),
            next_attempt_at: Set(now),
            last_error: Set(None),
            entry_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        info!(message_id = %id, "posting request enqueued");
        Ok(id)
    }

    /// Enqueues without failing the caller. Failures are logged only.
    pub async fn enqueue_best_effort(&self, request: &PostingRequest) -> Option<OutboxMessageId> {
        match self.enqueue(request).await {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(
                    source = %request.source,
                    error = %err,
                    "failed to enqueue journal posting, continuing"
                );
                None
            }
        }
    }

    /// Delivers up to `batch_size` due messages.
    ///
    /// Messages are claimed one at a time in their own transaction. Rows
    /// another worker holds are skipped. The draft, its posting and the
    /// message's new state commit together, and a message whose draft was
    /// created in an earlier attempt is only re-posted, never created twice.
    ///
    /// # Errors
    ///
    /// Returns an error only if the outbox itself cannot be read or
    /// updated. Delivery failures are recorded on the message.
    #[instrument(skip(self, policy))]
    pub async fn dispatch_due(
        &self,
        policy: &RetryPolicy,
        batch_size: u64,
    ) -> Result<DispatchReport, LedgerError> {
        let mut report = DispatchReport::default();

        for _ in 0..batch_size {
            let txn = self.db.begin().await.map_err(db_err)?;
            let Some(message) = posting_outbox::Entity::find()
                .filter(posting_outbox::Column::Status.eq(OutboxStatus::Pending))
                .filter(posting_outbox::Column::NextAttemptAt.lte(Utc::now()))
                .order_by_asc(posting_outbox::Column::NextAttemptAt)
                .lock_with_behavior(LockType::Update, LockBehavior::SkipLocked)
                .one(&txn)
                .await
                .map_err(db_err)?
            else {
                break;
            };

            let mut created = message.entry_id.map(JournalEntryId::from_uuid);
            let outcome = deliver(&txn, &message.payload, &mut created).await;

            let attempts = message.attempts.saturating_add(1);
            let message_id = message.id;
            let mut active: posting_outbox::ActiveModel = message.into();
            active.attempts = Set(attempts);
            active.entry_id = Set(created.map(JournalEntryId::into_inner));
            active.updated_at = Set(Utc::now().into());

            match outcome {
                Ok(entry) => {
                    active.status = Set(OutboxStatus::Delivered);
                    active.last_error = Set(None);
                    report.delivered += 1;
                    info!(%message_id, entry_id = %entry.id, voucher_no = %entry.voucher_no, "posting request delivered");
                }
                Err(err) => {
                    active.last_error = Set(Some(err.to_string()));
                    let tries = u32::try_from(attempts).unwrap_or(u32::MAX);
                    match policy.decide(tries, err.is_retryable(), Utc::now()) {
                        OutboxDecision::Retry { at } => {
                            active.next_attempt_at = Set(at.into());
                            report.retried += 1;
                            warn!(%message_id, attempts, error = %err, "posting request failed, will retry");
                        }
                        OutboxDecision::DeadLetter => {
                            active.status = Set(OutboxStatus::Dead);
                            report.dead += 1;
                            error!(%message_id, attempts, code = err.error_code(), error = %err, "posting request dead-lettered");
                        }
                    }
                }
            }

            active.update(&txn).await.map_err(db_err)?;
            txn.commit().await.map_err(db_err)?;
        }

        Ok(report)
    }

    /// Lists dead-lettered messages, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn dead_letters(&self, limit: u64) -> Result<Vec<posting_outbox::Model>, LedgerError> {
        posting_outbox::Entity::find()
            .filter(posting_outbox::Column::Status.eq(OutboxStatus::Dead))
            .order_by_desc(posting_outbox::Column::UpdatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Gets a message by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_message(
        &self,
        id: OutboxMessageId,
    ) -> Result<Option<posting_outbox::Model>, LedgerError> {
        posting_outbox::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)
    }
}

/// Creates (unless already created) and optionally posts one request.
///
/// Each step runs in a savepoint of the claiming transaction, so a failed
/// step leaves the claim usable for recording the outcome.
async fn deliver(
    txn: &DatabaseTransaction,
    payload: &str,
    created: &mut Option<JournalEntryId>,
) -> Result<JournalEntry, LedgerError> {
    let request = PostingRequest::from_json(payload)?;

    let entry = match *created {
        Some(entry_id) => fetch_entry(txn, entry_id).await?,
        None => {
            let entry = create_draft_on(txn, request.draft).await?;
            *created = Some(entry.id);
            entry
        }
    };

    if request.post_immediately && entry.can_post() {
        post_entry_on(txn, entry.id).await?;
    }
    Ok(entry)
}
