//! Lifecycle operations: create, batch create, status update, delete.

use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QuerySelect, SqlErr, TransactionTrait,
    prelude::*,
};

use crate::{
    CreateTransactionCmd, Engine, EngineError, ResultEngine, Transaction, TransactionStatus, ids,
    transactions,
};

use super::with_tx;

/// Upper bound on id-allocation retries after unique-key conflicts.
const ID_ALLOC_ATTEMPTS: u32 = 8;

/// One failed batch candidate: its position in the input and the reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchError {
    pub index: usize,
    pub message: String,
}

/// Result of a batch creation.
///
/// Per-item failures never abort the batch; they are collected in `errors`
/// (input order preserved) while the remaining candidates keep processing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub success_count: usize,
    pub failure_count: usize,
    pub created_ids: Vec<String>,
    pub errors: Vec<BatchError>,
}

impl Engine {
    /// Creates a single transaction record.
    ///
    /// Assigns the next sequential identifier and fills defaults (currency
    /// `ZAR`, status `completed`, occurred_at = now). Identifier assignment
    /// and the insert run in one database transaction; a unique-key conflict
    /// retries with the next candidate identifier.
    pub async fn create(&self, cmd: CreateTransactionCmd) -> ResultEngine<Transaction> {
        with_tx!(self, |tx| {
            match next_sequence_in(&tx).await {
                Ok(mut sequence) => self.create_in_tx(&tx, &mut sequence, cmd).await,
                Err(err) => Err(err),
            }
        })
    }

    /// Creates many transaction records in input order.
    ///
    /// Each candidate is processed independently; a candidate that fails
    /// validation (or hits an unexpected store error) is recorded as an error
    /// message and the batch continues. Passing candidates are persisted as a
    /// group.
    pub async fn create_batch(
        &self,
        cmds: Vec<CreateTransactionCmd>,
    ) -> ResultEngine<BatchOutcome> {
        with_tx!(self, |tx| self.create_batch_in_tx(&tx, cmds).await)
    }

    /// Returns a transaction record by id.
    pub async fn transaction(&self, id: &str) -> ResultEngine<Transaction> {
        let model = transactions::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        Transaction::try_from(model)
    }

    /// Updates the status of an existing transaction.
    ///
    /// `refunded` is terminal: the only accepted transition from it is the
    /// no-op back to `refunded`.
    pub async fn update_status(
        &self,
        id: &str,
        new_status: TransactionStatus,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |tx| update_status_in(&tx, id, new_status).await)
    }

    /// Deletes a transaction record.
    ///
    /// Completed records are protected: they must be refunded, not deleted.
    pub async fn delete(&self, id: &str) -> ResultEngine<()> {
        with_tx!(self, |tx| delete_in(&tx, id).await)
    }

    async fn create_batch_in_tx(
        &self,
        tx: &DatabaseTransaction,
        cmds: Vec<CreateTransactionCmd>,
    ) -> ResultEngine<BatchOutcome> {
        let mut outcome = BatchOutcome::default();
        let mut sequence = next_sequence_in(tx).await?;

        for (index, cmd) in cmds.into_iter().enumerate() {
            match self.create_in_tx(tx, &mut sequence, cmd).await {
                Ok(record) => outcome.created_ids.push(record.id),
                Err(EngineError::Database(err)) => {
                    tracing::error!("batch item {index} failed: {err}");
                    outcome.errors.push(BatchError {
                        index,
                        message: "failed to create transaction: internal error".to_string(),
                    });
                }
                Err(err) => outcome.errors.push(BatchError {
                    index,
                    message: err.to_string(),
                }),
            }
        }

        outcome.success_count = outcome.created_ids.len();
        outcome.failure_count = outcome.errors.len();
        Ok(outcome)
    }

    async fn create_in_tx(
        &self,
        tx: &DatabaseTransaction,
        sequence: &mut u64,
        cmd: CreateTransactionCmd,
    ) -> ResultEngine<Transaction> {
        validate_distinct_accounts(&cmd.from_account, &cmd.to_account)?;
        if self.reject_duplicates {
            ensure_not_recorded(tx, &cmd).await?;
        }

        let record = Transaction::new(
            ids::format_id(*sequence),
            cmd.from_account,
            cmd.to_account,
            cmd.amount,
            cmd.currency.unwrap_or_default(),
            cmd.status.unwrap_or(TransactionStatus::Completed),
            Utc::now(),
            cmd.description,
        )?;

        for _ in 0..ID_ALLOC_ATTEMPTS {
            let mut attempt = record.clone();
            attempt.id = ids::format_id(*sequence);
            match transactions::ActiveModel::from(&attempt).insert(tx).await {
                Ok(_) => {
                    *sequence += 1;
                    return Ok(attempt);
                }
                // Another writer claimed the candidate id; move to the next one.
                Err(err) if is_unique_violation(&err) => *sequence += 1,
                Err(err) => return Err(err.into()),
            }
        }

        Err(EngineError::ExistingKey(
            "transaction id allocation exhausted".to_string(),
        ))
    }
}

fn validate_distinct_accounts(from_account: &str, to_account: &str) -> ResultEngine<()> {
    if from_account == to_account {
        return Err(EngineError::InvalidOperation(format!(
            "cannot transfer to same account: {from_account}"
        )));
    }
    Ok(())
}

/// Duplicate gate (config-opt-in): an existing (from, to, amount) triple is a conflict.
async fn ensure_not_recorded(
    tx: &DatabaseTransaction,
    cmd: &CreateTransactionCmd,
) -> ResultEngine<()> {
    let existing = transactions::Entity::find()
        .filter(transactions::Column::FromAccount.eq(cmd.from_account.as_str()))
        .filter(transactions::Column::ToAccount.eq(cmd.to_account.as_str()))
        .filter(transactions::Column::AmountMinor.eq(cmd.amount.cents()))
        .one(tx)
        .await?;

    if existing.is_some() {
        return Err(EngineError::ExistingKey(format!(
            "transfer {} -> {} of {}",
            cmd.from_account, cmd.to_account, cmd.amount
        )));
    }
    Ok(())
}

async fn next_sequence_in(tx: &DatabaseTransaction) -> ResultEngine<u64> {
    let existing: Vec<String> = transactions::Entity::find()
        .select_only()
        .column(transactions::Column::Id)
        .into_tuple()
        .all(tx)
        .await?;
    Ok(ids::next_sequence(existing.iter().map(String::as_str)))
}

async fn update_status_in(
    tx: &DatabaseTransaction,
    id: &str,
    new_status: TransactionStatus,
) -> ResultEngine<Transaction> {
    let model = transactions::Entity::find_by_id(id)
        .one(tx)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;

    let current = TransactionStatus::try_from(model.status.as_str())?;
    if !current.can_transition_to(new_status) {
        return Err(EngineError::InvalidOperation(
            "cannot change status of refunded transaction".to_string(),
        ));
    }

    let active = transactions::ActiveModel {
        id: ActiveValue::Set(id.to_string()),
        status: ActiveValue::Set(new_status.as_str().to_string()),
        ..Default::default()
    };
    let updated = active.update(tx).await?;
    Transaction::try_from(updated)
}

async fn delete_in(tx: &DatabaseTransaction, id: &str) -> ResultEngine<()> {
    let model = transactions::Entity::find_by_id(id)
        .one(tx)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;

    let status = TransactionStatus::try_from(model.status.as_str())?;
    if !status.is_deletable() {
        return Err(EngineError::InvalidOperation(
            "cannot delete completed transaction; use refund instead".to_string(),
        ));
    }

    model.delete(tx).await?;
    Ok(())
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
