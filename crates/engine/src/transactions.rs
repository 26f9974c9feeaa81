//! Transaction primitives.
//!
//! A `Transaction` is one transfer record between two account identifiers.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError, Money, ResultEngine};

/// Closed set of transaction statuses.
///
/// The HTTP boundary rejects anything outside this set, so free-form status
/// strings never reach storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Refunded,
    Disputed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Refunded => "refunded",
            Self::Disputed => "disputed",
            Self::Failed => "failed",
        }
    }

    /// Status transition table.
    ///
    /// `refunded` is terminal: the only permitted transition is the no-op back
    /// to `refunded`. Every other status may move anywhere.
    #[must_use]
    pub fn can_transition_to(self, next: TransactionStatus) -> bool {
        match self {
            Self::Refunded => next == Self::Refunded,
            Self::Pending | Self::Completed | Self::Disputed | Self::Failed => true,
        }
    }

    /// Completed records cannot be deleted (use a refund instead).
    #[must_use]
    pub fn is_deletable(self) -> bool {
        !matches!(self, Self::Completed)
    }
}

impl TryFrom<&str> for TransactionStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "refunded" => Ok(Self::Refunded),
            "disputed" => Ok(Self::Disputed),
            "failed" => Ok(Self::Failed),
            other => Err(EngineError::InvalidStatus(format!(
                "invalid transaction status: {other}"
            ))),
        }
    }
}

impl core::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub from_account: String,
    pub to_account: String,
    pub amount: Money,
    pub currency: Currency,
    pub status: TransactionStatus,
    pub occurred_at: DateTime<Utc>,
    pub description: Option<String>,
}

impl Transaction {
    pub fn new(
        id: String,
        from_account: String,
        to_account: String,
        amount: Money,
        currency: Currency,
        status: TransactionStatus,
        occurred_at: DateTime<Utc>,
        description: Option<String>,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id,
            from_account,
            to_account,
            amount,
            currency,
            status,
            occurred_at,
            description,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub from_account: String,
    pub to_account: String,
    pub amount_minor: i64,
    pub currency: String,
    pub status: String,
    pub occurred_at: DateTimeUtc,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.clone()),
            from_account: ActiveValue::Set(tx.from_account.clone()),
            to_account: ActiveValue::Set(tx.to_account.clone()),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            currency: ActiveValue::Set(tx.currency.code().to_string()),
            status: ActiveValue::Set(tx.status.as_str().to_string()),
            occurred_at: ActiveValue::Set(tx.occurred_at),
            description: ActiveValue::Set(tx.description.clone()),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            from_account: model.from_account,
            to_account: model.to_account,
            amount: Money::new(model.amount_minor),
            currency: Currency::try_from(model.currency.as_str()).unwrap_or_default(),
            status: TransactionStatus::try_from(model.status.as_str())?,
            occurred_at: model.occurred_at,
            description: model.description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refunded_is_terminal() {
        let refunded = TransactionStatus::Refunded;
        assert!(refunded.can_transition_to(TransactionStatus::Refunded));
        assert!(!refunded.can_transition_to(TransactionStatus::Completed));
        assert!(!refunded.can_transition_to(TransactionStatus::Pending));
        assert!(!refunded.can_transition_to(TransactionStatus::Disputed));
        assert!(!refunded.can_transition_to(TransactionStatus::Failed));
    }

    #[test]
    fn non_refunded_statuses_move_freely() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Completed,
            TransactionStatus::Disputed,
            TransactionStatus::Failed,
        ] {
            assert!(status.can_transition_to(TransactionStatus::Refunded));
            assert!(status.can_transition_to(TransactionStatus::Pending));
        }
    }

    #[test]
    fn only_completed_blocks_deletion() {
        assert!(!TransactionStatus::Completed.is_deletable());
        assert!(TransactionStatus::Pending.is_deletable());
        assert!(TransactionStatus::Refunded.is_deletable());
        assert!(TransactionStatus::Disputed.is_deletable());
        assert!(TransactionStatus::Failed.is_deletable());
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Completed,
            TransactionStatus::Refunded,
            TransactionStatus::Disputed,
            TransactionStatus::Failed,
        ] {
            assert_eq!(TransactionStatus::try_from(status.as_str()), Ok(status));
        }
        assert!(TransactionStatus::try_from("cancelled").is_err());
    }

    #[test]
    fn new_rejects_non_positive_amount() {
        let result = Transaction::new(
            "TX0001".to_string(),
            "001".to_string(),
            "002".to_string(),
            Money::ZERO,
            Currency::Zar,
            TransactionStatus::Completed,
            Utc::now(),
            None,
        );
        assert!(matches!(result, Err(EngineError::InvalidAmount(_))));
    }
}
