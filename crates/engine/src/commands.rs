//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use crate::{Currency, Money, TransactionStatus};

/// Create a transaction record.
///
/// The engine assigns the identifier and the timestamp, and fills unset
/// fields with defaults (currency `ZAR`, status `completed`).
#[derive(Clone, Debug)]
pub struct CreateTransactionCmd {
    pub from_account: String,
    pub to_account: String,
    pub amount: Money,
    pub currency: Option<Currency>,
    pub status: Option<TransactionStatus>,
    pub description: Option<String>,
}

impl CreateTransactionCmd {
    #[must_use]
    pub fn new(
        from_account: impl Into<String>,
        to_account: impl Into<String>,
        amount: Money,
    ) -> Self {
        Self {
            from_account: from_account.into(),
            to_account: to_account.into(),
            amount,
            currency: None,
            status: None,
            description: None,
        }
    }

    #[must_use]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    #[must_use]
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
