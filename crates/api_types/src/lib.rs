//! Request/response types shared between the server and its clients.
//!
//! Amounts travel as decimal strings (`"500.00"`); the server converts them
//! to and from integer cents at the boundary so no floating point touches
//! money.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Zar,
}

/// Closed status set; anything else is rejected with a validation error.
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
}

pub mod transaction {
    use super::*;

    /// Candidate record for `POST /api/transactions` (single and batch).
    ///
    /// Identifier, timestamp and unset defaults are assigned by the service.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionNew {
        pub from_account: String,
        pub to_account: String,
        /// Decimal string, e.g. "500.00".
        pub amount: String,
        pub currency: Option<Currency>,
        pub status: Option<TransactionStatus>,
        pub description: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        pub transaction_id: String,
        pub from_account: String,
        pub to_account: String,
        /// Decimal string, e.g. "500.00".
        pub amount: String,
        pub currency: Currency,
        pub status: TransactionStatus,
        pub timestamp: DateTime<Utc>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        #[serde(flatten)]
        pub transaction: TransactionView,
        pub message: String,
    }

    /// Page of transactions plus the metadata the pagination contract
    /// requires (`count` is the size of the returned slice).
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionListResponse {
        pub count: usize,
        pub transactions: Vec<TransactionView>,
        pub page: u64,
        pub size: u64,
        pub total_elements: u64,
        pub total_pages: u64,
        pub first: bool,
        pub last: bool,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BatchCreateResponse {
        pub success_count: usize,
        pub failure_count: usize,
        pub created_ids: Vec<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub errors: Vec<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SearchResponse {
        pub query: String,
        pub result_count: usize,
        pub transactions: Vec<TransactionView>,
    }
}

pub mod stats {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StatisticsResponse {
        pub total_transactions: u64,
        /// Decimal string, exact sum.
        pub total_amount: String,
        /// Decimal string, rounded half-up to 2 places.
        pub average_amount: String,
        pub currency: Currency,
        pub status_breakdown: HashMap<TransactionStatus, u64>,
    }
}
