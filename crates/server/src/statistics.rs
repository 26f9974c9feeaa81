//! Read-only reporting endpoints: aggregate statistics, description search,
//! and the large-transaction report.

use std::collections::HashMap;

use api_types::{
    stats::StatisticsResponse,
    transaction::{SearchResponse, TransactionView},
};
use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    ServerError,
    server::ServerState,
    transactions::{map_status, view},
};
use engine::Money;

/// Default threshold for the large-transaction report: R 1,000.00.
const DEFAULT_LARGE_THRESHOLD: Money = Money::new(100_000);

pub async fn get_stats(
    State(state): State<ServerState>,
) -> Result<Json<StatisticsResponse>, ServerError> {
    let stats = state.engine.statistics().await?;

    let status_breakdown: HashMap<api_types::TransactionStatus, u64> = stats
        .status_breakdown
        .into_iter()
        .map(|(status, count)| (map_status(status), count))
        .collect();

    Ok(Json(StatisticsResponse {
        total_transactions: stats.total_transactions,
        total_amount: stats.total_amount.to_string(),
        average_amount: stats.average_amount.to_string(),
        currency: match stats.currency {
            engine::Currency::Zar => api_types::Currency::Zar,
        },
        status_breakdown,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

pub async fn search(
    State(state): State<ServerState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ServerError> {
    let query = params.q.unwrap_or_default();
    let records = state.engine.search(&query).await?;

    let transactions: Vec<TransactionView> = records.into_iter().map(view).collect();
    Ok(Json(SearchResponse {
        query: query.trim().to_string(),
        result_count: transactions.len(),
        transactions,
    }))
}

#[derive(Debug, Deserialize)]
pub struct LargeParams {
    /// Decimal string, e.g. "1000.00".
    pub threshold: Option<String>,
}

pub async fn large(
    State(state): State<ServerState>,
    Query(params): Query<LargeParams>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let threshold = match params.threshold {
        Some(raw) => raw
            .parse::<Money>()
            .map_err(|err| ServerError::Generic(err.to_string()))?,
        None => DEFAULT_LARGE_THRESHOLD,
    };

    let records = state.engine.large_transactions(threshold).await?;
    Ok(Json(records.into_iter().map(view).collect()))
}
