//! Transaction lifecycle endpoints: create, batch create, read, status
//! update, delete, and the paginated listing.

use api_types::transaction::{
    BatchCreateResponse, TransactionCreated, TransactionListResponse, TransactionNew,
    TransactionView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{ServerError, server::ServerState, validate};
use engine::{CreateTransactionCmd, PageRequest, SortDirection, SortField, TransactionListFilter};

fn map_currency(currency: engine::Currency) -> api_types::Currency {
    match currency {
        engine::Currency::Zar => api_types::Currency::Zar,
    }
}

pub(crate) fn map_status(status: engine::TransactionStatus) -> api_types::TransactionStatus {
    match status {
        engine::TransactionStatus::Pending => api_types::TransactionStatus::Pending,
        engine::TransactionStatus::Completed => api_types::TransactionStatus::Completed,
        engine::TransactionStatus::Refunded => api_types::TransactionStatus::Refunded,
        engine::TransactionStatus::Disputed => api_types::TransactionStatus::Disputed,
        engine::TransactionStatus::Failed => api_types::TransactionStatus::Failed,
    }
}

fn engine_status(status: api_types::TransactionStatus) -> engine::TransactionStatus {
    match status {
        api_types::TransactionStatus::Pending => engine::TransactionStatus::Pending,
        api_types::TransactionStatus::Completed => engine::TransactionStatus::Completed,
        api_types::TransactionStatus::Refunded => engine::TransactionStatus::Refunded,
        api_types::TransactionStatus::Disputed => engine::TransactionStatus::Disputed,
        api_types::TransactionStatus::Failed => engine::TransactionStatus::Failed,
    }
}

pub(crate) fn view(record: engine::Transaction) -> TransactionView {
    TransactionView {
        transaction_id: record.id,
        from_account: record.from_account,
        to_account: record.to_account,
        amount: record.amount.to_string(),
        currency: map_currency(record.currency),
        status: map_status(record.status),
        timestamp: record.occurred_at,
        description: record.description,
    }
}

fn command(payload: TransactionNew, amount: engine::Money) -> CreateTransactionCmd {
    let mut cmd = CreateTransactionCmd::new(payload.from_account, payload.to_account, amount);
    if let Some(currency) = payload.currency {
        cmd = cmd.currency(match currency {
            api_types::Currency::Zar => engine::Currency::Zar,
        });
    }
    if let Some(status) = payload.status {
        cmd = cmd.status(engine_status(status));
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    cmd
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let amount = validate::candidate(&payload).map_err(ServerError::Validation)?;
    let record = state.engine.create(command(payload, amount)).await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionCreated {
            transaction: view(record),
            message: "Transaction created successfully".to_string(),
        }),
    ))
}

/// Creates many records in one request. Items are independent: structurally
/// invalid ones are reported and skipped, the rest go through the engine,
/// which collects its own per-item failures. Every error message carries the
/// candidate's position in the request body, and the list follows input order.
pub async fn create_batch(
    State(state): State<ServerState>,
    Json(payloads): Json<Vec<TransactionNew>>,
) -> Result<(StatusCode, Json<BatchCreateResponse>), ServerError> {
    let mut failures: Vec<(usize, String)> = Vec::new();
    let mut kept_indices = Vec::with_capacity(payloads.len());
    let mut cmds = Vec::with_capacity(payloads.len());

    for (index, payload) in payloads.into_iter().enumerate() {
        match validate::candidate(&payload) {
            Ok(amount) => {
                kept_indices.push(index);
                cmds.push(command(payload, amount));
            }
            Err(messages) => failures.push((index, messages.join("; "))),
        }
    }

    let outcome = state.engine.create_batch(cmds).await?;

    for err in outcome.errors {
        failures.push((kept_indices[err.index], err.message));
    }
    failures.sort_by_key(|(index, _)| *index);

    let errors: Vec<String> = failures
        .into_iter()
        .map(|(index, message)| format!("item {index}: {message}"))
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(BatchCreateResponse {
            success_count: outcome.success_count,
            failure_count: errors.len(),
            created_ids: outcome.created_ids,
            errors,
        }),
    ))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub account: Option<String>,
    pub status: Option<api_types::TransactionStatus>,
    pub page: Option<i64>,
    pub size: Option<i64>,
    /// `field` or `field,direction`, e.g. `amount,desc`.
    pub sort: Option<String>,
}

fn page_request(params: &ListParams) -> PageRequest {
    // Negative page/size are clamped, not rejected.
    let mut page = PageRequest {
        page: params.page.unwrap_or(0).max(0) as u64,
        size: params.size.unwrap_or(20).max(1) as u64,
        ..PageRequest::default()
    };
    if let Some(sort) = &params.sort {
        let mut parts = sort.splitn(2, ',');
        page.sort = SortField::parse(parts.next().unwrap_or_default());
        page.direction = SortDirection::parse(parts.next().unwrap_or_default());
    }
    page
}

pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let filter = TransactionListFilter {
        account: params.account.clone(),
        status: params.status.map(engine_status),
    };
    let page = state.engine.list(&filter, &page_request(&params)).await?;

    let transactions: Vec<TransactionView> = page.items.into_iter().map(view).collect();
    Ok(Json(TransactionListResponse {
        count: transactions.len(),
        transactions,
        page: page.page,
        size: page.size,
        total_elements: page.total_elements,
        total_pages: page.total_pages,
        first: page.first,
        last: page.last,
    }))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<TransactionView>, ServerError> {
    let record = state.engine.transaction(&id).await?;
    Ok(Json(view(record)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusParams {
    pub status: Option<String>,
}

pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(params): Query<UpdateStatusParams>,
) -> Result<Json<TransactionView>, ServerError> {
    // Parse here rather than in the extractor so a bad value gets the usual
    // JSON error body instead of a plain-text rejection.
    let status = params
        .status
        .ok_or_else(|| ServerError::Generic("status query parameter is required".to_string()))?;
    let status = engine::TransactionStatus::try_from(status.as_str())
        .map_err(|_| ServerError::Generic(format!("Invalid status value: {status}")))?;

    let record = state.engine.update_status(&id, status).await?;
    Ok(Json(view(record)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_param_splits_field_and_direction() {
        let params = ListParams {
            sort: Some("amount,desc".to_string()),
            ..ListParams::default()
        };
        let page = page_request(&params);
        assert_eq!(page.sort, SortField::Amount);
        assert_eq!(page.direction, SortDirection::Descending);
    }

    #[test]
    fn sort_param_without_direction_defaults_ascending() {
        let params = ListParams {
            sort: Some("fromAccount".to_string()),
            ..ListParams::default()
        };
        let page = page_request(&params);
        assert_eq!(page.sort, SortField::FromAccount);
        assert_eq!(page.direction, SortDirection::Ascending);
    }
}
