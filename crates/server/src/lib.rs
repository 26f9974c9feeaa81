use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{app, run_with_listener};

mod server;
mod statistics;
mod transactions;
mod validate;

pub mod types {
    pub mod transaction {
        pub use api_types::transaction::{
            BatchCreateResponse, SearchResponse, TransactionCreated, TransactionListResponse,
            TransactionNew, TransactionView,
        };
    }

    pub mod stats {
        pub use api_types::stats::StatisticsResponse;
    }
}

pub enum ServerError {
    Engine(EngineError),
    /// Structural validation failed; one message per offending field.
    Validation(Vec<String>),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    messages: Option<Vec<String>>,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidOperation(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "An unexpected error occurred. Please try again later.".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error, messages) = match self {
            ServerError::Engine(err) => (
                status_for_engine_error(&err),
                message_for_engine_error(err),
                None,
            ),
            ServerError::Validation(messages) => (
                StatusCode::BAD_REQUEST,
                "Validation Failed".to_string(),
                Some(messages),
            ),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err, None),
        };

        (status, Json(Error { error, messages })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_invalid_operation_maps_to_400() {
        let res = ServerError::from(EngineError::InvalidOperation("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_database_maps_to_500() {
        let res = ServerError::from(EngineError::Database(sea_orm_db_err())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_maps_to_400() {
        let res = ServerError::Validation(vec!["Amount must be positive".to_string()])
            .into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    fn sea_orm_db_err() -> sea_orm::DbErr {
        sea_orm::DbErr::Custom("boom".to_string())
    }
}
