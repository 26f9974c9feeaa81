use axum::{
    Router,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{statistics, transactions};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/api/transactions",
            post(transactions::create).get(transactions::list),
        )
        .route("/api/transactions/batch", post(transactions::create_batch))
        .route("/api/transactions/stats", get(statistics::get_stats))
        .route("/api/transactions/search", get(statistics::search))
        .route("/api/transactions/large", get(statistics::large))
        .route(
            "/api/transactions/{id}",
            get(transactions::get_by_id)
                .put(transactions::update_status)
                .delete(transactions::delete),
        )
        .with_state(state)
}

/// Builds the application router around an engine.
pub fn app(engine: Engine) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
    })
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine)).await
}
