use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;

use crate::api::handlers::{
    boom_handler, broken_query_handler, create_user_handler, get_item_handler, health_handler,
    readiness_handler, status_handler,
};
use crate::api::middleware::error_handling::{create_error_pipeline_layer, ErrorFacade};
use crate::application::ports::ErrorLogger;

/// Application state container
#[derive(Clone, Default)]
pub struct AppState {
    pub pool: Option<PgPool>,
}

impl AppState {
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool: Some(pool) }
    }
}

/// Create router with all routes and the error pipeline
pub fn create_router<L>(state: AppState, facade: Arc<ErrorFacade<L>>) -> Router
where
    L: ErrorLogger + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route("/health/ready", get(readiness_handler))
        .route("/items/{id}", get(get_item_handler))
        .route("/users", post(create_user_handler))
        .route("/query", get(broken_query_handler))
        .route("/status/{code}", get(status_handler))
        .route("/boom", get(boom_handler))
        .with_state(state)
        .layer(create_error_pipeline_layer(facade))
}
