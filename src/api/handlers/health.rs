use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::json;
use std::time::Duration;

use crate::api::router::AppState;

/// GET /health
/// Basic health check endpoint (no database check)
pub async fn health_handler() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "error_pipeline",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

/// GET /health/ready
/// Readiness probe; reports whether a database pool is attached and answering
pub async fn readiness_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<serde_json::Value>) {
    let Some(pool) = state.pool.as_ref() else {
        return (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "service": "error_pipeline",
                "database": "not configured",
            })),
        );
    };

    let db_check = tokio::time::timeout(
        Duration::from_secs(2),
        sqlx::query("SELECT 1").execute(pool),
    )
    .await;

    match db_check {
        Ok(Ok(_)) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "service": "error_pipeline",
                "database": "connected",
            })),
        ),
        _ => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not ready",
                "service": "error_pipeline",
                "database": "unavailable",
            })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_handler() {
        let (status, body) = health_handler().await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.0["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_without_database() {
        let (status, body) = readiness_handler(State(AppState::default())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.0["database"], "not configured");
    }
}
