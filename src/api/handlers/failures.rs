//! Demo routes, one per error category the pipeline normalizes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::api::errors::RequestError;
use crate::api::router::AppState;
use crate::domain::{GenericError, QueryError};

const BROKEN_QUERY: &str = "SELECT * FROM missing_table";

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "\"name\" is required"))]
    pub name: String,
    #[validate(email(message = "\"email\" must be a valid email"))]
    pub email: String,
    #[validate(range(min = 18, max = 150, message = "\"age\" must be between 18 and 150"))]
    pub age: u32,
}

/// GET /items/{id}
/// Only item `1` exists
pub async fn get_item_handler(Path(id): Path<String>) -> Result<Json<Value>, RequestError> {
    if id != "1" {
        return Err(GenericError::not_found(format!("Item {} not found", id)).into());
    }

    Ok(Json(json!({ "id": id, "name": "first item" })))
}

/// POST /users
/// Validates the payload; malformed JSON is a 400 as well
pub async fn create_user_handler(
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), RequestError> {
    let Json(payload) = payload.map_err(|rejection| {
        GenericError::new(rejection.body_text())
            .with_name("BadRequestError")
            .with_status(rejection.status())
    })?;

    payload.validate()?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "name": payload.name, "email": payload.email, "age": payload.age })),
    ))
}

/// GET /query
/// Runs a statement against a table that does not exist
pub async fn broken_query_handler(
    State(state): State<AppState>,
) -> Result<Json<Value>, RequestError> {
    // Without a database, raise what Postgres would have reported
    let Some(pool) = state.pool.as_ref() else {
        let message = "relation \"missing_table\" does not exist";
        return Err(QueryError::new(message, BROKEN_QUERY).into());
    };

    match sqlx::query(BROKEN_QUERY).execute(pool).await {
        Ok(result) => Ok(Json(json!({ "rows": result.rows_affected() }))),
        Err(err) => Err(QueryError::from_sqlx(&err, BROKEN_QUERY).into()),
    }
}

/// GET /status/{code}
/// Raises an error whose status is the raw path segment
pub async fn status_handler(Path(code): Path<String>) -> RequestError {
    GenericError::new(format!("Requested status {}", code))
        .with_name("RequestedError")
        .with_status(code)
        .into()
}

/// GET /boom
pub async fn boom_handler() -> RequestError {
    GenericError::internal_error("database password rejected by upstream").into()
}
