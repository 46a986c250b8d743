use std::fmt;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::domain::{
    BindError, ConnectionError, GenericError, QueryError, RawError, RawStatus, ValidationError,
};

pub const REDACTED_NAME: &str = "InternalServerError";
pub const REDACTED_MESSAGE: &str = "Internal server error";

/// Error travelling down the request interceptor chain.
///
/// Wraps the original error untouched and carries the fields interceptors
/// may override. Augmenting consumes the value and returns a new one, so a
/// stage never observes another stage's edits through shared state.
#[derive(Debug, Clone)]
pub struct RequestError {
    raw: Arc<RawError>,
    name: Option<String>,
    message: Option<String>,
    stack: Option<String>,
    status: Option<RawStatus>,
}

impl RequestError {
    pub fn new(err: impl Into<RawError>) -> Self {
        let raw = err.into();
        Self {
            name: raw.name().map(str::to_string),
            message: raw.message().map(str::to_string),
            stack: raw.stack().map(str::to_string),
            status: raw.status().cloned(),
            raw: Arc::new(raw),
        }
    }

    /// The error as originally raised
    pub fn raw(&self) -> &RawError {
        &self.raw
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    pub fn status(&self) -> Option<&RawStatus> {
        self.status.as_ref()
    }

    pub fn with_status(self, status: impl Into<RawStatus>) -> Self {
        Self {
            status: Some(status.into()),
            ..self
        }
    }

    pub fn with_message(self, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..self
        }
    }

    /// Parsed status, 500 when absent or unusable
    pub fn status_code(&self) -> StatusCode {
        self.status
            .as_ref()
            .and_then(RawStatus::to_status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Whether both values wrap the very same original error
    pub fn same_origin(&self, other: &RequestError) -> bool {
        Arc::ptr_eq(&self.raw, &other.raw)
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self.message()) {
            (Some(name), Some(message)) => write!(f, "{}: {}", name, message),
            (None, Some(message)) => f.write_str(message),
            _ => write!(f, "{}", self.raw),
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.raw.as_ref())
    }
}

macro_rules! request_error_from {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for RequestError {
                fn from(err: $ty) -> Self {
                    Self::new(err)
                }
            }
        )+
    };
}

request_error_from!(
    RawError,
    BindError,
    ConnectionError,
    QueryError,
    ValidationError,
    GenericError,
);

impl From<validator::ValidationErrors> for RequestError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::new(ValidationError::from(errors))
    }
}

/// Handlers return `RequestError` directly.
///
/// The response carries the error in its extensions for
/// `ErrorPipelineLayer` to normalize; without the layer installed the client
/// only sees the status and its canonical reason.
impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let reason = status.canonical_reason().unwrap_or("Error");
        let mut response = (status, reason).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Fixed-shape error produced by the terminal handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedError {
    pub name: Option<String>,
    pub message: Option<String>,
    pub stack: Option<String>,
    pub status: StatusCode,
}

impl NormalizedError {
    pub fn from_request_error(err: &RequestError) -> Self {
        Self {
            name: err.name.clone(),
            message: err.message.clone(),
            stack: err.stack.clone(),
            status: err.status_code(),
        }
    }

    /// Replace name and message with the generic 5xx pair
    pub fn redact(&mut self) {
        self.name = Some(REDACTED_NAME.to_string());
        self.message = Some(REDACTED_MESSAGE.to_string());
    }

    pub fn text_body(&self) -> String {
        format!(
            "Error {} - {}: {}",
            self.status.as_u16(),
            self.name.as_deref().unwrap_or_default(),
            self.message.as_deref().unwrap_or_default()
        )
    }

    /// Client-facing view; never includes the stack
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            status: self.status.as_u16(),
            name: self.name.clone(),
            message: self.message.clone(),
        }
    }
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.name.as_deref().unwrap_or("Error"),
            self.message.as_deref().unwrap_or_default()
        )
    }
}

/// JSON error body sent to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub name: Option<String>,
    pub message: Option<String>,
}
