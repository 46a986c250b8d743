//! # error_pipeline - Error normalization for axum services
//!
//! Turns heterogeneous failures into uniform, client-safe HTTP errors and
//! logs a human-readable diagnostic line for each.
//!
//! ## Layers
//!
//! - **Domain**: error shapes (bind, connection, query, validation, generic)
//! - **Application**: the logger port
//! - **Infrastructure**: logger adapters (`tracing`, in-memory)
//! - **API**: request error type, the normalization facade and its middleware
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use error_pipeline::api::{create_router, router::AppState};
//! use error_pipeline::{ErrorFacade, ErrorHandlingConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let facade = Arc::new(ErrorFacade::with_tracing(ErrorHandlingConfig::production()));
//! let app = create_router(AppState::default(), facade);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export key types explicitly to avoid ambiguity
pub use api::errors::{ErrorBody, NormalizedError, RequestError};
pub use api::middleware::error_handling::{
    ErrorFacade, ErrorHandlingConfig, ErrorPipelineLayer, NegotiatedResponse, RequestContext,
    ResponseContext,
};
pub use application::ports::ErrorLogger;
pub use config::{Config, Environment};
pub use domain::{
    BindError, BindErrorCode, ConnectionError, ConnectionErrorCategory, GenericError, QueryError,
    RawError, RawStatus, ValidationDetail, ValidationError,
};
pub use infrastructure::{MemoryLogger, TracingLogger};
