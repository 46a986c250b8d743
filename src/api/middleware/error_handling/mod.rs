//! Error handling middleware for normalizing error responses
//!
//! This module turns heterogeneous failures into uniform, client-safe HTTP
//! errors and logs a diagnostic line for each.
//!
//! The module is split into focused components:
//! - config.rs: Configuration structures
//! - facade.rs: The normalization facade and its five operations
//! - middleware.rs: HTTP middleware running the request interceptor chain
//! - negotiation.rs: Content negotiation and the response context
//! - request_context.rs: Request fields captured for logging

pub mod config;
pub mod facade;
pub mod middleware;
pub mod negotiation;
pub mod request_context;

// Re-export main types for convenience
pub use config::ErrorHandlingConfig;
pub use facade::ErrorFacade;
pub use middleware::{create_error_pipeline_layer, ErrorPipelineLayer, ErrorPipelineService};
pub use negotiation::{negotiate, NegotiatedResponse, ResponseContext, ResponseFormat};
pub use request_context::RequestContext;
