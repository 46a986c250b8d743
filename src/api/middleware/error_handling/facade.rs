//! Error normalization facade
//!
//! Two leaf handlers (listener bind failures, database connection failures)
//! only log. Three request interceptors form a chain: the database and
//! validation parsers classify and augment or pass through, and the
//! terminal handler writes the response.

use std::convert::identity;
use std::fmt::Display;

use axum::http::StatusCode;
use serde_json::Value;

use super::config::ErrorHandlingConfig;
use super::negotiation::ResponseContext;
use super::request_context::RequestContext;
use crate::api::errors::{NormalizedError, RequestError};
use crate::application::ports::ErrorLogger;
use crate::domain::{BindError, BindErrorCode, ConnectionError, RawError};
use crate::infrastructure::TracingLogger;

/// What `log_error` needs from an error
trait Diagnostic: Display {
    fn diagnostic_message(&self) -> Option<&str>;
    fn diagnostic_stack(&self) -> Option<&str>;
}

impl Diagnostic for BindError {
    fn diagnostic_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn diagnostic_stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }
}

impl Diagnostic for ConnectionError {
    fn diagnostic_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn diagnostic_stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }
}

impl Diagnostic for NormalizedError {
    fn diagnostic_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn diagnostic_stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }
}

/// The error's own message, or its rendering when it has none
fn own_message(err: &impl Diagnostic) -> String {
    match err.diagnostic_message() {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => err.to_string(),
    }
}

/// Error handling and logging helpers for one process
#[derive(Debug, Clone)]
pub struct ErrorFacade<L: ErrorLogger> {
    logger: L,
    config: ErrorHandlingConfig,
}

impl ErrorFacade<TracingLogger> {
    /// Facade logging through `tracing`
    pub fn with_tracing(config: ErrorHandlingConfig) -> Self {
        Self::new(TracingLogger, config)
    }
}

impl<L: ErrorLogger> ErrorFacade<L> {
    /// Build the facade around a logger.
    ///
    /// The logger must implement [`ErrorLogger`]; anything else is rejected
    /// at compile time:
    ///
    /// ```compile_fail
    /// use error_pipeline::{ErrorFacade, ErrorHandlingConfig};
    ///
    /// struct Console;
    ///
    /// let facade = ErrorFacade::new(Console, ErrorHandlingConfig::default());
    /// ```
    pub fn new(logger: L, config: ErrorHandlingConfig) -> Self {
        Self { logger, config }
    }

    fn log_error(&self, err: &impl Diagnostic, message: &str) {
        let mut line = if message.is_empty() {
            own_message(err)
        } else {
            message.to_string()
        };

        if self.config.include_stack_traces {
            if let Some(stack) = err.diagnostic_stack() {
                line.push_str("\n\n");
                line.push_str(stack);
                line.push('\n');
            }
        }

        self.logger.error(&line);
    }

    /// Log a listener bind failure
    pub fn handle_server_error(&self, err: &BindError) {
        let message = match &err.code {
            BindErrorCode::AddrInUse => format!(
                "Error: port {} of {} already in use",
                err.port, err.address
            ),
            BindErrorCode::Access => {
                format!("Error: port {} requires elevated privileges", err.port)
            }
            BindErrorCode::Other(_) => own_message(err),
        };

        self.log_error(err, &message);
    }

    /// Log a failure to connect to the database
    pub fn handle_database_connection_error(&self, err: &ConnectionError) {
        let suffix = match err.category.description() {
            Some(description) => description.to_string(),
            None => own_message(err),
        };
        let message = format!(
            "{} - Failed to connect to database: {}",
            err.name, suffix
        );

        self.log_error(err, &message);
    }

    /// Interceptor for database errors raised while executing a query.
    ///
    /// Query errors are forwarded as 500s whose message carries the SQL;
    /// everything else is forwarded unchanged.
    pub fn database_error_parser<Res, F, R>(
        &self,
        err: RequestError,
        _req: &RequestContext,
        _res: &mut Res,
        proceed: F,
    ) -> R
    where
        Res: ResponseContext,
        F: FnOnce(RequestError) -> R,
    {
        if let RawError::Query(query) = err.raw() {
            let message = format!(
                "{}. Query: {}",
                err.message().unwrap_or_default(),
                query.sql
            );
            return proceed(
                err.with_status(StatusCode::INTERNAL_SERVER_ERROR)
                    .with_message(message),
            );
        }

        proceed(err)
    }

    /// Interceptor for request validation errors.
    ///
    /// Validation errors are forwarded as 400s whose message is the first
    /// violated rule; everything else is forwarded unchanged.
    pub fn validation_error_parser<Res, F, R>(
        &self,
        err: RequestError,
        _req: &RequestContext,
        _res: &mut Res,
        proceed: F,
    ) -> R
    where
        Res: ResponseContext,
        F: FnOnce(RequestError) -> R,
    {
        if let RawError::Validation(validation) = err.raw() {
            let first = validation
                .details
                .first()
                .map(|detail| detail.message.clone());
            let err = err.with_status(StatusCode::BAD_REQUEST);

            return proceed(match first {
                Some(message) => err.with_message(message),
                None => err,
            });
        }

        proceed(err)
    }

    /// Terminal handler: log, redact when configured, write the response.
    ///
    /// `_proceed` is part of the interceptor shape but is never called.
    pub fn http_error_handler<Res, F>(
        &self,
        err: RequestError,
        req: &RequestContext,
        res: &mut Res,
        _proceed: F,
    ) where
        Res: ResponseContext,
        F: FnOnce(RequestError),
    {
        let mut error = NormalizedError::from_request_error(&err);

        self.log_error(
            &error,
            &format!(
                " {} - [{} {} - {}] - {}: {}",
                error.status.as_u16(),
                req.method,
                req.original_url,
                req.display_ip(),
                error.name.as_deref().unwrap_or_default(),
                error.message.as_deref().unwrap_or_default()
            ),
        );

        if error.status.is_server_error() && self.config.redact_server_errors {
            error.redact();
        }

        res.status(error.status);
        res.format(
            || error.text_body(),
            || serde_json::to_value(error.body()).unwrap_or(Value::Null),
        );
    }

    /// Run a handler error through every interceptor and the terminal handler
    pub fn handle_request_error<Res>(&self, err: RequestError, req: &RequestContext, res: &mut Res)
    where
        Res: ResponseContext,
    {
        let err = self.database_error_parser(err, req, res, identity);
        let err = self.validation_error_parser(err, req, res, identity);
        self.http_error_handler(err, req, res, |_| {});
    }
}
