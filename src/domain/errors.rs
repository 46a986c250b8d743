use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt::Display;
use std::io;
use std::net::SocketAddr;

use axum::http::StatusCode;
use thiserror::Error;

use super::error_types::{BindErrorCode, ConnectionErrorCategory};
use super::status::RawStatus;

/// Every error shape the pipeline can normalize
#[derive(Debug, Clone, Error)]
pub enum RawError {
    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Generic(#[from] GenericError),
}

impl RawError {
    pub fn name(&self) -> Option<&str> {
        match self {
            RawError::Bind(_) => Some(BindError::NAME),
            RawError::Connection(err) => Some(err.name.as_str()),
            RawError::Query(_) => Some(QueryError::NAME),
            RawError::Validation(_) => Some(ValidationError::NAME),
            RawError::Generic(err) => err.name.as_deref(),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            RawError::Bind(err) => err.message.as_deref(),
            RawError::Connection(err) => err.message.as_deref(),
            RawError::Query(err) => Some(err.message.as_str()),
            RawError::Validation(err) => err.message.as_deref(),
            RawError::Generic(err) => err.message.as_deref(),
        }
    }

    pub fn stack(&self) -> Option<&str> {
        match self {
            RawError::Bind(err) => err.stack.as_deref(),
            RawError::Connection(err) => err.stack.as_deref(),
            RawError::Query(err) => err.stack.as_deref(),
            RawError::Validation(err) => err.stack.as_deref(),
            RawError::Generic(err) => err.stack.as_deref(),
        }
    }

    /// Status attached by the raiser; only generic errors carry one
    pub fn status(&self) -> Option<&RawStatus> {
        match self {
            RawError::Generic(err) => err.status.as_ref(),
            _ => None,
        }
    }
}

/// Listener bind failure
#[derive(Debug, Clone, Error)]
#[error("listen {code}: {address}:{port}")]
pub struct BindError {
    pub code: BindErrorCode,
    pub port: u16,
    pub address: String,
    pub message: Option<String>,
    pub stack: Option<String>,
}

impl BindError {
    pub const NAME: &'static str = "BindError";

    pub fn new(code: BindErrorCode, port: u16, address: impl Into<String>) -> Self {
        Self {
            code,
            port,
            address: address.into(),
            message: None,
            stack: capture_stack(),
        }
    }

    /// Build from the I/O error returned when binding `addr`
    pub fn from_io(err: &io::Error, addr: SocketAddr) -> Self {
        Self {
            message: Some(err.to_string()),
            ..Self::new(
                BindErrorCode::from_io_kind(err.kind()),
                addr.port(),
                addr.ip().to_string(),
            )
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// Failure to establish a database connection.
///
/// `name` is what gets reported; it defaults to the category name but keeps
/// whatever spelling the raiser supplied through [`ConnectionError::named`].
#[derive(Debug, Clone, Error)]
#[error("{}", headline(.name, .message))]
pub struct ConnectionError {
    pub name: String,
    pub category: ConnectionErrorCategory,
    pub message: Option<String>,
    pub stack: Option<String>,
}

impl ConnectionError {
    pub fn new(category: ConnectionErrorCategory) -> Self {
        Self {
            name: category.name().to_string(),
            category,
            message: None,
            stack: capture_stack(),
        }
    }

    /// Classify by error name, keeping the name verbatim
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let category = ConnectionErrorCategory::from_name(&name);
        Self {
            name,
            ..Self::new(category)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

impl From<&sqlx::Error> for ConnectionError {
    fn from(err: &sqlx::Error) -> Self {
        Self::new(classify_connection_failure(err)).with_message(err.to_string())
    }
}

fn classify_connection_failure(err: &sqlx::Error) -> ConnectionErrorCategory {
    match err {
        sqlx::Error::Configuration(_) => ConnectionErrorCategory::InvalidConnection,
        sqlx::Error::PoolTimedOut => ConnectionErrorCategory::ConnectionAcquireTimeout,
        sqlx::Error::Io(io_err) => match io_err.kind() {
            io::ErrorKind::ConnectionRefused => ConnectionErrorCategory::ConnectionRefused,
            io::ErrorKind::TimedOut => ConnectionErrorCategory::ConnectionTimedOut,
            io::ErrorKind::PermissionDenied => ConnectionErrorCategory::AccessDenied,
            io::ErrorKind::HostUnreachable | io::ErrorKind::NetworkUnreachable => {
                ConnectionErrorCategory::HostNotReachable
            }
            io::ErrorKind::NotFound => ConnectionErrorCategory::HostNotFound,
            // Resolver failures surface as untyped I/O errors
            _ if io_err.to_string().contains("failed to lookup address") => {
                ConnectionErrorCategory::HostNotFound
            }
            _ => ConnectionErrorCategory::Other(GENERIC_CONNECTION_ERROR.to_string()),
        },
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            // invalid_authorization_specification, invalid_password, insufficient_privilege
            Some("28000") | Some("28P01") | Some("42501") => ConnectionErrorCategory::AccessDenied,
            // invalid_catalog_name
            Some("3D000") => ConnectionErrorCategory::InvalidConnection,
            _ => ConnectionErrorCategory::Other(GENERIC_CONNECTION_ERROR.to_string()),
        },
        _ => ConnectionErrorCategory::Other(GENERIC_CONNECTION_ERROR.to_string()),
    }
}

const GENERIC_CONNECTION_ERROR: &str = "ConnectionError";

/// Database error raised while executing a statement
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct QueryError {
    pub message: String,
    pub sql: String,
    pub stack: Option<String>,
}

impl QueryError {
    pub const NAME: &'static str = "DatabaseError";

    pub fn new(message: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sql: sql.into(),
            stack: capture_stack(),
        }
    }

    /// Build from a sqlx failure raised while running `sql`
    pub fn from_sqlx(err: &sqlx::Error, sql: impl Into<String>) -> Self {
        let message = match err {
            sqlx::Error::Database(db_err) => db_err.message().to_string(),
            other => other.to_string(),
        };
        Self::new(message, sql)
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// One violated rule inside a validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetail {
    pub message: String,
    pub field: Option<String>,
}

impl ValidationDetail {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    pub fn for_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

/// Request payload failed validation
#[derive(Debug, Clone, Error)]
#[error("{}", .message.as_deref().unwrap_or("Validation failed"))]
pub struct ValidationError {
    pub details: Vec<ValidationDetail>,
    pub message: Option<String>,
    pub stack: Option<String>,
}

impl ValidationError {
    pub const NAME: &'static str = "ValidationError";

    /// The summary message joins every detail message
    pub fn new(details: Vec<ValidationDetail>) -> Self {
        let message = if details.is_empty() {
            None
        } else {
            Some(
                details
                    .iter()
                    .map(|detail| detail.message.as_str())
                    .collect::<Vec<_>>()
                    .join(". "),
            )
        };

        Self {
            details,
            message,
            stack: capture_stack(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details = Vec::new();
        collect_validation_details(&errors, None, &mut details);
        Self::new(details)
    }
}

/// Flatten validator output into details, depth first.
///
/// Nested structs are addressed as `parent.child`, list items as
/// `items[0].child`.
fn collect_validation_details(
    errors: &validator::ValidationErrors,
    prefix: Option<&str>,
    details: &mut Vec<ValidationDetail>,
) {
    use validator::ValidationErrorsKind;

    let mut entries: Vec<_> = errors.errors().iter().collect();
    // Field order in the map is unspecified; keep the first detail stable
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    for (field, kind) in entries {
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, field),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = match &error.message {
                        Some(message) => message.to_string(),
                        None => format!("\"{}\" failed {} validation", path, error.code),
                    };
                    details.push(ValidationDetail::for_field(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                collect_validation_details(nested, Some(&path), details);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    let item_path = format!("{}[{}]", path, index);
                    collect_validation_details(nested, Some(&item_path), details);
                }
            }
        }
    }
}

/// Any other application error
#[derive(Debug, Clone, Default, Error)]
#[error("{}", generic_headline(.name, .message))]
pub struct GenericError {
    pub name: Option<String>,
    pub message: Option<String>,
    pub status: Option<RawStatus>,
    pub stack: Option<String>,
}

impl GenericError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            stack: capture_stack(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<RawStatus>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message)
            .with_name("NotFoundError")
            .with_status(StatusCode::NOT_FOUND)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(message)
            .with_name("InternalServerError")
            .with_status(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

fn headline(name: &impl Display, message: &Option<String>) -> String {
    match message.as_deref() {
        Some(message) if !message.is_empty() => format!("{}: {}", name, message),
        _ => name.to_string(),
    }
}

fn generic_headline(name: &Option<String>, message: &Option<String>) -> String {
    headline(&name.as_deref().unwrap_or("Error"), message)
}

/// Capture a backtrace when enabled through `RUST_BACKTRACE`
pub(crate) fn capture_stack() -> Option<String> {
    let backtrace = Backtrace::capture();
    match backtrace.status() {
        BacktraceStatus::Captured => Some(backtrace.to_string()),
        _ => None,
    }
}
