//! Classification enums for the error categories the pipeline knows about.
//!
//! Listener bind failures are keyed by their errno-style code, database
//! connection failures by a category name. Both keep an `Other` variant so
//! unrecognized inputs still round-trip through the handlers.

use std::fmt;
use std::io;

/// Errno-style code carried by a listener bind failure
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindErrorCode {
    /// `EADDRINUSE`
    AddrInUse,
    /// `EACCES`
    Access,
    /// Any other code, kept verbatim
    Other(String),
}

impl BindErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            BindErrorCode::AddrInUse => "EADDRINUSE",
            BindErrorCode::Access => "EACCES",
            BindErrorCode::Other(code) => code,
        }
    }

    /// Parse an errno-style code string
    pub fn from_code(code: &str) -> Self {
        match code {
            "EADDRINUSE" => BindErrorCode::AddrInUse,
            "EACCES" => BindErrorCode::Access,
            other => BindErrorCode::Other(other.to_string()),
        }
    }

    /// Map an I/O error kind onto the matching code
    pub fn from_io_kind(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::AddrInUse => BindErrorCode::AddrInUse,
            io::ErrorKind::PermissionDenied => BindErrorCode::Access,
            io::ErrorKind::AddrNotAvailable => BindErrorCode::Other("EADDRNOTAVAIL".to_string()),
            other => BindErrorCode::Other(format!("{:?}", other)),
        }
    }
}

impl fmt::Display for BindErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const DRIVER_PREFIX: &str = "Sequelize";

/// Category of a database connection failure
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConnectionErrorCategory {
    ConnectionRefused,
    AccessDenied,
    ConnectionAcquireTimeout,
    ConnectionTimedOut,
    HostNotFound,
    HostNotReachable,
    InvalidConnection,
    /// Unrecognized category, name kept verbatim
    Other(String),
}

impl ConnectionErrorCategory {
    pub fn name(&self) -> &str {
        match self {
            ConnectionErrorCategory::ConnectionRefused => "ConnectionRefusedError",
            ConnectionErrorCategory::AccessDenied => "AccessDeniedError",
            ConnectionErrorCategory::ConnectionAcquireTimeout => "ConnectionAcquireTimeoutError",
            ConnectionErrorCategory::ConnectionTimedOut => "ConnectionTimedOutError",
            ConnectionErrorCategory::HostNotFound => "HostNotFoundError",
            ConnectionErrorCategory::HostNotReachable => "HostNotReachableError",
            ConnectionErrorCategory::InvalidConnection => "InvalidConnectionError",
            ConnectionErrorCategory::Other(name) => name,
        }
    }

    /// Parse a category name.
    ///
    /// Accepts both the bare name (`ConnectionRefusedError`) and the
    /// driver-prefixed form (`SequelizeConnectionRefusedError`). Anything
    /// else becomes [`ConnectionErrorCategory::Other`] with the input kept
    /// as-is.
    pub fn from_name(name: &str) -> Self {
        let bare = name.strip_prefix(DRIVER_PREFIX).unwrap_or(name);

        match bare {
            "ConnectionRefusedError" => ConnectionErrorCategory::ConnectionRefused,
            "AccessDeniedError" => ConnectionErrorCategory::AccessDenied,
            "ConnectionAcquireTimeoutError" => ConnectionErrorCategory::ConnectionAcquireTimeout,
            "ConnectionTimedOutError" => ConnectionErrorCategory::ConnectionTimedOut,
            "HostNotFoundError" => ConnectionErrorCategory::HostNotFound,
            "HostNotReachableError" => ConnectionErrorCategory::HostNotReachable,
            "InvalidConnectionError" => ConnectionErrorCategory::InvalidConnection,
            _ => ConnectionErrorCategory::Other(name.to_string()),
        }
    }

    /// Fixed diagnostic suffix for recognized categories
    pub fn description(&self) -> Option<&'static str> {
        match self {
            ConnectionErrorCategory::ConnectionRefused => Some("connection refused."),
            ConnectionErrorCategory::AccessDenied => Some("insufficient privileges."),
            ConnectionErrorCategory::ConnectionAcquireTimeout => {
                Some("connection not acquired due to timeout.")
            }
            ConnectionErrorCategory::ConnectionTimedOut => Some("connection timed out."),
            ConnectionErrorCategory::HostNotFound => Some("hostname not found."),
            ConnectionErrorCategory::HostNotReachable => Some("hostname not reachable."),
            ConnectionErrorCategory::InvalidConnection => Some("invalid connection parameters."),
            ConnectionErrorCategory::Other(_) => None,
        }
    }
}

impl fmt::Display for ConnectionErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_code_from_io_kind() {
        assert_eq!(
            BindErrorCode::from_io_kind(io::ErrorKind::AddrInUse),
            BindErrorCode::AddrInUse
        );
        assert_eq!(
            BindErrorCode::from_io_kind(io::ErrorKind::PermissionDenied),
            BindErrorCode::Access
        );
        assert_eq!(
            BindErrorCode::from_io_kind(io::ErrorKind::AddrNotAvailable).as_str(),
            "EADDRNOTAVAIL"
        );
    }

    #[test]
    fn test_bind_code_round_trips_strings() {
        assert_eq!(BindErrorCode::from_code("EADDRINUSE"), BindErrorCode::AddrInUse);
        assert_eq!(BindErrorCode::from_code("EACCES"), BindErrorCode::Access);
        assert_eq!(BindErrorCode::from_code("ENOTSUP").as_str(), "ENOTSUP");
    }

    #[test]
    fn test_category_accepts_prefixed_and_bare_names() {
        assert_eq!(
            ConnectionErrorCategory::from_name("SequelizeHostNotFoundError"),
            ConnectionErrorCategory::HostNotFound
        );
        assert_eq!(
            ConnectionErrorCategory::from_name("HostNotFoundError"),
            ConnectionErrorCategory::HostNotFound
        );
        assert_eq!(
            ConnectionErrorCategory::from_name("SequelizeConnectionError"),
            ConnectionErrorCategory::Other("SequelizeConnectionError".to_string())
        );
    }

    #[test]
    fn test_only_other_lacks_description() {
        assert!(ConnectionErrorCategory::Other("X".into())
            .description()
            .is_none());
        assert_eq!(
            ConnectionErrorCategory::ConnectionAcquireTimeout.description(),
            Some("connection not acquired due to timeout.")
        );
    }
}
