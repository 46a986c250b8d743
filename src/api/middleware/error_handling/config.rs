use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::config::Environment;

static PRODUCTION_CONFIG: Lazy<ErrorHandlingConfig> = Lazy::new(|| ErrorHandlingConfig {
    redact_server_errors: true,
    include_stack_traces: false,
});
static DEVELOPMENT_CONFIG: Lazy<ErrorHandlingConfig> = Lazy::new(|| ErrorHandlingConfig {
    redact_server_errors: false,
    include_stack_traces: true,
});

/// Error handling configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorHandlingConfig {
    /// Replace name and message of 5xx responses with a generic pair
    pub redact_server_errors: bool,
    /// Append stack traces to logged lines
    pub include_stack_traces: bool,
}

impl Default for ErrorHandlingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl ErrorHandlingConfig {
    /// Create a new config with custom settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Redact 5xx responses and keep stacks out of logs
    pub fn production() -> Self {
        PRODUCTION_CONFIG.clone()
    }

    /// Expose 5xx details and log stacks
    pub fn development() -> Self {
        DEVELOPMENT_CONFIG.clone()
    }

    pub fn for_environment(environment: Environment) -> Self {
        if environment.is_production() {
            Self::production()
        } else {
            Self::development()
        }
    }

    /// Enable/disable 5xx redaction
    pub fn with_redaction(mut self, enabled: bool) -> Self {
        self.redact_server_errors = enabled;
        self
    }

    /// Enable/disable stack traces in logs
    pub fn with_stack_traces(mut self, enabled: bool) -> Self {
        self.include_stack_traces = enabled;
        self
    }
}
