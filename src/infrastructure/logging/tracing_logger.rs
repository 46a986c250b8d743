use tracing::error;

use crate::application::ports::ErrorLogger;

/// Default sink: forwards every line to `tracing` at ERROR level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl ErrorLogger for TracingLogger {
    fn error(&self, message: &str) {
        error!(target: "error_pipeline", "{}", message);
    }
}
