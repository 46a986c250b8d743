//! Logger adapters for the `ErrorLogger` port.

mod memory_logger;
mod tracing_logger;

pub use memory_logger::MemoryLogger;
pub use tracing_logger::TracingLogger;
