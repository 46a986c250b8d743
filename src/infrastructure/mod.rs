pub mod logging;

pub use logging::{MemoryLogger, TracingLogger};
