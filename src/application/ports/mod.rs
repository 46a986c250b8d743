mod error_logger;

pub use error_logger::ErrorLogger;

#[cfg(test)]
pub use error_logger::MockErrorLogger;
