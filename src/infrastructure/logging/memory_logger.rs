use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::application::ports::ErrorLogger;

/// Lines kept by [`MemoryLogger::new`]
const DEFAULT_CAPACITY: usize = 1024;

/// Sink that keeps the most recent lines in memory.
///
/// Bounded: once `capacity` lines are held, each new line evicts the
/// oldest. Useful for tests and for surfacing recent failures on a
/// diagnostics endpoint.
#[derive(Debug)]
pub struct MemoryLogger {
    entries: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Keep at most `capacity` lines; zero is treated as one
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of every retained line, oldest first
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn last(&self) -> Option<String> {
        self.entries.lock().back().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorLogger for MemoryLogger {
    fn error(&self, message: &str) {
        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_records_in_order() {
        let logger = MemoryLogger::new();
        assert!(logger.is_empty());

        logger.error("first");
        logger.error("second");

        assert_eq!(logger.entries(), vec!["first", "second"]);
        assert_eq!(logger.last().as_deref(), Some("second"));

        logger.clear();
        assert_eq!(logger.len(), 0);
    }

    #[test]
    fn test_evicts_oldest_when_full() {
        let logger = MemoryLogger::with_capacity(2);

        logger.error("first");
        logger.error("second");
        logger.error("third");

        assert_eq!(logger.len(), 2);
        assert_eq!(logger.entries(), vec!["second", "third"]);
        assert_eq!(MemoryLogger::with_capacity(0).capacity(), 1);
    }

    #[test]
    fn test_shared_through_arc() {
        let logger = Arc::new(MemoryLogger::new());
        let shared: Arc<dyn ErrorLogger> = logger.clone();

        shared.error("via trait object");

        assert_eq!(logger.last().as_deref(), Some("via trait object"));
    }
}
