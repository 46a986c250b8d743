#[cfg(test)]
use mockall::automock;
use std::sync::Arc;

/// Port for the sink receiving diagnostic lines.
///
/// The facade only ever needs one capability: emitting an error line. Any
/// type that cannot do that is rejected when the facade is constructed,
/// since `ErrorFacade::new` requires this bound.
#[cfg_attr(test, automock)]
pub trait ErrorLogger: Send + Sync {
    /// Emit a single (possibly multi-line) error entry
    fn error(&self, message: &str);
}

impl<L: ErrorLogger + ?Sized> ErrorLogger for Arc<L> {
    fn error(&self, message: &str) {
        (**self).error(message)
    }
}

impl<L: ErrorLogger + ?Sized> ErrorLogger for Box<L> {
    fn error(&self, message: &str) {
        (**self).error(message)
    }
}

impl<L: ErrorLogger + ?Sized> ErrorLogger for &L {
    fn error(&self, message: &str) {
        (**self).error(message)
    }
}
