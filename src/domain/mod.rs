//! Error shapes the pipeline understands, independent of any HTTP plumbing.

pub mod error_types;
pub mod errors;
pub mod status;

pub use error_types::{BindErrorCode, ConnectionErrorCategory};
pub use errors::{
    BindError, ConnectionError, GenericError, QueryError, RawError, ValidationDetail,
    ValidationError,
};
pub use status::RawStatus;
