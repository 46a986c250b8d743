pub mod failures;
pub mod health;

pub use failures::{
    boom_handler, broken_query_handler, create_user_handler, get_item_handler, status_handler,
    CreateUserRequest,
};
pub use health::{health_handler, readiness_handler};
