//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod debug_vars;
pub mod fallback;
pub mod health;
pub mod quotes;
pub mod tokens;
pub mod users;

pub use debug_vars::debug_vars_handler;
pub use fallback::{method_not_allowed_handler, not_found_handler};
pub use health::health_handler;
pub use quotes::{
    create_quote_handler, delete_quote_handler, list_quotes_handler, show_quote_handler,
    update_quote_handler,
};
pub use tokens::create_authentication_token_handler;
pub use users::{activate_user_handler, register_user_handler};
