//! Business logic services for the application layer.

pub mod auth_service;
pub mod quote_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use quote_service::QuoteService;
pub use user_service::UserService;
