//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`Quote`] - A quote record managed through the CRUD endpoints
//! - [`User`] - A registered account
//! - [`Identity`] - The principal attached to a request (user or anonymous)
//! - [`Token`] - An activation or authentication token
//! - [`Permissions`] - Permission codes granted to a user
//!
//! # Design Pattern
//!
//! Entities follow the "New Type" pattern with separate structs for creation:
//! - `NewQuote`, `NewUser` - For creating new records
//! - `QuotePatch` - For partial updates

pub mod identity;
pub mod permission;
pub mod quote;
pub mod token;
pub mod user;

pub use identity::Identity;
pub use permission::{Permissions, QUOTES_READ, QUOTES_WRITE};
pub use quote::{NewQuote, Quote, QuoteFilter, QuotePatch, QuoteSort};
pub use token::{NewToken, Token, TokenScope};
pub use user::{NewUser, User};
