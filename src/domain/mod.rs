//! Domain layer containing business entities and logic.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions (the Store)
//! - [`client_registry`] - Per-client rate-limiter state and its stale-entry evictor
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Business logic is encapsulated in services (see [`crate::application::services`])
//!
//! # Rate Limiting Flow
//!
//! 1. [`crate::api::middleware::rate_limit`] extracts the client address
//! 2. [`client_registry::ClientRegistry::admit`] consumes one cell from that client's `governor` limiter
//! 3. [`client_registry::run_client_evictor`] drops clients idle for longer than
//!    [`client_registry::STALE_AFTER`]

pub mod client_registry;
pub mod entities;
pub mod repositories;
