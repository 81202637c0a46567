//! Authentication module for credential checks and bearer-token access control.
//!
//! This module provides the public interface for login, token issuance and
//! validation, and the extractor that guards protected routes.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;

// Re-exports for convenience
pub use errors::*;
pub use middleware::*;
pub use models::*;
pub use routes::*;
pub use service::*;
