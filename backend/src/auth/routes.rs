//! Defines the HTTP routes specifically for authentication.
//!
//! Currently only token issuance (`POST /login`). Designed to be merged into the
//! main Axum router.

use axum::{routing::post, Router};

use super::handlers::login;
use crate::state::AppState;

pub fn auth_router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}
