//! Authenticated admission prediction service.
//!
//! Wires the authentication routes, the protected prediction API and the
//! shared middleware into a single Axum router. The binaries in `main.rs` and
//! `bin/train.rs` are thin shells around this library.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod logging;
pub mod middleware;
pub mod services;
pub mod state;
pub mod training;

use axum::Router;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(auth::auth_router())
        .merge(api::predict::routes::predict_router())
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .with_state(state)
}
