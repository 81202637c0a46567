//! Middleware for protecting authenticated routes.
//!
//! `AuthenticatedUser` is an extractor: any handler that takes it only runs once
//! the `Authorization` header carries a valid bearer token. Failures reject the
//! request with `401` before the body is read.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::errors::AppError;
use crate::state::AppState;

/// The subject of a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // A header that is not visible ASCII is treated as absent.
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        match state.tokens.validate(header) {
            Ok(subject) => Ok(AuthenticatedUser(subject)),
            Err(err) => {
                tracing::debug!(kind = err.kind(), path = %parts.uri.path(), "rejected bearer token");
                Err(err.into())
            }
        }
    }
}
