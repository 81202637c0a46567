//! Handler functions for authentication-related API endpoints.
//!
//! `login` checks the submitted credentials against the configured verifier
//! and hands back a bearer token from the `auth::service` token service.

use axum::extract::State;
use axum::Json;

use super::errors::AuthError;
use super::models::{LoginRequest, TokenResponse};
use crate::api::json::AppJson;
use crate::errors::AppError;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    if !state.credentials.verify(&request.username, &request.password) {
        let err = AuthError::BadCredentials;
        tracing::debug!(kind = err.kind(), "login rejected");
        return Err(err.into());
    }

    let token = state.tokens.issue(&request.username)?;
    tracing::info!(username = %request.username, "issued access token");
    Ok(Json(TokenResponse::bearer(token)))
}
