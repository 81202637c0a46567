//! Custom error types specific to authentication failures.
//!
//! This module defines the set of errors that can occur while checking
//! credentials and issuing or validating bearer tokens. Every variant surfaces as
//! `401 Unauthorized` except a signing failure, which is a server fault.

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Incorrect credentials")]
    BadCredentials,

    /// Header absent, not `Bearer `, or nothing after the scheme.
    #[error("Missing or invalid token")]
    MissingOrMalformedHeader,

    /// Signature verified but `exp` is not in the future.
    #[error("Expired token")]
    ExpiredToken,

    /// Bad signature, wrong algorithm, or malformed claims.
    #[error("Invalid token")]
    InvalidToken,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Short label for logs, so tokens and usernames never end up there.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::BadCredentials => "bad_credentials",
            AuthError::MissingOrMalformedHeader => "missing_or_malformed_header",
            AuthError::ExpiredToken => "expired_token",
            AuthError::InvalidToken => "invalid_token",
            AuthError::Signing(_) => "signing",
        }
    }
}
