//! Custom error types specific to the `adapters` crate.
//!
//! This module defines errors that can occur while resolving, reading, decoding
//! or writing artifacts in a model registry, providing a unified error handling
//! mechanism for every registry adapter.

use thiserror::Error;

/// Errors raised by artifact registry adapters.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// No artifact with this name/version exists in the registry.
    #[error("artifact {name}:{version} not found")]
    NotFound { name: String, version: String },

    /// A version is written once and never overwritten.
    #[error("artifact {name}:{version} already exists")]
    AlreadyExists { name: String, version: String },

    /// Filesystem failure while reading or writing the registry.
    #[error("registry I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored bytes are not a valid artifact envelope.
    #[error("failed to decode artifact: {0}")]
    Decode(#[from] serde_json::Error),

    /// The artifact exists but holds a different kind of payload.
    #[error("artifact {name} is a {found}, expected a {expected}")]
    KindMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The payload decoded but is internally inconsistent.
    #[error("invalid artifact: {0}")]
    InvalidArtifact(String),

    /// A row handed to a fitted artifact has the wrong width.
    #[error("dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

pub type AdapterResult<T> = Result<T, AdapterError>;
