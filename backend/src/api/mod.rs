//! Central module for organizing the application's main API endpoints.
//!
//! This module acts as a top-level container for the protected API domains
//! (currently admission prediction), excluding the authentication routes which
//! are handled separately.

pub mod json;
pub mod predict;
