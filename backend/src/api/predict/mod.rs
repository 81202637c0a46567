//! Module for the admission prediction API.
//!
//! This module defines the request/response shapes and the HTTP endpoint that
//! runs the prediction pipeline for an authenticated caller.

pub mod handlers;
pub mod models;
pub mod routes;
