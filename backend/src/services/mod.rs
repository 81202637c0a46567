//! Module for core business logic services.
//!
//! This module encapsulates services that perform specific business operations
//! and are shared read-only across requests, such as the prediction pipeline.

pub mod prediction;
