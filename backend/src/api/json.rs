//! JSON extractor whose rejection is an [`AppError`], so body parse failures
//! get the same `{"message": ...}` shape as every other error.

use axum::extract::FromRequest;

use crate::errors::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
