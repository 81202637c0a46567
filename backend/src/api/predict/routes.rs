//! Defines the HTTP routes for admission prediction.

use axum::{routing::post, Router};

use super::handlers::predict;
use crate::state::AppState;

pub fn predict_router() -> Router<AppState> {
    Router::new().route("/predict", post(predict))
}
