//! Handler functions for the prediction API.
//!
//! The bearer token is checked by the `AuthenticatedUser` extractor before the
//! body is parsed; the parsed input then goes through the prediction pipeline.

use axum::extract::State;
use axum::Json;

use super::models::{AdmissionInput, PredictionResult};
use crate::api::json::AppJson;
use crate::auth::AuthenticatedUser;
use crate::errors::AppError;
use crate::state::AppState;

pub async fn predict(
    AuthenticatedUser(subject): AuthenticatedUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<AdmissionInput>,
) -> Result<Json<PredictionResult>, AppError> {
    let chance_of_admit = state.pipeline.predict_one(&input.to_features())?;
    tracing::debug!(user = %subject, chance_of_admit, "prediction served");
    Ok(Json(PredictionResult { chance_of_admit }))
}
