//! Request and response bodies for `POST /predict`.

use serde::{Deserialize, Serialize};

use crate::services::prediction::FeatureRow;

/// One applicant. No range checks: out-of-range values extrapolate.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AdmissionInput {
    pub gre_score: i64,
    pub toefl_score: i64,
    pub university_rating: i64,
    pub sop: f64,
    pub lor: f64,
    pub cgpa: f64,
    pub research: i64,
}

impl AdmissionInput {
    /// Feature vector in the order the scaler and model were fitted on.
    pub fn to_features(&self) -> FeatureRow {
        [
            self.gre_score as f64,
            self.toefl_score as f64,
            self.university_rating as f64,
            self.sop,
            self.lor,
            self.cgpa,
            self.research as f64,
        ]
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PredictionResult {
    pub chance_of_admit: f64,
}
