//! Scaler-then-model inference over admission feature vectors.
//!
//! The pipeline owns the two fitted artifacts for the life of the process.
//! Both are checked at construction to have been fitted on exactly
//! [`FEATURE_NAMES`], in that order.

use admit_adapters::{AdapterError, LinearModel, Scaler, Versioned};

pub const FEATURE_COUNT: usize = 7;

/// Feature order shared by the request body, the scaler and the model.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "gre_score",
    "toefl_score",
    "university_rating",
    "sop",
    "lor",
    "cgpa",
    "research",
];

pub type FeatureRow = [f64; FEATURE_COUNT];

#[derive(Debug, Clone)]
pub struct PredictionPipeline {
    scaler: Versioned<Scaler>,
    model: Versioned<LinearModel>,
}

impl PredictionPipeline {
    pub fn new(
        scaler: Versioned<Scaler>,
        model: Versioned<LinearModel>,
    ) -> Result<Self, AdapterError> {
        check_features(&scaler.tag(), &scaler.value.feature_names)?;
        check_features(&model.tag(), &model.value.feature_names)?;
        scaler.value.validate()?;
        model.value.validate()?;
        Ok(Self { scaler, model })
    }

    pub fn scaler(&self) -> &Versioned<Scaler> {
        &self.scaler
    }

    pub fn model(&self) -> &Versioned<LinearModel> {
        &self.model
    }

    /// Standardizes one raw row with the fitted mean and scale.
    pub fn transform(&self, row: &FeatureRow) -> Result<Vec<f64>, AdapterError> {
        self.scaler.value.transform(row)
    }

    /// Applies the regression to an already-scaled row.
    pub fn predict_scaled(&self, scaled: &[f64]) -> Result<f64, AdapterError> {
        self.model.value.predict(scaled)
    }

    pub fn predict_one(&self, row: &FeatureRow) -> Result<f64, AdapterError> {
        self.predict_scaled(&self.transform(row)?)
    }

    /// Row-wise over a batch; a batch of one equals [`Self::predict_one`].
    pub fn predict_batch(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, AdapterError> {
        rows.iter().map(|row| self.predict_one(row)).collect()
    }
}

fn check_features(tag: &str, names: &[String]) -> Result<(), AdapterError> {
    if names.len() != FEATURE_COUNT {
        return Err(AdapterError::DimensionMismatch {
            expected: FEATURE_COUNT,
            actual: names.len(),
        });
    }
    if names.iter().zip(FEATURE_NAMES).any(|(got, want)| got != want) {
        return Err(AdapterError::InvalidArtifact(format!(
            "{tag} was fitted on features {names:?}, expected {FEATURE_NAMES:?}"
        )));
    }
    Ok(())
}
