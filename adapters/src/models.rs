//! Generic data models for the `adapters` crate.
//!
//! These models define the fitted artifacts stored in a model registry (the
//! feature scaler and the linear regression model) together with the envelope
//! they are persisted in, so every registry adapter exchanges the same format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{AdapterError, AdapterResult};

/// Version tag that resolves to the most recently saved artifact.
pub const LATEST_TAG: &str = "latest";

/// Per-feature standardization learned on the training split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    /// Population standard deviation per feature, 1.0 for constant features.
    pub scale: Vec<f64>,
}

impl Scaler {
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Standardizes one row: `(x - mean) / scale`, feature by feature.
    pub fn transform(&self, row: &[f64]) -> AdapterResult<Vec<f64>> {
        check_width(self.n_features(), row.len())?;
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }

    pub fn validate(&self) -> AdapterResult<()> {
        if self.mean.len() != self.scale.len() || self.mean.len() != self.feature_names.len() {
            return Err(AdapterError::InvalidArtifact(format!(
                "scaler has {} names, {} means and {} scales",
                self.feature_names.len(),
                self.mean.len(),
                self.scale.len()
            )));
        }
        if let Some(i) = self.scale.iter().position(|s| *s == 0.0 || !s.is_finite()) {
            return Err(AdapterError::InvalidArtifact(format!(
                "scaler has unusable scale {} for feature {}",
                self.scale[i], self.feature_names[i]
            )));
        }
        Ok(())
    }
}

/// Ordinary least squares fit: `intercept + sum(coefficients[i] * x[i])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub feature_names: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    pub fn predict(&self, row: &[f64]) -> AdapterResult<f64> {
        check_width(self.n_features(), row.len())?;
        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(c, x)| c * x)
                .sum::<f64>())
    }

    pub fn validate(&self) -> AdapterResult<()> {
        if self.coefficients.len() != self.feature_names.len() {
            return Err(AdapterError::InvalidArtifact(format!(
                "model has {} names and {} coefficients",
                self.feature_names.len(),
                self.coefficients.len()
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(AdapterError::InvalidArtifact(
                "model has non-finite parameters".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_width(expected: usize, actual: usize) -> AdapterResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(AdapterError::DimensionMismatch { expected, actual })
    }
}

/// What an artifact holds, tagged so a registry entry is self-describing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum ArtifactPayload {
    Scaler(Scaler),
    LinearRegression(LinearModel),
}

impl ArtifactPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            ArtifactPayload::Scaler(_) => "scaler",
            ArtifactPayload::LinearRegression(_) => "linear_regression",
        }
    }
}

/// Envelope written to and read from a registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredArtifact {
    pub name: String,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub artifact: ArtifactPayload,
}

/// A fitted artifact pinned to the concrete version it was loaded from.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub name: String,
    pub version: String,
    pub value: T,
}

impl<T> Versioned<T> {
    /// `name:version`, the same form the registry uses in its errors.
    pub fn tag(&self) -> String {
        format!("{}:{}", self.name, self.version)
    }
}

/// Artifacts that can be unwrapped from a [`StoredArtifact`].
pub trait FittedArtifact: Sized {
    const KIND: &'static str;

    fn from_payload(name: &str, payload: ArtifactPayload) -> AdapterResult<Self>;
}

impl FittedArtifact for Scaler {
    const KIND: &'static str = "scaler";

    fn from_payload(name: &str, payload: ArtifactPayload) -> AdapterResult<Self> {
        match payload {
            ArtifactPayload::Scaler(scaler) => {
                scaler.validate()?;
                Ok(scaler)
            }
            other => Err(AdapterError::KindMismatch {
                name: name.to_string(),
                expected: Self::KIND,
                found: other.kind(),
            }),
        }
    }
}

impl FittedArtifact for LinearModel {
    const KIND: &'static str = "linear_regression";

    fn from_payload(name: &str, payload: ArtifactPayload) -> AdapterResult<Self> {
        match payload {
            ArtifactPayload::LinearRegression(model) => {
                model.validate()?;
                Ok(model)
            }
            other => Err(AdapterError::KindMismatch {
                name: name.to_string(),
                expected: Self::KIND,
                found: other.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{i}")).collect()
    }

    #[test]
    fn scaler_standardizes_each_feature() {
        let scaler = Scaler {
            feature_names: names(2),
            mean: vec![10.0, 1.0],
            scale: vec![2.0, 0.5],
        };
        let out = scaler.transform(&[14.0, 0.0]).unwrap();
        assert_eq!(out, vec![2.0, -2.0]);
    }

    #[test]
    fn scaler_rejects_wrong_width() {
        let scaler = Scaler {
            feature_names: names(2),
            mean: vec![0.0, 0.0],
            scale: vec![1.0, 1.0],
        };
        let err = scaler.transform(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            AdapterError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn zero_scale_is_invalid() {
        let scaler = Scaler {
            feature_names: names(1),
            mean: vec![0.0],
            scale: vec![0.0],
        };
        assert!(scaler.validate().is_err());
    }

    #[test]
    fn linear_model_adds_intercept() {
        let model = LinearModel {
            feature_names: names(3),
            intercept: 0.5,
            coefficients: vec![1.0, -2.0, 0.25],
        };
        let y = model.predict(&[1.0, 1.0, 4.0]).unwrap();
        assert!((y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn envelope_is_tagged_by_kind() {
        let stored = StoredArtifact {
            name: "admission_model".into(),
            version: "v1".into(),
            created_at: Utc::now(),
            artifact: ArtifactPayload::LinearRegression(LinearModel {
                feature_names: names(1),
                intercept: 1.0,
                coefficients: vec![2.0],
            }),
        };
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["artifact"]["kind"], "linear_regression");
        assert_eq!(json["artifact"]["payload"]["intercept"], 1.0);
    }

    #[test]
    fn unwrapping_the_wrong_kind_fails() {
        let payload = ArtifactPayload::Scaler(Scaler {
            feature_names: names(1),
            mean: vec![0.0],
            scale: vec![1.0],
        });
        let err = LinearModel::from_payload("admission_scaler", payload).unwrap_err();
        assert!(matches!(err, AdapterError::KindMismatch { found: "scaler", .. }));
    }
}
