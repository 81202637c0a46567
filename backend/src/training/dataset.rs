//! Dataset loading, train/test split and scaler fitting.
//!
//! Columns are matched by normalized header (`"GRE Score"` → `gre_score`,
//! `"Chance of Admit "` → `chance_of_admit`), never by position, so the feature
//! matrix always comes out in [`FEATURE_NAMES`] order. Extra columns such as
//! `Serial No.` are ignored.

use std::io::Read;

use admit_adapters::Scaler;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::TrainingError;
use crate::services::prediction::{FeatureRow, FEATURE_COUNT, FEATURE_NAMES};

pub const TARGET_COLUMN: &str = "chance_of_admit";

const NEAR_ZERO_SCALE: f64 = 10.0 * f64::EPSILON;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub features: Vec<FeatureRow>,
    pub target: Vec<f64>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: indices.iter().map(|&i| self.features[i]).collect(),
            target: indices.iter().map(|&i| self.target[i]).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
}

pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

pub fn read_csv<R: Read>(reader: R) -> Result<Dataset, TrainingError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TrainingError::MissingColumn(name.to_string()))
    };
    let feature_columns = FEATURE_NAMES
        .iter()
        .map(|name| column(name))
        .collect::<Result<Vec<_>, _>>()?;
    let target_column = column(TARGET_COLUMN)?;

    let mut data = Dataset::default();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // Line 1 is the header.
        let line = i + 2;
        let parse = |idx: usize| {
            let raw = record.get(idx).unwrap_or_default();
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| TrainingError::InvalidValue {
                    line,
                    column: headers[idx].clone(),
                    value: raw.to_string(),
                })
        };

        let mut row = [0.0; FEATURE_COUNT];
        for (slot, &idx) in row.iter_mut().zip(&feature_columns) {
            *slot = parse(idx)?;
        }
        data.features.push(row);
        data.target.push(parse(target_column)?);
    }

    if data.is_empty() {
        return Err(TrainingError::TooFewRows { rows: 0, needed: 1 });
    }
    Ok(data)
}

/// Seeded shuffle, then the first `ceil(n * test_fraction)` rows go to test.
pub fn train_test_split(
    data: &Dataset,
    test_fraction: f64,
    seed: u64,
) -> Result<Split, TrainingError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(TrainingError::InvalidSplit(test_fraction));
    }

    let n = data.len();
    let n_test = (n as f64 * test_fraction).ceil() as usize;
    if n < 2 || n_test >= n {
        return Err(TrainingError::TooFewRows { rows: n, needed: 2 });
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));
    let (test, train) = indices.split_at(n_test);

    Ok(Split {
        train: data.select(train),
        test: data.select(test),
    })
}

/// Fits per-feature mean and population standard deviation.
pub fn fit_scaler(rows: &[FeatureRow]) -> Result<Scaler, TrainingError> {
    if rows.is_empty() {
        return Err(TrainingError::TooFewRows { rows: 0, needed: 1 });
    }

    let n = rows.len() as f64;
    let mut mean = vec![0.0; FEATURE_COUNT];
    for row in rows {
        for (m, x) in mean.iter_mut().zip(row) {
            *m += x / n;
        }
    }

    let mut var = vec![0.0; FEATURE_COUNT];
    for row in rows {
        for ((v, x), m) in var.iter_mut().zip(row).zip(&mean) {
            *v += (x - m).powi(2) / n;
        }
    }

    // Constant columns keep scale 1 so they transform to 0. A constant that
    // is not exactly representable leaves rounding noise in the variance, so
    // anything within a few ulps of the mean counts as zero.
    let scale = var
        .into_iter()
        .zip(&mean)
        .map(|(v, m)| {
            let std = v.sqrt();
            if std <= NEAR_ZERO_SCALE * m.abs().max(1.0) {
                1.0
            } else {
                std
            }
        })
        .collect();

    Ok(Scaler {
        feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
        mean,
        scale,
    })
}
