//! One-shot training pipeline that produces the artifacts the service serves.
//!
//! Reads the admission CSV, splits it, fits the scaler on the training split,
//! fits ordinary least squares on the scaled features, scores the test split,
//! and publishes both artifacts to the registry so `latest` points at them.
//! Optional CSV side outputs: the scaled splits, and predicted vs. actual
//! values on the test split.

pub mod dataset;
pub mod regression;

use std::path::{Path, PathBuf};

use admit_adapters::{
    publish, AdapterError, ArtifactPayload, ArtifactStore, LinearModel, Scaler, StoredArtifact,
};
use thiserror::Error;

use crate::services::prediction::{FeatureRow, FEATURE_NAMES};
use dataset::{fit_scaler, read_csv, train_test_split, Dataset, Split, TARGET_COLUMN};
use regression::{evaluate, fit_ols, Metrics};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("failed to read dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataset has no column {0:?}")]
    MissingColumn(String),

    #[error("line {line}, column {column}: {value:?} is not a number")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
    },

    #[error("need at least {needed} rows, got {rows}")]
    TooFewRows { rows: usize, needed: usize },

    #[error("{rows} feature rows but {targets} targets")]
    ShapeMismatch { rows: usize, targets: usize },

    #[error("feature row has {actual} values, expected {expected}")]
    RaggedRow { expected: usize, actual: usize },

    #[error("test fraction must be strictly between 0 and 1, got {0}")]
    InvalidSplit(f64),

    #[error("normal equations are singular: features are collinear or constant")]
    SingularMatrix,

    #[error(transparent)]
    Store(#[from] AdapterError),
}

#[derive(Debug, Clone)]
pub struct TrainingOptions {
    pub data_path: PathBuf,
    pub scaler_name: String,
    pub model_name: String,
    pub test_fraction: f64,
    pub seed: u64,
    /// Where `prediction_vs_actual.csv` goes.
    pub report_dir: Option<PathBuf>,
    /// Where the scaled `X_train`/`X_test` and `y_train`/`y_test` CSVs go.
    pub processed_dir: Option<PathBuf>,
}

impl TrainingOptions {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            scaler_name: "admission_scaler".to_string(),
            model_name: "admission_model".to_string(),
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SEED,
            report_dir: None,
            processed_dir: None,
        }
    }
}

/// Everything fitted from one dataset, before anything is written out.
#[derive(Debug, Clone)]
pub struct FittedArtifacts {
    pub split: Split,
    pub scaler: Scaler,
    pub model: LinearModel,
    pub x_train_scaled: Vec<Vec<f64>>,
    pub x_test_scaled: Vec<Vec<f64>>,
    pub test_predictions: Vec<f64>,
    pub metrics: Metrics,
}

#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub train_rows: usize,
    pub test_rows: usize,
    pub metrics: Metrics,
    pub scaler: StoredArtifact,
    pub model: StoredArtifact,
}

/// Split, scale and fit, in memory.
pub fn fit(data: &Dataset, test_fraction: f64, seed: u64) -> Result<FittedArtifacts, TrainingError> {
    let split = train_test_split(data, test_fraction, seed)?;
    let scaler = fit_scaler(&split.train.features)?;

    let x_train_scaled = scale_all(&scaler, &split.train.features)?;
    let x_test_scaled = scale_all(&scaler, &split.test.features)?;

    let ols = fit_ols(&x_train_scaled, &split.train.target)?;
    let model = LinearModel {
        feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
        intercept: ols.intercept,
        coefficients: ols.coefficients,
    };

    let test_predictions = x_test_scaled
        .iter()
        .map(|row| model.predict(row))
        .collect::<Result<Vec<_>, _>>()?;
    let metrics = evaluate(&split.test.target, &test_predictions);

    Ok(FittedArtifacts {
        split,
        scaler,
        model,
        x_train_scaled,
        x_test_scaled,
        test_predictions,
        metrics,
    })
}

fn scale_all(scaler: &Scaler, rows: &[FeatureRow]) -> Result<Vec<Vec<f64>>, TrainingError> {
    rows.iter()
        .map(|row| scaler.transform(row).map_err(TrainingError::from))
        .collect()
}

/// Loads the dataset, fits, writes side outputs and publishes both artifacts
/// under one shared version.
pub async fn run<S>(options: &TrainingOptions, store: &S) -> Result<TrainingReport, TrainingError>
where
    S: ArtifactStore + ?Sized,
{
    let bytes = tokio::fs::read(&options.data_path).await?;
    let data = read_csv(bytes.as_slice())?;
    tracing::info!(
        rows = data.len(),
        path = %options.data_path.display(),
        "loaded dataset"
    );

    let fitted = fit(&data, options.test_fraction, options.seed)?;
    let Metrics { mse, rmse, r2, mae } = fitted.metrics;
    tracing::info!(
        train_rows = fitted.split.train.len(),
        test_rows = fitted.split.test.len(),
        "model performance: MSE {:.4}, RMSE {:.4}, R² {:.4}, MAE {:.4}",
        mse,
        rmse,
        r2,
        mae
    );

    if let Some(dir) = &options.processed_dir {
        write_processed(dir, &fitted).await?;
    }
    if let Some(dir) = &options.report_dir {
        let rows = fitted
            .split
            .test
            .target
            .iter()
            .zip(&fitted.test_predictions)
            .map(|(actual, predicted)| vec![*actual, *predicted]);
        let csv = to_csv(&["actual", "predicted"], rows)?;
        write_file(&dir.join("prediction_vs_actual.csv"), &csv).await?;
    }

    let version = store.new_version();
    let mut published = publish(
        store,
        &version,
        vec![
            (
                options.scaler_name.clone(),
                ArtifactPayload::Scaler(fitted.scaler.clone()),
            ),
            (
                options.model_name.clone(),
                ArtifactPayload::LinearRegression(fitted.model.clone()),
            ),
        ],
    )
    .await?
    .into_iter();
    let (Some(scaler), Some(model)) = (published.next(), published.next()) else {
        return Err(TrainingError::Store(AdapterError::InvalidArtifact(format!(
            "registry did not report both artifacts for version {version}"
        ))));
    };
    tracing::info!(
        scaler = %scaler.name,
        model = %model.name,
        %version,
        "published artifacts"
    );

    Ok(TrainingReport {
        train_rows: fitted.split.train.len(),
        test_rows: fitted.split.test.len(),
        metrics: fitted.metrics,
        scaler,
        model,
    })
}

async fn write_processed(dir: &Path, fitted: &FittedArtifacts) -> Result<(), TrainingError> {
    let outputs = [
        ("X_train.csv", to_csv(&FEATURE_NAMES, fitted.x_train_scaled.iter().cloned())?),
        ("X_test.csv", to_csv(&FEATURE_NAMES, fitted.x_test_scaled.iter().cloned())?),
        (
            "y_train.csv",
            to_csv(&[TARGET_COLUMN], fitted.split.train.target.iter().map(|y| vec![*y]))?,
        ),
        (
            "y_test.csv",
            to_csv(&[TARGET_COLUMN], fitted.split.test.target.iter().map(|y| vec![*y]))?,
        ),
    ];
    for (name, contents) in outputs {
        write_file(&dir.join(name), &contents).await?;
    }
    tracing::info!(dir = %dir.display(), "wrote processed splits");
    Ok(())
}

fn to_csv<I>(header: &[&str], rows: I) -> Result<Vec<u8>, TrainingError>
where
    I: IntoIterator<Item = Vec<f64>>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|err| TrainingError::Io(err.into_error()))
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<(), TrainingError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    Ok(())
}
