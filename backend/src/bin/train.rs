//! Fits the admission scaler and regression model and publishes them to the
//! registry the API server loads from.

use std::path::PathBuf;

use admit_adapters::FsArtifactStore;
use admit_backend::logging;
use admit_backend::training::{self, TrainingOptions, DEFAULT_SEED, DEFAULT_TEST_FRACTION};
use anyhow::Context;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "admit-train",
    about = "Train the admission regression model and publish it to the registry"
)]
struct Args {
    /// Admission CSV with a header row.
    #[arg(long, default_value = "data/raw/admission.csv")]
    data: PathBuf,

    #[arg(long, env = "ADMIT_REGISTRY_DIR", default_value = "models/registry")]
    registry: PathBuf,

    #[arg(long, env = "ADMIT_SCALER_NAME", default_value = "admission_scaler")]
    scaler_name: String,

    #[arg(long, env = "ADMIT_MODEL_NAME", default_value = "admission_model")]
    model_name: String,

    #[arg(long, default_value_t = DEFAULT_TEST_FRACTION)]
    test_fraction: f64,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Directory for prediction_vs_actual.csv.
    #[arg(long, default_value = "models")]
    report_dir: PathBuf,

    /// Also write the scaled train/test splits here.
    #[arg(long)]
    processed_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init("admit_backend=info,admit_adapters=info");

    let args = Args::parse();
    let options = TrainingOptions {
        data_path: args.data,
        scaler_name: args.scaler_name,
        model_name: args.model_name,
        test_fraction: args.test_fraction,
        seed: args.seed,
        report_dir: Some(args.report_dir),
        processed_dir: args.processed_dir,
    };

    let store = FsArtifactStore::new(&args.registry);
    let report = training::run(&options, &store)
        .await
        .with_context(|| format!("training on {} failed", options.data_path.display()))?;

    println!(
        "published {}:{} and {}:{} (R² {:.4} on {} test rows)",
        report.scaler.name,
        report.scaler.version,
        report.model.name,
        report.model.version,
        report.metrics.r2,
        report.test_rows
    );
    Ok(())
}
