//! Shared, read-only application state handed to every handler.

use std::fmt;
use std::sync::Arc;

use admit_adapters::{load, AdapterError, ArtifactStore, LinearModel, Scaler};

use crate::auth::{CredentialVerifier, StaticCredentials, TokenService};
use crate::config::AppConfig;
use crate::services::prediction::PredictionPipeline;

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub pipeline: Arc<PredictionPipeline>,
}

impl AppState {
    pub fn new(
        tokens: TokenService,
        credentials: Arc<dyn CredentialVerifier>,
        pipeline: PredictionPipeline,
    ) -> Self {
        Self {
            tokens: Arc::new(tokens),
            credentials,
            pipeline: Arc::new(pipeline),
        }
    }

    /// Builds the state from configuration, loading both artifacts from `store`.
    pub async fn load<S>(config: &AppConfig, store: &S) -> Result<Self, AdapterError>
    where
        S: ArtifactStore + ?Sized,
    {
        let artifacts = &config.artifacts;
        let scaler = load::<Scaler, _>(store, &artifacts.scaler_name, &artifacts.version).await?;
        let model = load::<LinearModel, _>(store, &artifacts.model_name, &artifacts.version).await?;
        let pipeline = PredictionPipeline::new(scaler, model)?;

        tracing::info!(
            scaler = %pipeline.scaler().tag(),
            model = %pipeline.model().tag(),
            "prediction pipeline ready"
        );

        Ok(Self::new(
            TokenService::new(&config.auth.token),
            Arc::new(StaticCredentials::new(
                config.auth.username.clone(),
                config.auth.password.clone(),
            )),
            pipeline,
        ))
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("tokens", &self.tokens)
            .field("credentials", &"<verifier>")
            .field("scaler", &self.pipeline.scaler().tag())
            .field("model", &self.pipeline.model().tag())
            .finish()
    }
}
