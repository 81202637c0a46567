//! Core `adapters` crate for abstracting model registry interactions.
//!
//! This crate defines the `ArtifactStore` trait, which outlines the generic
//! operations for resolving, reading and writing fitted artifacts (the feature
//! scaler and the regression model), and provides the concrete implementations
//! (filesystem registry, in-memory registry).

pub mod errors;
pub mod fs;
pub mod memory;
pub mod models;

use async_trait::async_trait;

pub use errors::{AdapterError, AdapterResult};
pub use fs::FsArtifactStore;
pub use memory::MemoryArtifactStore;
pub use models::{
    ArtifactPayload, FittedArtifact, LinearModel, Scaler, StoredArtifact, Versioned, LATEST_TAG,
};

/// A named, versioned registry of fitted artifacts.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// A fresh version string, unique within this store.
    fn new_version(&self) -> String;

    /// Turns a version or the `latest` tag into a concrete version.
    async fn resolve(&self, name: &str, version: &str) -> AdapterResult<String>;

    /// Reads the artifact stored under a concrete version.
    async fn fetch(&self, name: &str, version: &str) -> AdapterResult<StoredArtifact>;

    /// Writes `name:version` without touching `latest`. Existing versions are
    /// never overwritten.
    async fn put(
        &self,
        name: &str,
        version: &str,
        artifact: ArtifactPayload,
    ) -> AdapterResult<StoredArtifact>;

    /// Points `latest` for `name` at an already stored version.
    async fn promote(&self, name: &str, version: &str) -> AdapterResult<()>;

    /// Stores a new version and makes it the one `latest` resolves to.
    async fn save(&self, name: &str, artifact: ArtifactPayload) -> AdapterResult<StoredArtifact> {
        let version = self.new_version();
        let stored = self.put(name, &version, artifact).await?;
        self.promote(name, &version).await?;
        Ok(stored)
    }
}

/// Stores every artifact under one shared `version`, then moves each `latest`
/// pointer. A failed write leaves all pointers where they were.
pub async fn publish<S>(
    store: &S,
    version: &str,
    artifacts: Vec<(String, ArtifactPayload)>,
) -> AdapterResult<Vec<StoredArtifact>>
where
    S: ArtifactStore + ?Sized,
{
    let mut stored = Vec::with_capacity(artifacts.len());
    for (name, artifact) in artifacts {
        stored.push(store.put(&name, version, artifact).await?);
    }
    for artifact in &stored {
        store.promote(&artifact.name, version).await?;
    }
    log::info!("published {} artifacts as version {}", stored.len(), version);
    Ok(stored)
}

/// Loads `name:version` and unwraps it as `T`, pinning the resolved version.
pub async fn load<T, S>(store: &S, name: &str, version: &str) -> AdapterResult<Versioned<T>>
where
    T: FittedArtifact,
    S: ArtifactStore + ?Sized,
{
    let resolved = store.resolve(name, version).await?;
    let stored = store.fetch(name, &resolved).await?;
    let value = T::from_payload(name, stored.artifact)?;
    log::info!(
        "loaded {} artifact {}:{} (requested {})",
        T::KIND,
        stored.name,
        stored.version,
        version
    );
    Ok(Versioned {
        name: stored.name,
        version: stored.version,
        value,
    })
}

/// Rejects names and versions that could escape a registry root.
pub(crate) fn check_segment(segment: &str) -> AdapterResult<()> {
    let bad = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\', ':']);
    if bad {
        Err(AdapterError::InvalidArtifact(format!(
            "invalid registry path segment {segment:?}"
        )))
    } else {
        Ok(())
    }
}
