//! In-memory registry adapter, used to wire mock artifacts into the service
//! without touching disk.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::errors::{AdapterError, AdapterResult};
use crate::models::{ArtifactPayload, StoredArtifact, LATEST_TAG};
use crate::{check_segment, ArtifactStore};

#[derive(Debug, Default)]
struct Registry {
    versions: HashMap<String, Vec<StoredArtifact>>,
    latest: HashMap<String, String>,
}

/// Versions are `v1`, `v2`, ... in the order they are handed out.
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    registry: RwLock<Registry>,
    issued: AtomicU64,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(name: &str, version: &str) -> AdapterError {
    AdapterError::NotFound {
        name: name.to_string(),
        version: version.to_string(),
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    fn new_version(&self) -> String {
        format!("v{}", self.issued.fetch_add(1, Ordering::Relaxed) + 1)
    }

    async fn resolve(&self, name: &str, version: &str) -> AdapterResult<String> {
        check_segment(name)?;
        if version != LATEST_TAG {
            return Ok(version.to_string());
        }
        self.registry
            .read()
            .await
            .latest
            .get(name)
            .cloned()
            .ok_or_else(|| not_found(name, version))
    }

    async fn fetch(&self, name: &str, version: &str) -> AdapterResult<StoredArtifact> {
        self.registry
            .read()
            .await
            .versions
            .get(name)
            .and_then(|versions| versions.iter().find(|s| s.version == version))
            .cloned()
            .ok_or_else(|| not_found(name, version))
    }

    async fn put(
        &self,
        name: &str,
        version: &str,
        artifact: ArtifactPayload,
    ) -> AdapterResult<StoredArtifact> {
        check_segment(name)?;
        check_segment(version)?;
        if version == LATEST_TAG {
            return Err(AdapterError::InvalidArtifact(format!(
                "{LATEST_TAG:?} is reserved and cannot be used as a version"
            )));
        }

        let mut registry = self.registry.write().await;
        let versions = registry.versions.entry(name.to_string()).or_default();
        if versions.iter().any(|s| s.version == version) {
            return Err(AdapterError::AlreadyExists {
                name: name.to_string(),
                version: version.to_string(),
            });
        }
        let stored = StoredArtifact {
            name: name.to_string(),
            version: version.to_string(),
            created_at: Utc::now(),
            artifact,
        };
        versions.push(stored.clone());
        Ok(stored)
    }

    async fn promote(&self, name: &str, version: &str) -> AdapterResult<()> {
        let mut registry = self.registry.write().await;
        let known = registry
            .versions
            .get(name)
            .is_some_and(|versions| versions.iter().any(|s| s.version == version));
        if !known {
            return Err(not_found(name, version));
        }
        registry.latest.insert(name.to_string(), version.to_string());
        Ok(())
    }
}
