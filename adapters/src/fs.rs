//! Filesystem registry adapter.
//!
//! Layout under the registry root:
//!
//! ```text
//! <root>/<name>/<version>/artifact.json
//! <root>/<name>/latest            # holds the newest version string
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::{AdapterError, AdapterResult};
use crate::models::{ArtifactPayload, StoredArtifact, LATEST_TAG};
use crate::{check_segment, ArtifactStore};

const ARTIFACT_FILE: &str = "artifact.json";

#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn not_found(name: &str, version: &str) -> AdapterError {
        AdapterError::NotFound {
            name: name.to_string(),
            version: version.to_string(),
        }
    }
}

/// Writes through a sibling temp file so readers never see a partial file.
async fn write_replace(path: &Path, contents: &[u8]) -> AdapterResult<()> {
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, contents).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    /// UTC timestamp down to the microsecond.
    fn new_version(&self) -> String {
        Utc::now().format("%Y%m%d%H%M%S%6f").to_string()
    }

    async fn resolve(&self, name: &str, version: &str) -> AdapterResult<String> {
        check_segment(name)?;
        if version != LATEST_TAG {
            check_segment(version)?;
            return Ok(version.to_string());
        }

        let pointer = self.entry_dir(name).join(LATEST_TAG);
        match tokio::fs::read_to_string(&pointer).await {
            Ok(contents) => {
                let resolved = contents.trim().to_string();
                check_segment(&resolved)?;
                log::debug!("{}:{} resolves to {}", name, LATEST_TAG, resolved);
                Ok(resolved)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Err(Self::not_found(name, version)),
            Err(err) => Err(err.into()),
        }
    }

    async fn fetch(&self, name: &str, version: &str) -> AdapterResult<StoredArtifact> {
        check_segment(name)?;
        check_segment(version)?;

        let path = self.entry_dir(name).join(version).join(ARTIFACT_FILE);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(Self::not_found(name, version))
            }
            Err(err) => return Err(err.into()),
        };

        let stored: StoredArtifact = serde_json::from_slice(&bytes)?;
        if stored.name != name || stored.version != version {
            return Err(AdapterError::InvalidArtifact(format!(
                "{} holds {}:{}",
                path.display(),
                stored.name,
                stored.version
            )));
        }
        Ok(stored)
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

        let dir = self.entry_dir(name).join(version);
        let path = dir.join(ARTIFACT_FILE);
        if tokio::fs::try_exists(&path).await? {
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
        tokio::fs::create_dir_all(&dir).await?;
        let json = serde_json::to_vec_pretty(&stored)?;
        write_replace(&path, &json).await?;

        log::info!(
            "stored {} artifact {}:{} under {}",
            stored.artifact.kind(),
            stored.name,
            stored.version,
            self.root.display()
        );
        Ok(stored)
    }

    async fn promote(&self, name: &str, version: &str) -> AdapterResult<()> {
        check_segment(name)?;
        check_segment(version)?;

        let path = self.entry_dir(name).join(version).join(ARTIFACT_FILE);
        if !tokio::fs::try_exists(&path).await? {
            return Err(Self::not_found(name, version));
        }
        write_replace(&self.entry_dir(name).join(LATEST_TAG), version.as_bytes()).await?;
        log::debug!("{}:{} now points at {}", name, LATEST_TAG, version);
        Ok(())
    }
}
