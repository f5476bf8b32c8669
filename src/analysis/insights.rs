//! Shared append-only insights artifact.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt as _;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::AnalysisError;

/// Filename of the insights artifact.
pub const INSIGHTS_ARTIFACT_NAME: &str = "insights.txt";

/// The shared insights text artifact.
///
/// Each analyzer appends its own section and never rewrites another's.
/// Appends take an exclusive lock so concurrent analyzers cannot interleave
/// their writes.
pub struct InsightsArtifact {
    path: PathBuf,
    lock: Mutex<()>,
}

impl InsightsArtifact {
    /// Creates the artifact handle inside `dir`. The file itself is created
    /// lazily on first append.
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(INSIGHTS_ARTIFACT_NAME),
            lock: Mutex::new(()),
        }
    }

    /// Path of the artifact file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a section to the artifact, creating the containing directory
    /// and file on first use. The whole section is written under one lock.
    pub async fn append(&self, section: &str) -> Result<(), AnalysisError> {
        let _guard = self.lock.lock().await;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| AnalysisError::ArtifactAppend {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        file.write_all(section.as_bytes())
            .await
            .map_err(|e| AnalysisError::ArtifactAppend {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        file.flush().await?;
        debug!(path = %self.path.display(), bytes = section.len(), "Appended insights section");
        Ok(())
    }
}
