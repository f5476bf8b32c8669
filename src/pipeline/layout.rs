//! Artifact directory layout derived from the dataset location.

use std::path::{Path, PathBuf};

use crate::analysis::INSIGHTS_ARTIFACT_NAME;
use crate::quality::QUALITY_ARTIFACT_NAME;

/// Directory layout for all pipeline artifacts.
///
/// Every artifact lives in a subdirectory of the dataset's containing
/// directory: `quality_assessment/`, `insights/`, `visualizations/` and
/// `output/`. Nothing defaults to a hard-coded machine-specific path; the
/// dataset path is always an explicit input.
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    base: PathBuf,
}

impl ArtifactLayout {
    /// Derives the layout from the dataset file's parent directory.
    pub fn for_dataset(dataset_path: &Path) -> Self {
        let base = dataset_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self { base }
    }

    /// The base directory all artifact subdirectories hang off.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Directory of the quality artifact.
    pub fn quality_dir(&self) -> PathBuf {
        self.base.join("quality_assessment")
    }

    /// Full path of the quality artifact file.
    pub fn quality_artifact_path(&self) -> PathBuf {
        self.quality_dir().join(QUALITY_ARTIFACT_NAME)
    }

    /// Directory of the insights artifact.
    pub fn insights_dir(&self) -> PathBuf {
        self.base.join("insights")
    }

    /// Full path of the insights artifact file.
    pub fn insights_artifact_path(&self) -> PathBuf {
        self.insights_dir().join(INSIGHTS_ARTIFACT_NAME)
    }

    /// Directory the visualization images are written to.
    pub fn visualizations_dir(&self) -> PathBuf {
        self.base.join("visualizations")
    }

    /// Directory the final report is written to.
    pub fn output_dir(&self) -> PathBuf {
        self.base.join("output")
    }
}
