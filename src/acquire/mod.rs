//! Dataset acquisition.
//!
//! Clones dataset repositories (including ones using Git LFS for large
//! files) and discovers data files by extension.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::AcquireError;

/// Clones `url` into `dest`, making sure Git LFS pointers are resolved.
///
/// # Errors
///
/// Returns [`AcquireError::CloneFailed`] with the captured stderr when
/// either git invocation exits non-zero.
pub async fn clone_dataset(url: &str, dest: &Path) -> Result<PathBuf, AcquireError> {
    let lfs = Command::new("git")
        .args(["lfs", "install"])
        .output()
        .await?;
    if !lfs.status.success() {
        return Err(AcquireError::CloneFailed {
            url: url.to_string(),
            stderr: String::from_utf8_lossy(&lfs.stderr).into_owned(),
        });
    }

    info!(url, dest = %dest.display(), "Cloning dataset repository");
    let clone = Command::new("git")
        .arg("clone")
        .arg(url)
        .arg(dest)
        .output()
        .await?;
    if !clone.status.success() {
        return Err(AcquireError::CloneFailed {
            url: url.to_string(),
            stderr: String::from_utf8_lossy(&clone.stderr).into_owned(),
        });
    }

    Ok(dest.to_path_buf())
}

/// Walks `root` and groups every file by lowercase extension.
///
/// The `.git` directory is skipped. Extensionless files are grouped
/// under the empty string. Paths within each group are sorted so the
/// result is deterministic.
///
/// # Errors
///
/// Returns [`AcquireError::PathNotFound`] when `root` does not exist.
pub fn discover_files(root: &Path) -> Result<BTreeMap<String, Vec<PathBuf>>, AcquireError> {
    if !root.exists() {
        return Err(AcquireError::PathNotFound(root.to_path_buf()));
    }

    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git");

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let extension = entry
            .path()
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        groups
            .entry(extension)
            .or_default()
            .push(entry.path().to_path_buf());
    }

    for paths in groups.values_mut() {
        paths.sort();
    }

    info!(
        root = %root.display(),
        extensions = groups.len(),
        "Discovered dataset files"
    );
    Ok(groups)
}
