#![allow(clippy::result_large_err)]

use crate::core::config::DiscoveryConfig;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collect package documents under `root`, sorted by path.
///
/// A file path is accepted as a single-document batch regardless of its extension.
pub fn discover_packages(root: &Path, config: &DiscoveryConfig) -> Result<Vec<PathBuf>, AppError> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        return Err(AppError::new(
            ErrorCategory::ValidationError,
            format!(
                "The provided path '{}' is not a valid directory.",
                root.display()
            ),
        ));
    }

    let extension = config.extension.trim().trim_start_matches('.');
    let mut packages = Vec::new();
    for entry in WalkDir::new(root).follow_links(config.follow_links) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("skipping unreadable entry under {}: {}", root.display(), err);
                continue;
            }
        };
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            packages.push(entry.into_path());
        }
    }
    packages.sort();

    tracing::debug!(root = %root.display(), count = packages.len(), "discovered packages");
    Ok(packages)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}
