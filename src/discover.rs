//! Source file discovery.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{DriverError, DriverResult};

pub const SOURCE_EXTENSION: &str = "hlx";

pub fn is_source_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// All `.hlx` files under `root`, in path order.
///
/// A file path is returned as-is, whatever its extension.
pub fn discover_sources(root: &Path) -> DriverResult<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut sources = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| DriverError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && is_source_file(entry.path()) {
            sources.push(entry.into_path());
        }
    }
    tracing::debug!(root = %root.display(), count = sources.len(), "discovered sources");
    Ok(sources)
}
