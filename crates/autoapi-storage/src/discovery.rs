//! Discovery of source files to document.
//!
//! Include patterns are matched at any depth below the root, like a recursive
//! glob. When two patterns match files with the same path minus extension
//! (`mod.py` and `mod.pyi`), the pattern declared first wins. Exclude patterns
//! are matched relative to the root and subtracted afterwards.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::error::{Operation, StorageError};

/// Find the files below `root` matching `patterns` and none of `ignore`.
///
/// Returned paths are canonical absolute paths.
///
/// # Errors
///
/// Returns [`StorageError`] with [`crate::StorageErrorKind::InvalidPattern`] for an
/// invalid pattern, or an I/O error if a matched path can't be resolved.
pub fn discover_files(
    root: &Path,
    patterns: &[String],
    ignore: &[String],
) -> Result<BTreeSet<PathBuf>, StorageError> {
    let base = Pattern::escape(&root.to_string_lossy());

    let mut by_stem: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();
    for pattern in patterns.iter().rev() {
        for path in glob_files(&format!("{base}/**/{pattern}"))? {
            by_stem.insert(path.with_extension(""), path);
        }
    }
    let mut files: BTreeSet<PathBuf> = by_stem.into_values().collect();

    for pattern in ignore {
        let ignored = glob_files(&format!("{base}/{pattern}"))?;
        files.retain(|path| !ignored.contains(path));
    }

    let files = files
        .into_iter()
        .map(|path| {
            path.canonicalize()
                .map_err(|e| StorageError::io(e).at(path).during(Operation::Discover))
        })
        .collect::<Result<BTreeSet<_>, _>>()?;

    tracing::debug!(count = files.len(), root = %root.display(), "Discovered source files");
    Ok(files)
}

fn glob_files(pattern: &str) -> Result<BTreeSet<PathBuf>, StorageError> {
    let entries = glob::glob(pattern).map_err(|e| {
        StorageError::invalid_pattern(pattern, e).during(Operation::Discover)
    })?;

    let mut files = BTreeSet::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            StorageError::io(e.into_error())
                .at(path)
                .during(Operation::Discover)
        })?;
        if path.is_file() {
            files.insert(path);
        }
    }
    Ok(files)
}
