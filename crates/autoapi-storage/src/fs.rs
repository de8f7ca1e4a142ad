//! Idempotent writes into a real directory tree.

use std::fs;
use std::path::Path;

use crate::error::{Operation, StorageError};

/// Write `content` to `path` unless the file already holds exactly that.
///
/// Missing parent directories are created. Returns `true` when the file was
/// written.
///
/// # Errors
///
/// Returns [`StorageError`] if the file can't be read, created or written.
pub fn write_if_changed(path: &Path, content: &str) -> Result<bool, StorageError> {
    match fs::read_to_string(path) {
        Ok(existing) if existing == content => {
            tracing::debug!(path = %path.display(), "Content unchanged, skipping write");
            return Ok(false);
        }
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(StorageError::io(e).at(path).during(Operation::Mirror));
        }
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| StorageError::io(e).at(parent).during(Operation::Mirror))?;
    }
    fs::write(path, content)
        .map_err(|e| StorageError::io(e).at(path).during(Operation::Mirror))?;
    Ok(true)
}
