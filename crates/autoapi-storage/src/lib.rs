//! File access for autoapi builds.
//!
//! This crate provides:
//! - [`File`] and [`Files`]: the documentation files of one build
//! - [`FilesEditor`]: virtual writes redirected to a staging directory
//! - [`discover_files`]: source file discovery with include and exclude globs
//! - [`write_if_changed`]: idempotent writes of mirrored output
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use autoapi_storage::{Files, FilesEditor};
//!
//! let files = Files::scan(Path::new("docs"))?;
//! let staging = tempfile::tempdir().map_err(autoapi_storage::StorageError::io)?;
//! let mut editor = FilesEditor::new(files, staging.path());
//! editor.write("autoapi/foo.md", "::: foo\n")?;
//! # Ok::<(), autoapi_storage::StorageError>(())
//! ```

mod discovery;
mod editor;
mod error;
mod file;
mod fs;

pub use discovery::discover_files;
pub use editor::{FilesEditor, OpenMode};
pub use error::{Operation, StorageError, StorageErrorKind};
pub use file::{File, Files, INDEX_NAME};
pub use fs::write_if_changed;
