//! Virtual file editing for a documentation build.
//!
//! [`FilesEditor`] lets the generation pass write pages under logical
//! documentation paths (`"autoapi/pkg/mod.md"`) while the bytes land in a
//! staging directory. The documentation tree itself is never modified: an
//! existing file opened for writing or appending is first copied into the
//! staging directory.
//!
//! The editor is an explicit handle. Code that needs virtual file access
//! receives `&mut FilesEditor` as an argument.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::error::{Operation, StorageError};
use crate::file::{File, Files};

/// How a virtual file is opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenMode {
    /// Read existing content.
    Read,
    /// Create or truncate.
    Write,
    /// Append to existing content, creating the file when missing.
    Append,
}

/// Editor over the files of one documentation build.
#[derive(Debug)]
pub struct FilesEditor {
    files: BTreeMap<String, File>,
    directory: PathBuf,
    edit_paths: BTreeMap<String, Option<String>>,
}

impl FilesEditor {
    /// Create an editor over `files`, staging writes under `directory`.
    #[must_use]
    pub fn new(files: Files, directory: impl Into<PathBuf>) -> Self {
        let files = files
            .into_iter()
            .map(|f| (f.src_uri().to_owned(), f))
            .collect();
        Self {
            files,
            directory: directory.into(),
            edit_paths: BTreeMap::new(),
        }
    }

    /// Open the file at logical path `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if `name` escapes the documentation root, the
    /// file doesn't exist (read mode), or the underlying I/O fails.
    pub fn open(&mut self, name: &str, mode: OpenMode) -> Result<fs::File, StorageError> {
        let name = normalize_uri(name)?;
        let path = match mode {
            OpenMode::Read => self
                .files
                .get(&name)
                .map(|f| f.abs_src_path().to_path_buf())
                .ok_or_else(|| StorageError::not_found(&name).during(Operation::Edit))?,
            OpenMode::Write => self.stage(&name, true)?,
            OpenMode::Append => self.stage(&name, false)?,
        };

        let mut options = fs::OpenOptions::new();
        match mode {
            OpenMode::Read => options.read(true),
            OpenMode::Write => options.write(true).create(true).truncate(true),
            OpenMode::Append => options.append(true).create(true),
        };
        options
            .open(&path)
            .map_err(|e| StorageError::io(e).at(path).during(Operation::Edit))
    }

    /// Replace the content of the file at logical path `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file can't be staged or written.
    pub fn write(&mut self, name: &str, content: &str) -> Result<(), StorageError> {
        let mut file = self.open(name, OpenMode::Write)?;
        file.write_all(content.as_bytes())
            .map_err(|e| StorageError::io(e).at(name).during(Operation::Edit))
    }

    /// Read the content of the file at logical path `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file is unknown or can't be read.
    pub fn read(&self, name: &str) -> Result<String, StorageError> {
        let name = normalize_uri(name)?;
        let file = self
            .files
            .get(&name)
            .ok_or_else(|| StorageError::not_found(&name).during(Operation::Edit))?;
        fs::read_to_string(file.abs_src_path()).map_err(|e| {
            StorageError::io(e)
                .at(file.abs_src_path())
                .during(Operation::Edit)
        })
    }

    /// Record the source file an "edit this page" link of `name` should point to.
    pub fn set_edit_path(&mut self, name: &str, edit_name: Option<&str>) {
        let name = name.replace('\\', "/");
        self.edit_paths
            .insert(name, edit_name.map(|e| e.replace('\\', "/")));
    }

    /// Edit paths recorded for files written through this editor.
    #[must_use]
    pub fn edit_paths(&self) -> &BTreeMap<String, Option<String>> {
        &self.edit_paths
    }

    /// Current file set, index pages first at every level.
    #[must_use]
    pub fn files(&self) -> Files {
        let mut files: Vec<File> = self.files.values().cloned().collect();
        files.sort_by(File::sort_cmp);
        Files::new(files)
    }

    /// Register `name` as a staged file and return where to write it.
    ///
    /// A `new` file is always (re)created in staging. Otherwise an existing
    /// file outside staging is copied there first so its content survives.
    fn stage(&mut self, name: &str, new: bool) -> Result<PathBuf, StorageError> {
        let staged = File::generated(name, &self.directory);
        let path = staged.abs_src_path().to_path_buf();

        let copy_from = match self.files.get(name) {
            Some(existing) if existing.abs_src_path() == path => return Ok(path),
            Some(existing) if !new => Some(existing.abs_src_path().to_path_buf()),
            _ => None,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::io(e).at(parent).during(Operation::Stage)
            })?;
        }
        if let Some(source) = copy_from {
            fs::copy(&source, &path)
                .map_err(|e| StorageError::io(e).at(source).during(Operation::Stage))?;
        }

        self.files.insert(name.to_owned(), staged);
        self.edit_paths.entry(name.to_owned()).or_insert(None);
        Ok(path)
    }
}

/// Normalize a logical path to slash-separated form without `.` segments.
fn normalize_uri(name: &str) -> Result<String, StorageError> {
    let name = name.replace('\\', "/");
    let mut parts = Vec::new();
    for part in name.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                return Err(StorageError::outside_root(&name).during(Operation::Edit));
            }
            part => parts.push(part),
        }
    }
    if parts.is_empty() {
        return Err(StorageError::outside_root(&name).during(Operation::Edit));
    }
    Ok(parts.join("/"))
}
