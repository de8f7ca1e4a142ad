//! Storage error type.
//!
//! A [`StorageError`] says what went wrong ([`StorageErrorKind`]), which
//! step of a build was running ([`Operation`]) and the path involved:
//!
//! ```text
//! staging generated files: permission denied: Permission denied (os error 13) (path: /tmp/autoapi1/api)
//! ```

use std::fmt;
use std::path::PathBuf;

/// What went wrong.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// A source directory, documentation file or logical path doesn't exist.
    NotFound,
    /// The file system refused access.
    PermissionDenied,
    /// A logical path is empty or leaves the documentation root (`../x.md`).
    OutsideRoot,
    /// An include, exclude or scan glob doesn't compile.
    InvalidPattern,
    /// Any other I/O failure.
    Io,
}

impl fmt::Display for StorageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotFound => "not found",
            Self::PermissionDenied => "permission denied",
            Self::OutsideRoot => "path outside the documentation root",
            Self::InvalidPattern => "invalid glob pattern",
            Self::Io => "I/O error",
        })
    }
}

/// Build step during which an error occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Searching the source tree for files to document.
    Discover,
    /// Listing the documentation tree.
    Scan,
    /// Copying or creating files in the staging directory.
    Stage,
    /// Reading or writing a file through the editor.
    Edit,
    /// Writing generated files into a real directory.
    Mirror,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Discover => "discovering source files",
            Self::Scan => "scanning documentation",
            Self::Stage => "staging generated files",
            Self::Edit => "editing documentation files",
            Self::Mirror => "writing generated files",
        })
    }
}

/// File access failure of a build.
#[derive(Debug)]
pub struct StorageError {
    /// What went wrong.
    pub kind: StorageErrorKind,
    /// File, directory, logical path or pattern involved.
    pub path: Option<PathBuf>,
    /// Step that failed, when known.
    pub operation: Option<Operation>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            operation: None,
            source: None,
        }
    }

    /// `path` doesn't exist.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).at(path)
    }

    /// The logical path `name` is empty or escapes the documentation root.
    #[must_use]
    pub fn outside_root(name: &str) -> Self {
        Self::new(StorageErrorKind::OutsideRoot).at(name)
    }

    /// `pattern` failed to compile.
    #[must_use]
    pub fn invalid_pattern(pattern: &str, err: glob::PatternError) -> Self {
        Self {
            source: Some(Box::new(err)),
            ..Self::new(StorageErrorKind::InvalidPattern).at(pattern)
        }
    }

    /// Classify an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            _ => StorageErrorKind::Io,
        };
        Self {
            source: Some(Box::new(err)),
            ..Self::new(kind)
        }
    }

    /// Record the path involved.
    #[must_use]
    pub fn at(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Record the failing step.
    #[must_use]
    pub fn during(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = self.operation {
            write!(f, "{operation}: ")?;
        }
        write!(f, "{}", self.kind)?;
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}
