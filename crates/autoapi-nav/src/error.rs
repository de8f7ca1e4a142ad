//! Navigation error types.

/// Error raised by a malformed navigation path, literate navigation file or
/// configured navigation.
///
/// Every variant is a configuration problem: it is surfaced to the caller and
/// never recovered from silently.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// A title path without any segments.
    #[error("Navigation path must not be empty")]
    EmptyPath,

    /// A title path containing an empty segment.
    #[error("Navigation name parts must not be empty (got {parts:?})")]
    EmptySegment {
        /// The offending title path.
        parts: Vec<String>,
    },

    /// A literate navigation file that is not a valid nested bullet list.
    #[error("Invalid navigation in {file}, line {line}: {message}")]
    Parse {
        /// Logical path of the literate navigation file.
        file: String,
        /// One-based line number.
        line: usize,
        /// What is wrong with the line.
        message: String,
    },

    /// A glob pattern that cannot be compiled.
    #[error("Invalid glob pattern {pattern:?}: {message}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Reason reported by the glob compiler.
        message: String,
    },

    /// A directory placeholder that expands to nothing.
    #[error("Directory {dir:?} in navigation {reason}")]
    Directory {
        /// Directory path relative to the docs root.
        dir: String,
        /// Why the directory could not be expanded.
        reason: String,
    },
}

impl NavError {
    /// Create a parse error for a literate navigation file.
    #[must_use]
    pub fn parse(file: &str, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.to_owned(),
            line,
            message: message.into(),
        }
    }

    /// Create a directory expansion error.
    #[must_use]
    pub fn directory(dir: &str, reason: impl Into<String>) -> Self {
        Self::Directory {
            dir: dir.to_owned(),
            reason: reason.into(),
        }
    }
}
