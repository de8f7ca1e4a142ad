//! Build error type.

use autoapi_config::ConfigError;
use autoapi_nav::NavError;
use autoapi_storage::StorageError;

/// Error aborting a documentation build.
///
/// Every failure of a generation pass ends up here with its original message;
/// a pass never produces partial output.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Malformed navigation path, literate file or configured navigation.
    #[error("{0}")]
    Nav(#[from] NavError),

    /// File discovery, staging or write failure.
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// Invalid configuration.
    #[error("{0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_keeps_original_message() {
        let err: BuildError = NavError::parse("autoapi/summary.md", 2, "link target is empty").into();

        assert_eq!(
            err.to_string(),
            "Invalid navigation in autoapi/summary.md, line 2: link target is empty"
        );
        assert!(matches!(err, BuildError::Nav(NavError::Parse { line: 2, .. })));
    }

    #[test]
    fn test_build_error_from_storage() {
        let err: BuildError = StorageError::not_found("missing.md").into();

        assert_eq!(err.to_string(), "not found (path: missing.md)");
    }
}
