//! CLI error types.

use autoapi_config::ConfigError;
use autoapi_site::BuildError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize navigation: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to serialize navigation: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
