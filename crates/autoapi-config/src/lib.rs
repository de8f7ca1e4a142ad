//! Configuration management for autoapi.
//!
//! Parses `autoapi.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `docs.docs_dir`
//! - `docs.repo_url`
//! - `docs.edit_uri`
//! - `autoapi.dir`

mod expand;

use std::path::{Component, Path, PathBuf};

use autoapi_nav::NavEntry;
use serde::Deserialize;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "autoapi.toml";

/// Section title used when `add_nav_entry = true`.
pub const DEFAULT_NAV_TITLE: &str = "API Reference";

/// Exclude patterns always applied to source discovery.
pub const DEFAULT_IGNORE: &[&str] = &["**/venv/**/*.py", "**/.venv/**/*.py"];

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the source directory to document.
    pub source_dir: Option<PathBuf>,
    /// Override the documentation directory.
    pub docs_dir: Option<PathBuf>,
    /// Override the keep files flag.
    pub keep_files: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documentation configuration as written in TOML.
    docs: DocsConfigRaw,
    /// API generation configuration as written in TOML.
    autoapi: AutoApiConfigRaw,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved API generation configuration (set after loading).
    #[serde(skip)]
    pub autoapi_resolved: AutoApiConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
    /// Directory of the config file, or the base directory of defaults.
    #[serde(skip)]
    pub project_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    docs_dir: Option<String>,
    nav: Option<Vec<NavEntry>>,
    nav_file: Option<String>,
    repo_url: Option<String>,
    edit_uri: Option<String>,
}

/// Resolved documentation configuration.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Documentation source tree.
    pub docs_dir: PathBuf,
    /// Configured navigation; empty means "infer everything".
    pub nav: Vec<NavEntry>,
    /// Name of the literate navigation file looked up in each directory.
    pub nav_file: String,
    /// Repository URL for "edit this page" links.
    pub repo_url: Option<String>,
    /// Path of the edit view relative to `repo_url`.
    pub edit_uri: Option<String>,
}

/// Raw API generation configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct AutoApiConfigRaw {
    dir: Option<String>,
    file_patterns: Option<Vec<String>>,
    ignore: Option<Vec<String>>,
    root: Option<String>,
    keep_files: Option<bool>,
    add_nav_entry: Option<AddNavEntry>,
}

/// Resolved API generation configuration.
#[derive(Debug)]
pub struct AutoApiConfig {
    /// Source root to document.
    pub dir: PathBuf,
    /// Include patterns; earlier patterns win for the same module.
    pub file_patterns: Vec<String>,
    /// Exclude patterns, including [`DEFAULT_IGNORE`].
    pub ignore: Vec<String>,
    /// Output root inside the documentation tree.
    pub root: String,
    /// Mirror generated files into the documentation tree.
    pub keep_files: bool,
    /// Whether and under which title the output root joins the navigation.
    pub add_nav_entry: AddNavEntry,
}

impl Default for AutoApiConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            file_patterns: default_file_patterns(),
            ignore: with_default_ignore(Vec::new()),
            root: "autoapi".to_owned(),
            keep_files: false,
            add_nav_entry: AddNavEntry::default(),
        }
    }
}

impl AutoApiConfig {
    /// Navigation placeholder of the output root (`"autoapi/"`).
    #[must_use]
    pub fn root_placeholder(&self) -> String {
        if self.root.ends_with('/') {
            self.root.clone()
        } else {
            format!("{}/", self.root)
        }
    }
}

/// `add_nav_entry` setting: a flag or an explicit section title.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AddNavEntry {
    /// `true` adds a section titled [`DEFAULT_NAV_TITLE`].
    Enabled(bool),
    /// Adds a section with this title.
    Title(String),
}

impl Default for AddNavEntry {
    fn default() -> Self {
        Self::Enabled(true)
    }
}

impl AddNavEntry {
    /// Title of the section to add, or `None` when disabled.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Enabled(true) => Some(DEFAULT_NAV_TITLE),
            Self::Enabled(false) => None,
            Self::Title(title) => Some(title),
        }
    }
}

fn default_file_patterns() -> Vec<String> {
    vec!["*.py".to_owned(), "*.pyi".to_owned()]
}

fn with_default_ignore(mut ignore: Vec<String>) -> Vec<String> {
    for pattern in DEFAULT_IGNORE {
        if !ignore.iter().any(|p| p == pattern) {
            ignore.push((*pattern).to_owned());
        }
    }
    ignore
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`docs.repo_url`").
        field: String,
        /// Error message (e.g., "${`REPO_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Require a path field to stay inside the directory it's relative to.
fn require_relative(path: &str, field: &str) -> Result<(), ConfigError> {
    let escapes = Path::new(path)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(ConfigError::Validation(format!(
            "{field} must be a relative path without '..'"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `autoapi.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.autoapi_resolved.dir.clone_from(source_dir);
        }
        if let Some(docs_dir) = &settings.docs_dir {
            self.docs_resolved.docs_dir.clone_from(docs_dir);
        }
        if let Some(keep_files) = settings.keep_files {
            self.autoapi_resolved.keep_files = keep_files;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    #[must_use]
    pub fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsConfigRaw::default(),
            autoapi: AutoApiConfigRaw::default(),
            docs_resolved: DocsConfig {
                docs_dir: base.join("docs"),
                nav: Vec::new(),
                nav_file: "summary.md".to_owned(),
                repo_url: None,
                edit_uri: None,
            },
            autoapi_resolved: AutoApiConfig {
                dir: base.to_path_buf(),
                ..AutoApiConfig::default()
            },
            config_path: None,
            project_dir: base.to_path_buf(),
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());
        config.project_dir = config_dir.to_path_buf();

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_docs()?;
        self.validate_autoapi()?;
        Ok(())
    }

    fn validate_docs(&self) -> Result<(), ConfigError> {
        let docs = &self.docs_resolved;
        require_non_empty(&docs.nav_file, "docs.nav_file")?;
        if docs.nav_file.contains('/') {
            return Err(ConfigError::Validation(
                "docs.nav_file must be a file name, not a path".to_owned(),
            ));
        }
        if let Some(repo_url) = &docs.repo_url {
            require_http_url(repo_url, "docs.repo_url")?;
        }
        Ok(())
    }

    fn validate_autoapi(&self) -> Result<(), ConfigError> {
        let autoapi = &self.autoapi_resolved;
        require_non_empty(autoapi.root.trim_end_matches('/'), "autoapi.root")?;
        require_relative(&autoapi.root, "autoapi.root")?;
        if autoapi.file_patterns.is_empty() {
            return Err(ConfigError::Validation(
                "autoapi.file_patterns cannot be empty".to_owned(),
            ));
        }
        for pattern in &autoapi.file_patterns {
            require_non_empty(pattern, "autoapi.file_patterns")?;
        }
        if let AddNavEntry::Title(title) = &autoapi.add_nav_entry {
            require_non_empty(title, "autoapi.add_nav_entry")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let expand_opt = |value: &mut Option<String>, field: &str| -> Result<(), ConfigError> {
            if let Some(v) = value {
                *v = expand::expand_env(v, field)?;
            }
            Ok(())
        };

        expand_opt(&mut self.docs.docs_dir, "docs.docs_dir")?;
        expand_opt(&mut self.docs.repo_url, "docs.repo_url")?;
        expand_opt(&mut self.docs.edit_uri, "docs.edit_uri")?;
        expand_opt(&mut self.autoapi.dir, "autoapi.dir")?;

        Ok(())
    }

    /// Resolve relative paths against the config directory and fill defaults.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            docs_dir: resolve(self.docs.docs_dir.as_deref(), "docs"),
            nav: self.docs.nav.clone().unwrap_or_default(),
            nav_file: self
                .docs
                .nav_file
                .clone()
                .unwrap_or_else(|| "summary.md".to_owned()),
            repo_url: self.docs.repo_url.clone(),
            edit_uri: self.docs.edit_uri.clone(),
        };

        self.autoapi_resolved = AutoApiConfig {
            dir: resolve(self.autoapi.dir.as_deref(), "."),
            file_patterns: self
                .autoapi
                .file_patterns
                .clone()
                .unwrap_or_else(default_file_patterns),
            ignore: with_default_ignore(self.autoapi.ignore.clone().unwrap_or_default()),
            root: self
                .autoapi
                .root
                .clone()
                .unwrap_or_else(|| "autoapi".to_owned()),
            keep_files: self.autoapi.keep_files.unwrap_or(false),
            add_nav_entry: self.autoapi.add_nav_entry.clone().unwrap_or_default(),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn resolved(toml: &str) -> Config {
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));

        assert_eq!(config.project_dir, PathBuf::from("/test"));
        assert_eq!(config.docs_resolved.docs_dir, PathBuf::from("/test/docs"));
        assert_eq!(config.docs_resolved.nav_file, "summary.md");
        assert!(config.docs_resolved.nav.is_empty());
        assert_eq!(config.autoapi_resolved.dir, PathBuf::from("/test"));
        assert_eq!(config.autoapi_resolved.file_patterns, vec!["*.py", "*.pyi"]);
        assert_eq!(
            config.autoapi_resolved.ignore,
            vec!["**/venv/**/*.py", "**/.venv/**/*.py"]
        );
        assert_eq!(config.autoapi_resolved.root, "autoapi");
        assert!(!config.autoapi_resolved.keep_files);
        assert_eq!(
            config.autoapi_resolved.add_nav_entry.title(),
            Some("API Reference")
        );
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = resolved("");

        assert_eq!(config.docs_resolved.docs_dir, PathBuf::from("/project/docs"));
        assert_eq!(config.autoapi_resolved.dir, PathBuf::from("/project/."));
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_full_config() {
        let config = resolved(
            r#"
[docs]
docs_dir = "site-docs"
nav = ["index.md", { "Guide" = "guide/" }]
nav_file = "SUMMARY.md"
repo_url = "https://github.com/org/project"
edit_uri = "edit/main/"

[autoapi]
dir = "src"
file_patterns = ["*.pyi", "*.py"]
ignore = ["tests/*"]
root = "reference"
keep_files = true
add_nav_entry = "Modules"
"#,
        );

        assert_eq!(
            config.docs_resolved.docs_dir,
            PathBuf::from("/project/site-docs")
        );
        assert_eq!(
            config.docs_resolved.nav,
            vec![
                NavEntry::link("index.md"),
                NavEntry::titled("Guide", "guide/"),
            ]
        );
        assert_eq!(config.docs_resolved.nav_file, "SUMMARY.md");
        assert_eq!(
            config.docs_resolved.repo_url.as_deref(),
            Some("https://github.com/org/project")
        );
        assert_eq!(config.docs_resolved.edit_uri.as_deref(), Some("edit/main/"));

        let autoapi = &config.autoapi_resolved;
        assert_eq!(autoapi.dir, PathBuf::from("/project/src"));
        assert_eq!(autoapi.file_patterns, vec!["*.pyi", "*.py"]);
        assert_eq!(
            autoapi.ignore,
            vec!["tests/*", "**/venv/**/*.py", "**/.venv/**/*.py"]
        );
        assert_eq!(autoapi.root, "reference");
        assert!(autoapi.keep_files);
        assert_eq!(autoapi.add_nav_entry.title(), Some("Modules"));
        config.validate().unwrap();
    }

    #[test]
    fn test_default_ignore_not_duplicated() {
        let config = resolved(
            r#"
[autoapi]
ignore = ["**/.venv/**/*.py"]
"#,
        );

        assert_eq!(
            config.autoapi_resolved.ignore,
            vec!["**/.venv/**/*.py", "**/venv/**/*.py"]
        );
    }

    #[test]
    fn test_add_nav_entry_disabled() {
        let config = resolved(
            r"
[autoapi]
add_nav_entry = false
",
        );

        assert_eq!(config.autoapi_resolved.add_nav_entry.title(), None);
    }

    #[test]
    fn test_root_placeholder() {
        let mut config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.autoapi_resolved.root_placeholder(), "autoapi/");

        config.autoapi_resolved.root = "api/".to_owned();
        assert_eq!(config.autoapi_resolved.root_placeholder(), "api/");
    }

    #[test]
    fn test_validate_rejects_escaping_root() {
        let config = resolved(
            r#"
[autoapi]
root = "../outside"
"#,
        );

        let err = config.validate().unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("autoapi.root"));
    }

    #[test]
    fn test_validate_rejects_empty_patterns() {
        let config = resolved(
            r"
[autoapi]
file_patterns = []
",
        );

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("file_patterns"));
    }

    #[test]
    fn test_validate_rejects_non_http_repo_url() {
        let config = resolved(
            r#"
[docs]
repo_url = "git@github.com:org/project.git"
"#,
        );

        let err = config.validate().unwrap_err();

        assert_eq!(
            err.to_string(),
            "Configuration error: docs.repo_url must start with http:// or https://"
        );
    }

    #[test]
    fn test_validate_rejects_nav_file_path() {
        let config = resolved(
            r#"
[docs]
nav_file = "nav/summary.md"
"#,
        );

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_nav_entry_is_parse_error() {
        let result: Result<Config, _> = toml::from_str(
            r#"
[docs]
nav = [{ "A" = "a.md", "B" = "b.md" }]
"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            source_dir: Some(PathBuf::from("/src")),
            keep_files: Some(true),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.autoapi_resolved.dir, PathBuf::from("/src"));
        assert!(config.autoapi_resolved.keep_files);
        assert_eq!(config.docs_resolved.docs_dir, PathBuf::from("/test/docs")); // Unchanged
    }

    #[test]
    fn test_load_explicit_path_not_found() {
        let result = Config::load(Some(Path::new("/nonexistent/autoapi.toml")), None);

        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
[docs]
docs_dir = "documentation"

[autoapi]
dir = "${AUTOAPI_TEST_LOAD_DIR:-src}"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(
            config.docs_resolved.docs_dir,
            dir.path().join("documentation")
        );
        assert_eq!(config.autoapi_resolved.dir, dir.path().join("src"));
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.project_dir, dir.path());
    }

    #[test]
    fn test_load_from_file_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[autoapi]\nroot = \"\"\n").unwrap();

        let result = Config::load(Some(&path), None);

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
