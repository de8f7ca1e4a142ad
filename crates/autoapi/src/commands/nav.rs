//! `autoapi nav` command implementation.

use std::path::PathBuf;

use autoapi_config::{CliSettings, Config};
use autoapi_nav::NavNode;
use clap::{Args, ValueEnum};
use console::Term;

use crate::error::CliError;

/// Output format of the navigation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum NavFormat {
    #[default]
    Yaml,
    Json,
}

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    /// Path to configuration file (default: auto-discover autoapi.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source directory to document (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Documentation directory (overrides config).
    #[arg(short, long)]
    docs_dir: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t)]
    format: NavFormat,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl NavArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            docs_dir: self.docs_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let build = autoapi_site::build(&config)?;
        let text = format_nav(&build.nav, self.format)?;
        Term::stdout().write_line(text.trim_end())?;
        Ok(())
    }
}

fn format_nav(nav: &[NavNode], format: NavFormat) -> Result<String, CliError> {
    Ok(match format {
        NavFormat::Yaml => serde_yaml::to_string(nav)?,
        NavFormat::Json => serde_json::to_string_pretty(nav)?,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn nav() -> Vec<NavNode> {
        vec![NavNode::SectionPage {
            title: "bar".to_owned(),
            target: "autoapi/bar/index.md".to_owned(),
            children: vec![NavNode::Page {
                title: Some("baz".to_owned()),
                target: "autoapi/bar/baz.md".to_owned(),
            }],
        }]
    }

    #[test]
    fn test_format_nav_yaml() {
        let text = format_nav(&nav(), NavFormat::Yaml).unwrap();

        assert!(text.starts_with("- kind: section_page\n"));
        let value: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(value[0]["target"].as_str(), Some("autoapi/bar/index.md"));
        assert_eq!(value[0]["children"][0]["kind"].as_str(), Some("page"));
    }

    #[test]
    fn test_format_nav_json() {
        let text = format_nav(&nav(), NavFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["kind"], "section_page");
        assert_eq!(value[0]["children"][0]["title"], "baz");
    }
}
