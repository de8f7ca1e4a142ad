//! `autoapi generate` command implementation.

use std::path::PathBuf;

use autoapi_config::{CliSettings, Config};
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the generate command.
#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Path to configuration file (default: auto-discover autoapi.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source directory to document (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Documentation directory (overrides config).
    #[arg(short, long)]
    docs_dir: Option<PathBuf>,

    /// Also write generated pages into the documentation directory.
    #[arg(long)]
    keep_files: bool,

    /// Directory to copy generated pages to (default: .autoapi/build/).
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl GenerateArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            docs_dir: self.docs_dir,
            keep_files: self.keep_files.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let out_dir = self
            .out_dir
            .unwrap_or_else(|| config.project_dir.join(".autoapi/build"));

        output.field("Source", config.autoapi_resolved.dir.display());
        output.field("Docs", config.docs_resolved.docs_dir.display());
        output.field("Output", out_dir.display());

        let build = autoapi_site::build(&config)?;
        if build.plans.is_empty() {
            output.warning("No source files found to document");
        }
        if self.verbose {
            output.pages(&config.autoapi_resolved.root, &build.plans);
        }
        let written = build.write_generated(&out_dir)?;
        if config.autoapi_resolved.keep_files {
            output.field(
                "Kept",
                config
                    .docs_resolved
                    .docs_dir
                    .join(&config.autoapi_resolved.root)
                    .display(),
            );
        }

        output.done(&format!(
            "Generated {} pages, {written} files updated",
            build.plans.len()
        ));
        Ok(())
    }
}
