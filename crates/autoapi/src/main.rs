//! autoapi CLI - API reference generation.
//!
//! Provides commands for:
//! - `generate`: Generate API pages and write them to an output directory
//! - `nav`: Print the resolved navigation

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{GenerateArgs, NavArgs};
use output::Output;

/// autoapi - API reference pages and navigation from source trees.
#[derive(Parser)]
#[command(name = "autoapi", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate API pages.
    Generate(GenerateArgs),
    /// Print the resolved navigation.
    Nav(NavArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Generate(args) => args.verbose,
        Commands::Nav(args) => args.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Generate(args) => args.execute(),
        Commands::Nav(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
