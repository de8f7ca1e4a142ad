//! API documentation generation and navigation for autoapi.
//!
//! This crate provides:
//! - [`Generator`]: stub pages and a literate navigation file per source tree
//! - [`DocPathPlanner`]: mapping of source files to pages and titles
//! - [`NavResolver`]: expansion of directory placeholders in a navigation
//! - [`PathGlobber`]: glob matching over the documentation pages of a build
//! - [`build`]: the whole pipeline over a loaded [`autoapi_config::Config`]
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//!
//! use autoapi_config::{CliSettings, Config};
//!
//! let config = Config::load(None, Some(&CliSettings::default()))?;
//! let output = autoapi_site::build(&config)?;
//! let titles: Vec<_> = output.nav.iter().filter_map(|node| node.title()).collect();
//! assert!(titles.contains(&"API Reference"));
//! output.write_generated(Path::new("site/src"))?;
//! # Ok(())
//! # }
//! ```

mod edit_url;
mod error;
mod generator;
mod globber;
mod pipeline;
mod planner;
mod resolver;

pub use edit_url::edit_url;
pub use error::BuildError;
pub use generator::{Generation, Generator};
pub use globber::PathGlobber;
pub use pipeline::{BuildOutput, build};
pub use planner::{DocPathPlanner, DocPlan, PACKAGE_MARKER};
pub use resolver::{FilesNavSource, LiterateSource, NavResolver, dirname_to_title};
