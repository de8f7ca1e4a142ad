//! Navigation model for autoapi.
//!
//! This crate provides:
//! - [`NavTree`]: ordered section tree built from title paths, rendered as a
//!   literate navigation list
//! - [`parse_literate`]: parser for literate navigation files
//! - [`NavEntry`]: navigation entries as written in configuration
//! - [`NavNode`] and [`merge_section_pages`]: the resolved navigation handed
//!   to the site renderer
//!
//! # Example
//!
//! ```
//! use autoapi_nav::{NavTree, parse_literate};
//!
//! let mut nav = NavTree::new();
//! nav.set(["foo"], "foo.md")?;
//! nav.set(["bar"], "bar/index.md")?;
//! nav.set(["bar", "baz"], "bar/baz.md")?;
//!
//! let text = nav.render_to_string(0);
//! assert_eq!(text, "* [foo](foo.md)\n* [bar](bar/index.md)\n    * [baz](bar/baz.md)\n");
//!
//! let items = parse_literate(&text, "summary.md")?;
//! assert_eq!(items[1].children.len(), 1);
//! # Ok::<(), autoapi_nav::NavError>(())
//! ```

mod entry;
mod error;
mod literate;
mod section;
mod tree;

pub use entry::NavEntry;
pub use error::NavError;
pub use literate::{LiterateItem, escape_title, parse_literate, unescape_title};
pub use section::{NavNode, merge_section_pages};
pub use tree::{Flatten, INDENT_WIDTH, NavItem, NavTree};
