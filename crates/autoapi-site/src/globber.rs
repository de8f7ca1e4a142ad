//! Glob matching over the documentation pages of a build.
//!
//! [`PathGlobber`] indexes page paths once and answers directory, pattern and
//! index page queries without touching the filesystem. Paths are stored with
//! a leading `/` so the root directory has a key of its own (`"/"`); results
//! are returned without it.

use std::collections::{BTreeMap, BTreeSet};

use autoapi_nav::NavError;
use autoapi_storage::{File, INDEX_NAME};
use glob::{MatchOptions, Pattern};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Flat index of pages, their ancestor directories and index pages.
#[derive(Debug, Default)]
pub struct PathGlobber {
    files: BTreeSet<String>,
    dirs: BTreeSet<String>,
    index_dirs: BTreeMap<String, String>,
}

impl PathGlobber {
    /// Index the documentation pages among `files`.
    ///
    /// Other files (images, stylesheets) are ignored.
    pub fn new<'a>(files: impl IntoIterator<Item = &'a File>) -> Self {
        let mut globber = Self::default();
        for file in files {
            if file.is_documentation_page() {
                globber.add_page(file);
            }
        }
        globber
    }

    fn add_page(&mut self, file: &File) {
        let path = absolute(file.src_uri());
        let parent = parent_of(&path).to_owned();

        if file.name() == INDEX_NAME {
            // index.md wins over README.md in the same directory
            let prefer = file.src_uri().rsplit('/').next().is_some_and(|base| {
                base.rsplit_once('.').map_or(base, |(stem, _)| stem) == INDEX_NAME
            });
            if prefer || !self.index_dirs.contains_key(&parent) {
                self.index_dirs.insert(parent.clone(), path.clone());
            }
        }

        let mut dir = parent;
        loop {
            let next = parent_of(&dir).to_owned();
            let is_root = dir == "/";
            self.dirs.insert(dir);
            if is_root {
                break;
            }
            dir = next;
        }
        self.files.insert(path);
    }

    /// True if `path` is the root or an ancestor directory of a page.
    #[must_use]
    pub fn is_directory(&self, path: &str) -> bool {
        self.dirs.contains(&absolute(path))
    }

    /// True if `path` is an indexed page.
    #[must_use]
    pub fn has_file(&self, path: &str) -> bool {
        self.files.contains(&absolute(path))
    }

    /// Pages and directories matching `pattern`, pages first.
    ///
    /// Each `/`-separated segment of the pattern is a shell-style glob matched
    /// against one path segment, so `docs/*` matches `docs/a.md` and `docs/sub`
    /// but never `docs/sub/b.md`.
    /// A run of stars is a single `*`: `api/foo**` is `api/foo*`.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::Pattern`] when a segment is not a valid glob.
    pub fn matches<'a>(
        &'a self,
        pattern: &str,
    ) -> Result<impl Iterator<Item = &'a str> + use<'a>, NavError> {
        let globs = segments(pattern)
            .map(|segment| {
                Pattern::new(&collapse_stars(segment)).map_err(|e| NavError::Pattern {
                    pattern: pattern.to_owned(),
                    message: e.msg.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let matched = self
            .files
            .iter()
            .chain(&self.dirs)
            .filter(move |path| {
                let parts: Vec<&str> = segments(path).collect();
                parts.len() == globs.len()
                    && parts
                        .iter()
                        .zip(&globs)
                        .all(|(part, glob)| glob.matches_with(part, MATCH_OPTIONS))
            })
            .map(|path| &path[1..]);
        Ok(matched)
    }

    /// Index page of directory `root`, if it has one.
    #[must_use]
    pub fn find_index_page(&self, root: &str) -> Option<&str> {
        self.index_dirs.get(&absolute(root)).map(|path| &path[1..])
    }
}

/// Non-empty, non-`.` segments of a slash-separated path.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty() && *s != ".")
}

/// Collapse runs of `*` so a segment reads as a shell glob, not a recursive one.
fn collapse_stars(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Normalize `path` to its indexed form with a single leading slash.
fn absolute(path: &str) -> String {
    let parts: Vec<&str> = segments(path).collect();
    format!("/{}", parts.join("/"))
}

/// Parent of an indexed path; the root is its own parent.
fn parent_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(idx) => &path[..idx],
    }
}
