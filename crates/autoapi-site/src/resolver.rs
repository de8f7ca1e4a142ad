//! Resolution of directory placeholders in a configured navigation.
//!
//! A configured navigation may point at directories (`"guide/"`) and glob
//! patterns (`"api/*"`) instead of pages. [`NavResolver`] replaces each
//! directory by the content of its literate navigation file when it has one,
//! and by a listing of its pages and subdirectories otherwise. Literate files
//! may point at further directories; those are resolved the same way.
//!
//! Listings put a directory's index page first, then its other pages, then
//! its subdirectories, each group in name order. A page placed explicitly is
//! not repeated by a later listing or pattern.

use std::collections::{BTreeMap, HashSet};
use std::fs;

use autoapi_nav::{LiterateItem, NavEntry, NavError, parse_literate};
use autoapi_storage::{Files, StorageError};

use crate::error::BuildError;
use crate::globber::PathGlobber;

/// Lookup of literate navigation files.
pub trait LiterateSource {
    /// File name of literate navigation files (`"summary.md"`).
    fn nav_file_name(&self) -> &str;

    /// Content of the literate navigation file directly in `dir`.
    ///
    /// `dir` is relative to the documentation root, `""` for the root itself.
    /// Returns the file name and its text, or `None` if there is no such file.
    fn literate_nav(&self, dir: &str) -> Result<Option<(String, String)>, StorageError>;
}

/// [`LiterateSource`] backed by the files of a build.
#[derive(Debug)]
pub struct FilesNavSource<'a> {
    files: &'a Files,
    nav_file: &'a str,
}

impl<'a> FilesNavSource<'a> {
    /// Look up `nav_file` among `files`.
    #[must_use]
    pub fn new(files: &'a Files, nav_file: &'a str) -> Self {
        Self { files, nav_file }
    }
}

impl LiterateSource for FilesNavSource<'_> {
    fn nav_file_name(&self) -> &str {
        self.nav_file
    }

    fn literate_nav(&self, dir: &str) -> Result<Option<(String, String)>, StorageError> {
        let Some(file) = self.files.get(&join_dir(dir, self.nav_file)) else {
            return Ok(None);
        };
        let text = fs::read_to_string(file.abs_src_path())
            .map_err(|e| StorageError::io(e).at(file.abs_src_path()))?;
        Ok(Some((self.nav_file.to_owned(), text)))
    }
}

/// Navigation item awaiting resolution.
#[derive(Debug)]
enum Pending {
    /// A page or external link, kept as is.
    Page {
        title: Option<String>,
        target: String,
    },
    /// A directory to expand.
    Directory { title: Option<String>, dir: String },
    /// A glob pattern; `only_dirs` for patterns ending in `/`.
    Wildcard {
        title: Option<String>,
        pattern: String,
        only_dirs: bool,
    },
    Section {
        title: String,
        children: Vec<Pending>,
    },
}

/// Expands directory placeholders and patterns of a configured navigation.
pub struct NavResolver<'a, S: LiterateSource + ?Sized> {
    source: &'a S,
    globber: &'a PathGlobber,
    dir_titles: BTreeMap<String, String>,
    seen: HashSet<String>,
}

impl<'a, S: LiterateSource + ?Sized> NavResolver<'a, S> {
    /// Create a resolver reading literate files from `source` and listing
    /// directories through `globber`.
    pub fn new(source: &'a S, globber: &'a PathGlobber) -> Self {
        Self {
            source,
            globber,
            dir_titles: BTreeMap::new(),
            seen: HashSet::new(),
        }
    }

    /// Title listings use for `dir` instead of one derived from its name.
    #[must_use]
    pub fn with_directory_title(mut self, dir: &str, title: impl Into<String>) -> Self {
        self.dir_titles
            .insert(dir.trim_matches('/').to_owned(), title.into());
        self
    }

    /// Resolve `nav` into a navigation of pages and sections only.
    ///
    /// An empty `nav` lists the whole documentation tree. A literate
    /// navigation file in the documentation root takes precedence over `nav`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Nav`] for a malformed literate file, a directory
    /// that doesn't exist, has no pages or would be expanded within itself,
    /// and [`BuildError::Storage`] if a literate file can't be read.
    pub fn resolve(&mut self, nav: &[NavEntry]) -> Result<Vec<NavEntry>, BuildError> {
        let stack = [String::new()];
        if nav.is_empty() || self.source.literate_nav("")?.is_some() {
            let entries = self.markdown_to_nav(&stack)?;
            if !entries.is_empty() || nav.is_empty() {
                return Ok(entries);
            }
        }

        let pending = nav.iter().map(|entry| self.config_item(entry)).collect();
        self.resolve_pending(pending, &stack)
    }

    /// Navigation of the last directory in `stack`.
    fn markdown_to_nav(&mut self, stack: &[String]) -> Result<Vec<NavEntry>, BuildError> {
        let root = stack.last().map_or("", String::as_str);

        if let Some((name, text)) = self.source.literate_nav(root)? {
            let file = join_dir(root, &name);
            let items = parse_literate(&text, &file)?;
            let pending = self.literate_items(&items, root, &file)?;
            let entries = self.resolve_pending(pending, stack)?;
            if !entries.is_empty() {
                return Ok(entries);
            }
            tracing::warn!(file = %file, "Navigation file lists no pages, listing the directory instead");
        }

        tracing::debug!(dir = root, "Inferring navigation");
        self.expand_wildcard(&join_dir(root, "*"), false, stack)
    }

    fn resolve_pending(
        &mut self,
        items: Vec<Pending>,
        stack: &[String],
    ) -> Result<Vec<NavEntry>, BuildError> {
        let mut resolved = Vec::new();
        for item in items {
            match item {
                Pending::Page { title, target } => resolved.push(NavEntry::Page { title, target }),
                Pending::Section { title, children } => {
                    let children = self.resolve_pending(children, stack)?;
                    if !children.is_empty() {
                        resolved.push(NavEntry::section(title, children));
                    }
                }
                Pending::Directory { title, dir } => {
                    let children = self.expand_directory(&dir, stack)?;
                    match title.or_else(|| self.directory_title(&dir)) {
                        Some(title) => resolved.push(NavEntry::section(title, children)),
                        None => resolved.extend(children),
                    }
                }
                Pending::Wildcard {
                    title,
                    pattern,
                    only_dirs,
                } => {
                    let children = self.expand_wildcard(&pattern, only_dirs, stack)?;
                    if children.is_empty() {
                        tracing::warn!(pattern = %pattern, "Navigation pattern matched no pages");
                        continue;
                    }
                    match title {
                        Some(title) => resolved.push(NavEntry::section(title, children)),
                        None => resolved.extend(children),
                    }
                }
            }
        }
        Ok(resolved)
    }

    fn expand_directory(
        &mut self,
        dir: &str,
        stack: &[String],
    ) -> Result<Vec<NavEntry>, BuildError> {
        if !self.globber.is_directory(dir) {
            return Err(NavError::directory(dir, "does not exist").into());
        }
        if stack.iter().any(|d| d == dir) {
            let chain: Vec<&str> = stack
                .iter()
                .map(String::as_str)
                .chain([dir])
                .map(|d| if d.is_empty() { "/" } else { d })
                .collect();
            return Err(NavError::directory(
                dir,
                format!("is expanded within itself ({})", chain.join(" -> ")),
            )
            .into());
        }

        let mut next = stack.to_vec();
        next.push(dir.to_owned());
        let children = self.markdown_to_nav(&next)?;
        if children.is_empty() {
            return Err(NavError::directory(dir, "has no pages to list").into());
        }
        Ok(children)
    }

    fn expand_wildcard(
        &mut self,
        pattern: &str,
        only_dirs: bool,
        stack: &[String],
    ) -> Result<Vec<NavEntry>, BuildError> {
        let mut matched: Vec<String> = self
            .globber
            .matches(pattern.trim_end_matches('/'))?
            .map(ToOwned::to_owned)
            .collect();
        matched.sort_by_cached_key(|path| self.listing_key(path));

        let source = self.source;
        let nav_file = source.nav_file_name();
        let mut entries = Vec::new();
        for path in matched {
            if self.seen.contains(&path) {
                continue;
            }
            if self.globber.is_directory(&path) {
                if stack.contains(&path) {
                    tracing::warn!(dir = %path, "Skipping directory already being listed");
                    continue;
                }
                let mut next = stack.to_vec();
                next.push(path.clone());
                let children = self.markdown_to_nav(&next)?;
                if !children.is_empty() {
                    let title = self.directory_title(&path).unwrap_or_default();
                    entries.push(NavEntry::section(title, children));
                }
            } else {
                if only_dirs || basename(&path) == nav_file {
                    continue;
                }
                entries.push(NavEntry::link(path.clone()));
            }
            self.seen.insert(path);
        }
        Ok(entries)
    }

    /// Listing order: per directory, index page, other pages, subdirectories.
    fn listing_key(&self, path: &str) -> (String, u8, String) {
        let parent = parent_dir(path);
        let rank = if self.globber.is_directory(path) {
            2
        } else if self.globber.find_index_page(parent) == Some(path) {
            0
        } else {
            1
        };
        (parent.to_owned(), rank, basename(path).to_owned())
    }

    fn directory_title(&self, dir: &str) -> Option<String> {
        if let Some(title) = self.dir_titles.get(dir) {
            return Some(title.clone());
        }
        let name = basename(dir);
        (!name.is_empty()).then(|| dirname_to_title(name))
    }

    /// Convert a configured entry; targets are relative to the root.
    fn config_item(&mut self, entry: &NavEntry) -> Pending {
        match entry {
            NavEntry::Section { title, children } => Pending::Section {
                title: title.clone(),
                children: children.iter().map(|c| self.config_item(c)).collect(),
            },
            NavEntry::Page { title, target } => {
                let title = title.clone();
                if is_url(target) {
                    Pending::Page {
                        title,
                        target: target.clone(),
                    }
                } else if target.contains('*') {
                    Pending::Wildcard {
                        title,
                        pattern: target.trim_start_matches('/').to_owned(),
                        only_dirs: target.ends_with('/'),
                    }
                } else if target.ends_with('/') {
                    Pending::Directory {
                        title,
                        dir: target.trim_matches('/').to_owned(),
                    }
                } else {
                    self.seen.insert(target.trim_start_matches('/').to_owned());
                    Pending::Page {
                        title,
                        target: target.clone(),
                    }
                }
            }
        }
    }

    /// Convert parsed literate items of the file `file` in directory `root`.
    fn literate_items(
        &mut self,
        items: &[LiterateItem],
        root: &str,
        file: &str,
    ) -> Result<Vec<Pending>, NavError> {
        let mut pending = Vec::with_capacity(items.len());
        for item in items {
            let children = self.literate_items(&item.children, root, file)?;
            let Some(target) = &item.target else {
                pending.push(Pending::Section {
                    title: item.title.clone().unwrap_or_default(),
                    children,
                });
                continue;
            };

            let link = self.literate_link(target, root, file, item.line)?;
            if children.is_empty() {
                pending.push(link.with_title(item.title.clone()));
                continue;
            }
            let Some(title) = item.title.clone() else {
                return Err(NavError::parse(
                    file,
                    item.line,
                    "a link with nested items needs a title",
                ));
            };
            let mut section = Vec::with_capacity(children.len() + 1);
            section.push(link);
            section.extend(children);
            pending.push(Pending::Section {
                title,
                children: section,
            });
        }
        Ok(pending)
    }

    fn literate_link(
        &mut self,
        target: &str,
        root: &str,
        file: &str,
        line: usize,
    ) -> Result<Pending, NavError> {
        if is_url(target) {
            return Ok(Pending::Page {
                title: None,
                target: target.to_owned(),
            });
        }

        let Some(path) = join_path(root, target) else {
            return Err(NavError::parse(
                file,
                line,
                format!("link target {target:?} points outside the documentation root"),
            ));
        };

        if target.contains('*') {
            return Ok(Pending::Wildcard {
                title: None,
                pattern: path,
                only_dirs: target.ends_with('/'),
            });
        }
        let page = path.split_once('#').map_or(path.as_str(), |(page, _)| page);
        if !target.ends_with('/') && self.globber.has_file(page) {
            self.seen.insert(page.to_owned());
            return Ok(Pending::Page {
                title: None,
                target: path,
            });
        }
        if self.globber.is_directory(&path) {
            return Ok(Pending::Directory {
                title: None,
                dir: path,
            });
        }
        Err(NavError::parse(
            file,
            line,
            format!("link target {target:?} is neither a page nor a directory"),
        ))
    }
}

impl Pending {
    fn with_title(self, title: Option<String>) -> Self {
        match self {
            Self::Page { target, .. } => Self::Page { title, target },
            Self::Directory { dir, .. } => Self::Directory { title, dir },
            Self::Wildcard {
                pattern, only_dirs, ..
            } => Self::Wildcard {
                title,
                pattern,
                only_dirs,
            },
            section @ Self::Section { .. } => section,
        }
    }
}

/// Section title for a directory name: `my_pkg` becomes `My pkg`.
///
/// Dashes and underscores become spaces; an all-lowercase name gets its first
/// letter capitalized, other names keep their case.
#[must_use]
pub fn dirname_to_title(name: &str) -> String {
    let title = name.replace(['-', '_'], " ");
    if title.to_lowercase() != title {
        return title;
    }
    let mut chars = title.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => title,
    }
}

fn is_url(target: &str) -> bool {
    target.contains("://") || target.starts_with("mailto:")
}

/// Path of `name` inside `dir`, `dir` being `""` for the root.
fn join_dir(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_owned()
    } else {
        format!("{dir}/{name}")
    }
}

/// Resolve `link` against directory `root`; `None` if it escapes the root.
fn join_path(root: &str, link: &str) -> Option<String> {
    let mut parts: Vec<&str> = if link.starts_with('/') {
        Vec::new()
    } else {
        root.split('/').filter(|s| !s.is_empty()).collect()
    };
    for segment in link.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            segment => parts.push(segment),
        }
    }
    Some(parts.join("/"))
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use autoapi_storage::File;
    use pretty_assertions::assert_eq;

    use super::*;

    /// Literate files keyed by their path.
    struct MapSource(BTreeMap<String, String>);

    impl LiterateSource for MapSource {
        fn nav_file_name(&self) -> &str {
            "summary.md"
        }

        fn literate_nav(&self, dir: &str) -> Result<Option<(String, String)>, StorageError> {
            Ok(self
                .0
                .get(&join_dir(dir, "summary.md"))
                .map(|text| ("summary.md".to_owned(), text.clone())))
        }
    }

    fn setup(pages: &[&str], literate: &[(&str, &str)]) -> (MapSource, PathGlobber) {
        let files: Vec<File> = pages
            .iter()
            .copied()
            .chain(literate.iter().map(|(path, _)| *path))
            .map(|uri| File::new(uri, Path::new("/docs")))
            .collect();
        let source = MapSource(
            literate
                .iter()
                .map(|(path, text)| ((*path).to_owned(), (*text).to_owned()))
                .collect(),
        );
        (source, PathGlobber::new(&files))
    }

    fn resolve(
        pages: &[&str],
        literate: &[(&str, &str)],
        nav: &[NavEntry],
    ) -> Result<Vec<NavEntry>, BuildError> {
        let (source, globber) = setup(pages, literate);
        NavResolver::new(&source, &globber).resolve(nav)
    }

    #[test]
    fn test_directory_with_literate_file() {
        let nav = resolve(
            &["index.md", "api/foo.md", "api/bar/index.md", "api/bar/baz.md"],
            &[(
                "api/summary.md",
                "* [foo](foo.md)\n* [bar](bar/index.md)\n    * [baz](bar/baz.md)\n",
            )],
            &[
                NavEntry::link("index.md"),
                NavEntry::titled("API Reference", "api/"),
            ],
        )
        .unwrap();

        assert_eq!(
            nav,
            vec![
                NavEntry::link("index.md"),
                NavEntry::section(
                    "API Reference",
                    vec![
                        NavEntry::titled("foo", "api/foo.md"),
                        NavEntry::section(
                            "bar",
                            vec![
                                NavEntry::link("api/bar/index.md"),
                                NavEntry::titled("baz", "api/bar/baz.md"),
                            ]
                        ),
                    ]
                ),
            ]
        );
    }

    #[test]
    fn test_empty_nav_lists_everything() {
        let nav = resolve(
            &[
                "index.md",
                "about.md",
                "user-guide/b.md",
                "user-guide/index.md",
                "user-guide/a.md",
                "user-guide/sub/x.md",
            ],
            &[],
            &[],
        )
        .unwrap();

        assert_eq!(
            nav,
            vec![
                NavEntry::link("index.md"),
                NavEntry::link("about.md"),
                NavEntry::section(
                    "User guide",
                    vec![
                        NavEntry::link("user-guide/index.md"),
                        NavEntry::link("user-guide/a.md"),
                        NavEntry::link("user-guide/b.md"),
                        NavEntry::section("Sub", vec![NavEntry::link("user-guide/sub/x.md")]),
                    ]
                ),
            ]
        );
    }

    #[test]
    fn test_root_literate_file_takes_precedence() {
        let nav = resolve(
            &["index.md", "other.md"],
            &[("summary.md", "* [Home](index.md)\n")],
            &[NavEntry::link("other.md")],
        )
        .unwrap();

        assert_eq!(nav, vec![NavEntry::titled("Home", "index.md")]);
    }

    #[test]
    fn test_empty_root_literate_file_lists_root() {
        let nav = resolve(
            &["index.md", "about.md"],
            &[("summary.md", "")],
            &[NavEntry::titled("About", "about.md")],
        )
        .unwrap();

        assert_eq!(
            nav,
            vec![NavEntry::link("index.md"), NavEntry::link("about.md")]
        );
    }

    #[test]
    fn test_wildcard_skips_explicit_pages() {
        let nav = resolve(
            &["guide/index.md", "guide/a.md", "guide/b.md"],
            &[],
            &[
                NavEntry::titled("B first", "guide/b.md"),
                NavEntry::titled("Rest", "guide/*"),
            ],
        )
        .unwrap();

        assert_eq!(
            nav,
            vec![
                NavEntry::titled("B first", "guide/b.md"),
                NavEntry::section(
                    "Rest",
                    vec![
                        NavEntry::link("guide/index.md"),
                        NavEntry::link("guide/a.md"),
                    ]
                ),
            ]
        );
    }

    #[test]
    fn test_wildcard_directories_only() {
        let nav = resolve(
            &["guide/a.md", "guide/setup/index.md"],
            &[],
            &[NavEntry::link("guide/*/")],
        )
        .unwrap();

        assert_eq!(
            nav,
            vec![NavEntry::section(
                "Setup",
                vec![NavEntry::link("guide/setup/index.md")]
            )]
        );
    }

    #[test]
    fn test_literate_wildcard_hides_nav_file() {
        let nav = resolve(
            &["index.md", "other.md"],
            &[("summary.md", "* [Home](index.md)\n* More\n    * [](*)\n")],
            &[],
        )
        .unwrap();

        assert_eq!(
            nav,
            vec![
                NavEntry::titled("Home", "index.md"),
                NavEntry::section("More", vec![NavEntry::link("other.md")]),
            ]
        );
    }

    #[test]
    fn test_literate_link_to_directory() {
        let nav = resolve(
            &["guide/intro.md"],
            &[("summary.md", "* [Guide](guide/)\n")],
            &[],
        )
        .unwrap();

        assert_eq!(
            nav,
            vec![NavEntry::section("Guide", vec![NavEntry::link("guide/intro.md")])]
        );
    }

    #[test]
    fn test_literate_unknown_target_names_file_and_line() {
        let err = resolve(
            &["api/foo.md"],
            &[("api/summary.md", "* [foo](foo.md)\n* [gone](gone.md)\n")],
            &[NavEntry::titled("API", "api/")],
        )
        .unwrap_err();

        assert!(matches!(
            &err,
            BuildError::Nav(NavError::Parse { file, line: 2, .. }) if file == "api/summary.md"
        ));
    }

    #[test]
    fn test_literate_bad_indentation() {
        let err = resolve(
            &["a.md", "b.md"],
            &[("summary.md", "* [a](a.md)\n  * [b](b.md)\n")],
            &[],
        )
        .unwrap_err();

        assert!(err.to_string().contains("summary.md, line 2"));
    }

    #[test]
    fn test_missing_directory_is_error() {
        let err = resolve(&["index.md"], &[], &[NavEntry::titled("API", "api/")]).unwrap_err();

        assert!(matches!(err, BuildError::Nav(NavError::Directory { ref dir, .. }) if dir == "api"));
    }

    #[test]
    fn test_directory_cycle_is_error() {
        let err = resolve(
            &["a/page.md", "index.md"],
            &[("a/summary.md", "* [Page](page.md)\n* [Up](../)\n")],
            &[NavEntry::titled("A", "a/")],
        )
        .unwrap_err();

        assert!(err.to_string().contains("within itself"));
    }

    #[test]
    fn test_external_links_pass_through() {
        let nav = resolve(
            &["index.md"],
            &[(
                "summary.md",
                "* [Home](index.md)\n* [Source](https://github.com/org/proj)\n",
            )],
            &[],
        )
        .unwrap();

        assert_eq!(nav[1], NavEntry::titled("Source", "https://github.com/org/proj"));
    }

    #[test]
    fn test_directory_title_override() {
        let (source, globber) = setup(&["autoapi/foo.md"], &[]);

        let nav = NavResolver::new(&source, &globber)
            .with_directory_title("autoapi/", "API Reference")
            .resolve(&[])
            .unwrap();

        assert_eq!(
            nav,
            vec![NavEntry::section(
                "API Reference",
                vec![NavEntry::link("autoapi/foo.md")]
            )]
        );
    }

    #[test]
    fn test_dirname_to_title() {
        assert_eq!(dirname_to_title("user-guide"), "User guide");
        assert_eq!(dirname_to_title("my_pkg"), "My pkg");
        assert_eq!(dirname_to_title("API_docs"), "API docs");
        assert_eq!(dirname_to_title(""), "");
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("api", "bar/baz.md").as_deref(), Some("api/bar/baz.md"));
        assert_eq!(join_path("api/bar", "../foo.md").as_deref(), Some("api/foo.md"));
        assert_eq!(join_path("api", "/index.md").as_deref(), Some("index.md"));
        assert_eq!(join_path("", "./a/"), Some("a".to_owned()));
        assert_eq!(join_path("", "../a.md"), None);
    }
}
