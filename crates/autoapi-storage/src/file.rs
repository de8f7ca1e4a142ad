//! Documentation file descriptors.
//!
//! A [`File`] is addressed by its `src_uri`: a slash-separated path relative
//! to the documentation root (`"index.md"`, `"autoapi/pkg/mod.md"`). Its
//! content lives at `abs_src_path`, which for generated files points into a
//! staging directory rather than the documentation tree.

use std::cmp::Ordering;
use std::path::{Component, Path, PathBuf};

use glob::MatchOptions;

use crate::error::{Operation, StorageError};

/// Base name (without extension) of a directory's index page.
pub const INDEX_NAME: &str = "index";

/// Extensions of renderable documentation pages.
const PAGE_EXTENSIONS: &[&str] = &["md", "markdown", "mdown", "mkdn", "mkd"];

/// One file of the documentation tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct File {
    src_uri: String,
    abs_src_path: PathBuf,
    generated: bool,
}

impl File {
    /// Describe the file `src_uri` stored under `src_dir`.
    #[must_use]
    pub fn new(src_uri: &str, src_dir: &Path) -> Self {
        let src_uri = src_uri.replace('\\', "/");
        let abs_src_path = src_dir.join(&src_uri);
        Self {
            src_uri,
            abs_src_path,
            generated: false,
        }
    }

    /// Describe a file produced during the build and stored under `staging_dir`.
    #[must_use]
    pub fn generated(src_uri: &str, staging_dir: &Path) -> Self {
        Self {
            generated: true,
            ..Self::new(src_uri, staging_dir)
        }
    }

    /// Path relative to the documentation root, slash-separated.
    #[must_use]
    pub fn src_uri(&self) -> &str {
        &self.src_uri
    }

    /// Where the content of this file is stored.
    #[must_use]
    pub fn abs_src_path(&self) -> &Path {
        &self.abs_src_path
    }

    /// True for files created during the build.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Base name without extension; `README` counts as [`INDEX_NAME`].
    #[must_use]
    pub fn name(&self) -> &str {
        let base = self.src_uri.rsplit('/').next().unwrap_or_default();
        let stem = base.rsplit_once('.').map_or(base, |(stem, _)| stem);
        if stem == "README" { INDEX_NAME } else { stem }
    }

    /// True for renderable documentation pages (Markdown files).
    #[must_use]
    pub fn is_documentation_page(&self) -> bool {
        let base = self.src_uri.rsplit('/').next().unwrap_or_default();
        base.rsplit_once('.')
            .is_some_and(|(_, ext)| PAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
    }

    /// Compare files so that, at every level, the index page comes first,
    /// then the other files, then the content of subdirectories.
    #[must_use]
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }

    fn sort_key(&self) -> Vec<(u8, &str)> {
        let parts: Vec<&str> = self.src_uri.split('/').collect();
        let last = parts.len() - 1;
        parts
            .into_iter()
            .enumerate()
            .map(|(i, part)| {
                let rank = match (i == last, self.name() == INDEX_NAME) {
                    (true, true) => 0,
                    (true, false) => 1,
                    (false, _) => 2,
                };
                (rank, part)
            })
            .collect()
    }
}

/// Ordered collection of documentation files.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Files {
    files: Vec<File>,
}

impl Files {
    /// Wrap files in the given order.
    #[must_use]
    pub fn new(files: Vec<File>) -> Self {
        Self { files }
    }

    /// Collect every non-hidden file below `docs_dir`.
    ///
    /// Returns an empty collection if the directory doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if a directory entry can't be read.
    pub fn scan(docs_dir: &Path) -> Result<Self, StorageError> {
        if !docs_dir.is_dir() {
            return Ok(Self::default());
        }

        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::default()
        };
        let pattern = format!(
            "{}/**/*",
            glob::Pattern::escape(&docs_dir.to_string_lossy())
        );
        let entries = glob::glob_with(&pattern, options).map_err(|e| {
            StorageError::invalid_pattern(&pattern, e).during(Operation::Scan)
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                StorageError::io(e.into_error())
                    .at(path)
                    .during(Operation::Scan)
            })?;
            if !path.is_file() {
                continue;
            }
            let Some(src_uri) = relative_uri(&path, docs_dir) else {
                continue;
            };
            if src_uri.split('/').any(|part| part.starts_with('.')) {
                continue;
            }
            files.push(File::new(&src_uri, docs_dir));
        }
        files.sort_by(File::sort_cmp);

        tracing::debug!(count = files.len(), dir = %docs_dir.display(), "Scanned documentation files");
        Ok(Self { files })
    }

    /// Look up a file by its `src_uri`.
    #[must_use]
    pub fn get(&self, src_uri: &str) -> Option<&File> {
        self.files.iter().find(|f| f.src_uri == src_uri)
    }

    /// Iterate over the files in order.
    pub fn iter(&self) -> std::slice::Iter<'_, File> {
        self.files.iter()
    }

    /// Iterate over documentation pages only.
    pub fn documentation_pages(&self) -> impl Iterator<Item = &File> {
        self.files.iter().filter(|f| f.is_documentation_page())
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True if there are no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<'a> IntoIterator for &'a Files {
    type Item = &'a File;
    type IntoIter = std::slice::Iter<'a, File>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

impl IntoIterator for Files {
    type Item = File;
    type IntoIter = std::vec::IntoIter<File>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

/// Slash-separated path of `path` relative to `base`.
pub(crate) fn relative_uri(path: &Path, base: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    (!parts.is_empty()).then(|| parts.join("/"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn file(uri: &str) -> File {
        File::new(uri, Path::new("/docs"))
    }

    #[test]
    fn test_name_strips_extension() {
        assert_eq!(file("api/foo.md").name(), "foo");
        assert_eq!(file("api/index.md").name(), "index");
        assert_eq!(file("README.md").name(), "index");
        assert_eq!(file("LICENSE").name(), "LICENSE");
    }

    #[test]
    fn test_is_documentation_page() {
        assert!(file("a.md").is_documentation_page());
        assert!(file("a.MARKDOWN").is_documentation_page());
        assert!(!file("img/logo.png").is_documentation_page());
        assert!(!file("Makefile").is_documentation_page());
    }

    #[test]
    fn test_abs_src_path_joins_src_dir() {
        assert_eq!(
            file("api/foo.md").abs_src_path(),
            Path::new("/docs/api/foo.md")
        );
        assert!(!file("a.md").is_generated());
        assert!(File::generated("a.md", Path::new("/tmp")).is_generated());
    }

    #[test]
    fn test_sort_puts_index_first_and_subdirs_last() {
        let mut files = vec![
            file("b.md"),
            file("sub/a.md"),
            file("index.md"),
            file("a.md"),
            file("sub/index.md"),
        ];

        files.sort_by(File::sort_cmp);

        let uris: Vec<&str> = files.iter().map(File::src_uri).collect();
        assert_eq!(
            uris,
            vec!["index.md", "a.md", "b.md", "sub/index.md", "sub/a.md"]
        );
    }

    #[test]
    fn test_scan_collects_visible_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("guide")).unwrap();
        std::fs::create_dir_all(dir.path().join(".hidden")).unwrap();
        std::fs::write(dir.path().join("index.md"), "# Home").unwrap();
        std::fs::write(dir.path().join("guide/setup.md"), "# Setup").unwrap();
        std::fs::write(dir.path().join(".hidden/secret.md"), "").unwrap();

        let files = Files::scan(dir.path()).unwrap();

        let uris: Vec<&str> = files.iter().map(File::src_uri).collect();
        assert_eq!(uris, vec!["index.md", "guide/setup.md"]);
        assert!(files.get("guide/setup.md").is_some());
        assert_eq!(files.documentation_pages().count(), 2);
    }

    #[test]
    fn test_scan_missing_dir() {
        let files = Files::scan(Path::new("/nonexistent/docs")).unwrap();

        assert!(files.is_empty());
    }

    #[test]
    fn test_relative_uri() {
        assert_eq!(
            relative_uri(Path::new("/docs/a/b.md"), Path::new("/docs")),
            Some("a/b.md".to_owned())
        );
        assert_eq!(relative_uri(Path::new("/docs"), Path::new("/docs")), None);
        assert_eq!(relative_uri(Path::new("/other/a.md"), Path::new("/docs")), None);
    }
}
