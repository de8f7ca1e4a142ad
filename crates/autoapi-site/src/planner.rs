//! Mapping of source files to documentation pages.
//!
//! Each source file gets one page whose navigation path follows the package
//! layout: `pkg/sub/mod.py` is documented at `pkg/sub/mod.md` under the titles
//! `pkg > sub > mod`. A package marker (`pkg/sub/__init__.py`) documents the
//! package itself at `pkg/sub/index.md` under `pkg > sub`.

use std::path::{Component, Path, PathBuf};

use autoapi_nav::{NavError, NavTree};

/// File stem that marks a directory as a package.
pub const PACKAGE_MARKER: &str = "__init__";

/// Source extensions whose marker file makes a directory a package.
const MARKER_EXTENSIONS: &[&str] = &["py", "pyi"];

/// Planned documentation page for one source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocPlan {
    /// Navigation titles, also the module path (`["pkg", "sub", "mod"]`).
    pub module_path_parts: Vec<String>,
    /// Page path relative to the output root (`"pkg/sub/mod.md"`).
    pub doc_path: String,
    /// Dotted module name (`"pkg.sub.mod"`).
    pub module_identifier: String,
    /// The documented source file.
    pub source_path: PathBuf,
}

/// Plans pages for discovered source files and records them in a [`NavTree`].
#[derive(Debug, Default)]
pub struct DocPathPlanner {
    nav: NavTree,
}

impl DocPathPlanner {
    /// Create a planner with an empty navigation tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigation tree populated so far.
    #[must_use]
    pub fn nav(&self) -> &NavTree {
        &self.nav
    }

    /// Consume the planner, returning its navigation tree.
    #[must_use]
    pub fn into_nav(self) -> NavTree {
        self.nav
    }

    /// Plan pages for `files` found below `source_root`.
    ///
    /// Paths are resolved first (symlinks followed, `..` removed) and files
    /// are processed in resolved path order so the navigation is the same on
    /// every run. When `source_root` is itself a package, module paths start
    /// with its name. A package marker directly in the planning root has no
    /// module path and is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`NavError`] if a module path contains an empty segment.
    pub fn plan(
        &mut self,
        files: impl IntoIterator<Item = PathBuf>,
        source_root: &Path,
    ) -> Result<Vec<DocPlan>, NavError> {
        let base = planning_root(source_root);
        let mut files: Vec<PathBuf> = files.into_iter().map(|f| resolve(&f)).collect();
        files.sort();
        files.dedup();

        let mut plans = Vec::with_capacity(files.len());
        for source_path in files {
            let Some(plan) = plan_file(source_path, &base) else {
                continue;
            };
            self.nav
                .set(plan.module_path_parts.iter().cloned(), plan.doc_path.clone())?;
            plans.push(plan);
        }
        Ok(plans)
    }
}

/// Directory module paths are relative to.
fn planning_root(source_root: &Path) -> PathBuf {
    let root = resolve(source_root);
    if is_package(&root)
        && let Some(parent) = root.parent()
    {
        tracing::debug!(root = %root.display(), "Adjusted source directory to parent package");
        return parent.to_path_buf();
    }
    root
}

/// Canonical form of `path`, or its lexical normalization when it doesn't
/// exist on disk.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

fn is_package(dir: &Path) -> bool {
    MARKER_EXTENSIONS
        .iter()
        .any(|ext| dir.join(format!("{PACKAGE_MARKER}.{ext}")).is_file())
}

fn plan_file(source_path: PathBuf, base: &Path) -> Option<DocPlan> {
    let stem = source_path.file_stem()?.to_string_lossy().into_owned();
    let relative = source_path
        .parent()
        .and_then(|dir| dir.strip_prefix(base).ok());
    if relative.is_none() {
        tracing::warn!(
            path = %source_path.display(),
            root = %base.display(),
            "Source file is outside the source directory, documenting it at the top level"
        );
    }
    let mut parts: Vec<String> = relative
        .map(|rel| {
            rel.components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    let dir = parts.join("/");
    let file_name = if stem == PACKAGE_MARKER {
        if parts.is_empty() {
            tracing::debug!(path = %source_path.display(), "Skipping package marker at source root");
            return None;
        }
        "index.md".to_owned()
    } else {
        let name = format!("{stem}.md");
        parts.push(stem);
        name
    };
    let doc_path = if dir.is_empty() {
        file_name
    } else {
        format!("{dir}/{file_name}")
    };

    Some(DocPlan {
        module_identifier: parts.join("."),
        module_path_parts: parts,
        doc_path,
        source_path,
    })
}
