//! Full build: generation followed by navigation resolution.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use autoapi_config::Config;
use autoapi_nav::{NavEntry, NavNode, merge_section_pages};
use autoapi_storage::{Files, FilesEditor, Operation, StorageError, write_if_changed};
use tempfile::TempDir;

use crate::edit_url::edit_url;
use crate::error::BuildError;
use crate::generator::Generator;
use crate::globber::PathGlobber;
use crate::planner::DocPlan;
use crate::resolver::{FilesNavSource, NavResolver};

/// Result of [`build`].
///
/// Generated files live in a staging directory owned by this value and are
/// removed when it is dropped.
#[derive(Debug)]
pub struct BuildOutput {
    /// Resolved navigation.
    pub nav: Vec<NavNode>,
    /// All documentation files, generated ones included.
    pub files: Files,
    /// "Edit this page" links by page path.
    pub edit_urls: BTreeMap<String, String>,
    /// Generated pages.
    pub plans: Vec<DocPlan>,
    staging: TempDir,
}

impl BuildOutput {
    /// Staging directory of generated files.
    #[must_use]
    pub fn staging_dir(&self) -> &Path {
        self.staging.path()
    }

    /// Copy generated files below `out_dir`, returning how many changed.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Storage`] if a file can't be read or written.
    pub fn write_generated(&self, out_dir: &Path) -> Result<usize, BuildError> {
        let mut written = 0;
        for file in self.files.iter().filter(|f| f.is_generated()) {
            let content = fs::read_to_string(file.abs_src_path())
                .map_err(|e| {
                    StorageError::io(e)
                        .at(file.abs_src_path())
                        .during(Operation::Mirror)
                })?;
            if write_if_changed(&out_dir.join(file.src_uri()), &content)? {
                written += 1;
            }
        }
        tracing::debug!(written, dir = %out_dir.display(), "Wrote generated files");
        Ok(written)
    }
}

/// Generate API pages and resolve the navigation for `config`.
///
/// # Errors
///
/// Returns [`BuildError`] if the documentation tree can't be scanned, page
/// generation fails or the navigation can't be resolved.
pub fn build(config: &Config) -> Result<BuildOutput, BuildError> {
    let docs = &config.docs_resolved;
    let autoapi = &config.autoapi_resolved;

    let files = Files::scan(&docs.docs_dir)?;
    tracing::debug!(count = files.len(), dir = %docs.docs_dir.display(), "Scanned documentation");

    let staging = tempfile::Builder::new()
        .prefix("autoapi")
        .tempdir()
        .map_err(|e| StorageError::io(e).during(Operation::Stage))?;
    let mut editor = FilesEditor::new(files, staging.path());
    let generation = Generator::new(config).generate(&mut editor)?;
    let files = editor.files();

    let globber = PathGlobber::new(&files);
    let source = FilesNavSource::new(&files, &docs.nav_file);
    let mut nav = docs.nav.clone();
    let mut resolver = NavResolver::new(&source, &globber);
    if let Some(title) = autoapi.add_nav_entry.title() {
        if nav.is_empty() {
            resolver = resolver.with_directory_title(&autoapi.root, title);
        } else {
            nav.push(NavEntry::titled(title, autoapi.root_placeholder()));
        }
    }
    let resolved = resolver.resolve(&nav)?;
    let nav = merge_section_pages(resolved);

    let edit_urls = collect_edit_urls(config, &files, editor.edit_paths());

    Ok(BuildOutput {
        nav,
        files,
        edit_urls,
        plans: generation.plans,
        staging,
    })
}

/// Edit links of all pages.
///
/// Generated pages link to their source file; pages without a recorded edit
/// path link to themselves; pages recorded with no edit path get no link.
fn collect_edit_urls(
    config: &Config,
    files: &Files,
    edit_paths: &BTreeMap<String, Option<String>>,
) -> BTreeMap<String, String> {
    let docs = &config.docs_resolved;
    files
        .documentation_pages()
        .filter_map(|file| {
            let path = match edit_paths.get(file.src_uri()) {
                Some(path) => path.as_deref()?,
                None => file.src_uri(),
            };
            let url = edit_url(docs.repo_url.as_deref(), docs.edit_uri.as_deref(), path)?;
            Some((file.src_uri().to_owned(), url))
        })
        .collect()
}
