//! Generation of API documentation stubs and their navigation.
//!
//! The generation pass discovers source files, plans one page per module,
//! writes a `::: module` stub for each through the [`FilesEditor`] and writes
//! the literate navigation of all stubs to `<root>/<nav_file>`. With
//! `keep_files`, the same files are mirrored into the documentation tree.

use std::path::{Path, PathBuf};

use autoapi_config::Config;
use autoapi_storage::{FilesEditor, Operation, StorageError, discover_files, write_if_changed};

use crate::error::BuildError;
use crate::planner::{DocPathPlanner, DocPlan};

/// Result of a generation pass.
#[derive(Debug)]
pub struct Generation {
    /// One entry per generated page.
    pub plans: Vec<DocPlan>,
    /// Logical path of the generated literate navigation file.
    pub summary_uri: String,
    /// Content of the generated literate navigation file.
    pub summary: String,
}

/// Generation pass over one configuration.
#[derive(Debug)]
pub struct Generator<'a> {
    config: &'a Config,
    root: &'a str,
}

impl<'a> Generator<'a> {
    /// Create a generator for `config`.
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            root: config.autoapi_resolved.root.trim_end_matches('/'),
        }
    }

    /// Stub page content for a module.
    #[must_use]
    pub fn stub_content(module_identifier: &str) -> String {
        format!("::: {module_identifier}\n")
    }

    /// Run the pass, writing generated files through `editor`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the source directory doesn't exist, discovery
    /// fails, a module path is invalid or a
    /// file can't be written. Nothing is mirrored into the documentation tree
    /// before discovery and planning have succeeded.
    pub fn generate(&self, editor: &mut FilesEditor) -> Result<Generation, BuildError> {
        let autoapi = &self.config.autoapi_resolved;
        tracing::debug!(dir = %autoapi.dir.display(), "Generating API documentation");
        if autoapi.keep_files {
            tracing::debug!(dir = %self.local_root().display(), "Generated files will be kept");
        }

        if !autoapi.dir.is_dir() {
            return Err(StorageError::not_found(&autoapi.dir)
                .during(Operation::Discover)
                .into());
        }
        let files = discover_files(&autoapi.dir, &autoapi.file_patterns, &autoapi.ignore)?;
        tracing::info!(count = files.len(), "Found files to document");

        let mut planner = DocPathPlanner::new();
        let plans = planner.plan(files, &autoapi.dir)?;

        for plan in &plans {
            let uri = self.output_uri(&plan.doc_path);
            let content = Self::stub_content(&plan.module_identifier);
            if autoapi.keep_files {
                write_if_changed(&self.local_root().join(&plan.doc_path), &content)?;
            }
            editor.write(&uri, &content)?;
            editor.set_edit_path(&uri, Some(&self.edit_path(&plan.source_path)));
        }

        let nav_file = &self.config.docs_resolved.nav_file;
        let summary = planner.nav().render_to_string(0);
        let summary_uri = self.output_uri(nav_file);
        if autoapi.keep_files {
            let local = self.local_root().join(nav_file);
            write_if_changed(&local, &summary)?;
            tracing::debug!(path = %local.display(), "Saved summary file");
        }
        editor.write(&summary_uri, &summary)?;
        editor.set_edit_path(&summary_uri, None);
        tracing::info!(pages = plans.len(), summary = %summary_uri, "Generated API documentation");

        Ok(Generation {
            plans,
            summary_uri,
            summary,
        })
    }

    /// Logical path of a generated file.
    fn output_uri(&self, doc_path: &str) -> String {
        format!("{}/{doc_path}", self.root)
    }

    /// Where kept files go inside the documentation tree.
    fn local_root(&self) -> PathBuf {
        self.config.docs_resolved.docs_dir.join(self.root)
    }

    /// Source path recorded for "edit this page" links.
    ///
    /// Relative to the project directory when the file is inside it.
    fn edit_path(&self, source_path: &Path) -> String {
        let project_dir = self
            .config
            .project_dir
            .canonicalize()
            .unwrap_or_else(|_| self.config.project_dir.clone());
        let path = source_path.strip_prefix(&project_dir).unwrap_or(source_path);
        path.to_string_lossy().replace('\\', "/")
    }
}
