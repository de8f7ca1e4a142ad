//! Build progress reporting on stderr.

use std::fmt::Display;

use autoapi_site::DocPlan;
use console::{Style, Term};

/// Width of the label column of [`Output::field`].
const LABEL_WIDTH: usize = 8;

/// Colored progress lines for the command line.
///
/// Everything goes to stderr; stdout is reserved for command results such as
/// the navigation printed by `autoapi nav`.
pub(crate) struct Output {
    term: Term,
    label: Style,
    module: Style,
    done: Style,
    warn: Style,
    fail: Style,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            label: Style::new().bold(),
            module: Style::new().cyan(),
            done: Style::new().green(),
            warn: Style::new().yellow(),
            fail: Style::new().red(),
        }
    }

    /// `  Source /path/to/src` with a right-aligned bold label.
    pub(crate) fn field(&self, label: &str, value: impl Display) {
        let label = format!("{label:>LABEL_WIDTH$}");
        let _ = self
            .term
            .write_line(&format!("{} {value}", self.label.apply_to(label)));
    }

    /// One line per generated page: `pkg.mod -> autoapi/pkg/mod.md`.
    pub(crate) fn pages(&self, root: &str, plans: &[DocPlan]) {
        let root = root.trim_end_matches('/');
        for plan in plans {
            let _ = self.term.write_line(&format!(
                "{:LABEL_WIDTH$} {} -> {root}/{}",
                "",
                self.module.apply_to(&plan.module_identifier),
                plan.doc_path
            ));
        }
    }

    pub(crate) fn done(&self, msg: &str) {
        let _ = self.term.write_line(&self.done.apply_to(msg).to_string());
    }

    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.warn.apply_to(msg).to_string());
    }

    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.fail.apply_to(msg).to_string());
    }
}
