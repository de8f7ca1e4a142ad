//! Resolved navigation nodes and section pages.
//!
//! Resolution leaves sections whose first child is an untitled page, which is
//! how a literate file writes a linked section (`* [bar](bar/index.md)` with
//! nested items). [`merge_section_pages`] folds such a page into its section,
//! producing a [`NavNode::SectionPage`] that is both a page and a section.

use serde::Serialize;

use crate::entry::NavEntry;

/// Node of the final navigation handed to the site renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavNode {
    /// A page link.
    Page {
        /// Title. `None` when the page supplies its own.
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        /// Page path or URL.
        target: String,
    },
    /// A section without a page of its own.
    Section {
        /// Section title.
        title: String,
        /// Child nodes.
        children: Vec<NavNode>,
    },
    /// A section that also links to a page.
    SectionPage {
        /// Section title.
        title: String,
        /// Page path.
        target: String,
        /// Child nodes, excluding the page itself.
        children: Vec<NavNode>,
    },
}

impl NavNode {
    /// True for nodes that link to a page.
    #[must_use]
    pub fn is_page(&self) -> bool {
        matches!(self, Self::Page { .. } | Self::SectionPage { .. })
    }

    /// True for nodes that group children.
    #[must_use]
    pub fn is_section(&self) -> bool {
        matches!(self, Self::Section { .. } | Self::SectionPage { .. })
    }

    /// Node title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Page { title, .. } => title.as_deref(),
            Self::Section { title, .. } | Self::SectionPage { title, .. } => Some(title),
        }
    }

    /// Linked page, if any.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Page { target, .. } | Self::SectionPage { target, .. } => Some(target),
            Self::Section { .. } => None,
        }
    }

    /// Child nodes (empty for pages).
    #[must_use]
    pub fn children(&self) -> &[NavNode] {
        match self {
            Self::Page { .. } => &[],
            Self::Section { children, .. } | Self::SectionPage { children, .. } => children,
        }
    }
}

/// Convert resolved entries into nodes, merging section pages at every level.
///
/// A section whose first child is an untitled page becomes a section page:
/// it takes the page's target and keeps the page's former siblings as its
/// children.
#[must_use]
pub fn merge_section_pages(entries: Vec<NavEntry>) -> Vec<NavNode> {
    entries.into_iter().map(merge_entry).collect()
}

fn merge_entry(entry: NavEntry) -> NavNode {
    match entry {
        NavEntry::Page { title, target } => NavNode::Page { title, target },
        NavEntry::Section { title, children } => {
            let mut children = merge_section_pages(children);
            let index = match children.first() {
                Some(NavNode::Page {
                    title: None,
                    target,
                }) => Some(target.clone()),
                _ => None,
            };
            match index {
                Some(target) => {
                    children.remove(0);
                    NavNode::SectionPage {
                        title,
                        target,
                        children,
                    }
                }
                None => NavNode::Section { title, children },
            }
        }
    }
}
