//! Ordered navigation tree keyed by title paths.
//!
//! A [`NavTree`] is populated with `set(["Foo", "Bar"], "foo/bar.md")` calls and
//! merges sections where title paths share a prefix:
//!
//! ```
//! use autoapi_nav::NavTree;
//!
//! let mut nav = NavTree::new();
//! nav.set(["Foo", "Bar"], "foo/bar.md").unwrap();
//! nav.set(["Foo", "Another"], "test.md").unwrap();
//!
//! assert_eq!(
//!     nav.render_to_string(0),
//!     "* Foo\n    * [Bar](foo/bar.md)\n    * [Another](test.md)\n"
//! );
//! ```

use std::collections::HashMap;

use crate::error::NavError;
use crate::literate::escape_title;

/// Spaces per nesting level in the literate rendering.
pub const INDENT_WIDTH: usize = 4;

/// Ordered, mergeable section tree.
///
/// Siblings keep their insertion order. A node may carry a target and
/// children at the same time; such a node renders as a single linked row
/// followed by its children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavTree {
    roots: Siblings,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Node {
    title: String,
    target: Option<String>,
    children: Siblings,
}

/// Nodes in insertion order, indexed by title.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Siblings {
    nodes: Vec<Node>,
    by_title: HashMap<String, usize>,
}

impl Siblings {
    /// Find the child titled `title`, appending it when missing.
    fn child_mut(&mut self, title: &str) -> &mut Node {
        let idx = match self.by_title.get(title) {
            Some(&idx) => idx,
            None => {
                self.nodes.push(Node {
                    title: title.to_owned(),
                    target: None,
                    children: Siblings::default(),
                });
                let idx = self.nodes.len() - 1;
                self.by_title.insert(title.to_owned(), idx);
                idx
            }
        };
        &mut self.nodes[idx]
    }
}

/// Flattened view of one [`NavTree`] node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavItem<'a> {
    /// Nesting level, starting at 0.
    pub level: usize,
    /// Section or page title.
    pub title: &'a str,
    /// Document the item links to. `None` for a plain section label.
    pub target: Option<&'a str>,
}

impl NavItem<'_> {
    /// Format the item as one literate navigation line (newline included).
    #[must_use]
    pub fn literate_line(&self, indent: usize) -> String {
        let title = escape_title(self.title);
        let pad = " ".repeat(indent + INDENT_WIDTH * self.level);
        match self.target {
            Some(target) => format!("{pad}* [{title}]({target})\n"),
            None => format!("{pad}* {title}\n"),
        }
    }
}

impl NavTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True if nothing was added yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.nodes.is_empty()
    }

    /// Link `target` under the sequence of titles in `parts`.
    ///
    /// Missing sections are created in order; existing ones are reused. Setting
    /// the same path twice keeps the last target.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::EmptyPath`] when `parts` is empty and
    /// [`NavError::EmptySegment`] when one of the titles is empty.
    pub fn set<I, S>(&mut self, parts: I, target: impl Into<String>) -> Result<(), NavError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parts: Vec<String> = parts.into_iter().map(Into::into).collect();
        if parts.iter().any(String::is_empty) {
            return Err(NavError::EmptySegment { parts });
        }
        let Some((last, sections)) = parts.split_last() else {
            return Err(NavError::EmptyPath);
        };

        let mut siblings = &mut self.roots;
        for title in sections {
            siblings = &mut siblings.child_mut(title).children;
        }
        siblings.child_mut(last).target = Some(target.into());
        Ok(())
    }

    /// Iterate over the tree depth-first, parents before their children.
    ///
    /// The iterator borrows the tree, so it can be restarted any number of
    /// times with the same result.
    #[must_use]
    pub fn flatten(&self) -> Flatten<'_> {
        Flatten {
            stack: vec![self.roots.nodes.iter()],
        }
    }

    /// Render the tree as literate navigation lines.
    ///
    /// Each line is indented by `indent + 4 * level` spaces.
    pub fn render(&self, indent: usize) -> impl Iterator<Item = String> + '_ {
        self.flatten().map(move |item| item.literate_line(indent))
    }

    /// Render the whole tree into one string.
    #[must_use]
    pub fn render_to_string(&self, indent: usize) -> String {
        self.render(indent).collect()
    }
}

/// Depth-first iterator returned by [`NavTree::flatten`].
pub struct Flatten<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Flatten<'a> {
    type Item = NavItem<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.len().checked_sub(1)?;
            let siblings = self.stack.last_mut()?;
            if let Some(node) = siblings.next() {
                self.stack.push(node.children.nodes.iter());
                return Some(NavItem {
                    level,
                    title: &node.title,
                    target: node.target.as_deref(),
                });
            }
            self.stack.pop();
        }
    }
}
