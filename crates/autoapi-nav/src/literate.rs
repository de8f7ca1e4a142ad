//! Literate navigation format.
//!
//! A literate navigation file is a Markdown bullet list, one entry per line,
//! nested by multiples of four spaces:
//!
//! ```text
//! * [foo](foo.md)
//! * [bar](bar/index.md)
//!     * [baz](bar/baz.md)
//! * Section
//!     * [Page](section/page.md)
//! ```
//!
//! Titles starting with a Markdown special character are escaped with a
//! backslash. Lines before the first bullet (a heading, for instance) are
//! ignored.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::NavError;
use crate::tree::INDENT_WIDTH;

/// Characters that start Markdown constructs when leading a title.
const MARKDOWN_SPECIAL_CHARS: &[char] = &[
    '!', '#', '(', ')', '*', '+', '-', '[', '\\', ']', '_', '`', '{', '}',
];

static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^( *)[*+-][ \t]+(.*?)\s*$").unwrap());

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(?P<title>.*)\]\((?P<target>[^()]*)\)$").unwrap());

/// Escape a title that would otherwise be read as Markdown syntax.
#[must_use]
pub fn escape_title(title: &str) -> Cow<'_, str> {
    if title.starts_with(MARKDOWN_SPECIAL_CHARS) {
        Cow::Owned(format!("\\{title}"))
    } else {
        Cow::Borrowed(title)
    }
}

/// Reverse [`escape_title`].
#[must_use]
pub fn unescape_title(title: &str) -> &str {
    match title.strip_prefix('\\') {
        Some(rest) if rest.starts_with(MARKDOWN_SPECIAL_CHARS) => rest,
        _ => title,
    }
}

/// One bullet of a parsed literate navigation file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiterateItem {
    /// One-based line number of the bullet.
    pub line: usize,
    /// Item title. `None` for `* [](target)`.
    pub title: Option<String>,
    /// Link target, exactly as written.
    pub target: Option<String>,
    /// Nested bullets.
    pub children: Vec<LiterateItem>,
}

/// Parse the text of a literate navigation file.
///
/// `file` names the file in error messages.
///
/// # Errors
///
/// Returns [`NavError::Parse`] when indentation is not a multiple of four
/// spaces, a bullet skips a nesting level, a non-bullet line appears inside
/// the list, or an item has neither a link nor nested items.
pub fn parse_literate(text: &str, file: &str) -> Result<Vec<LiterateItem>, NavError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut roots = Vec::new();
    let mut open: Vec<LiterateItem> = Vec::new();
    let mut base: Option<usize> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = expand_leading_tabs(raw);
        if line.trim().is_empty() {
            continue;
        }

        let Some(caps) = BULLET.captures(&line) else {
            if base.is_none() {
                continue;
            }
            return Err(NavError::parse(file, line_no, "expected a list item"));
        };

        let spaces = caps[1].len();
        if spaces % INDENT_WIDTH != 0 {
            return Err(NavError::parse(
                file,
                line_no,
                format!("indentation must be a multiple of {INDENT_WIDTH} spaces (got {spaces})"),
            ));
        }
        let depth = spaces / INDENT_WIDTH;
        let base_depth = *base.get_or_insert(depth);
        let Some(level) = depth.checked_sub(base_depth) else {
            return Err(NavError::parse(
                file,
                line_no,
                "item is indented less than the first item",
            ));
        };
        if level > open.len() {
            return Err(NavError::parse(
                file,
                line_no,
                "item is nested more than one level below its parent",
            ));
        }

        while open.len() > level {
            close_item(&mut open, &mut roots);
        }
        open.push(parse_item(&caps[2], line_no));
    }

    while !open.is_empty() {
        close_item(&mut open, &mut roots);
    }

    validate(&roots, file)?;
    Ok(roots)
}

/// Replace tabs in the leading whitespace by four spaces each.
fn expand_leading_tabs(line: &str) -> Cow<'_, str> {
    let rest = line.trim_start_matches([' ', '\t']);
    let lead = &line[..line.len() - rest.len()];
    if lead.contains('\t') {
        Cow::Owned(format!("{}{rest}", lead.replace('\t', "    ")))
    } else {
        Cow::Borrowed(line)
    }
}

fn parse_item(content: &str, line: usize) -> LiterateItem {
    let (title, target) = match LINK.captures(content) {
        Some(caps) => {
            let title = unescape_title(caps["title"].trim());
            (
                (!title.is_empty()).then(|| title.to_owned()),
                Some(caps["target"].trim().to_owned()),
            )
        }
        None => (Some(unescape_title(content).to_owned()), None),
    };
    LiterateItem {
        line,
        title,
        target,
        children: Vec::new(),
    }
}

fn close_item(open: &mut Vec<LiterateItem>, roots: &mut Vec<LiterateItem>) {
    if let Some(item) = open.pop() {
        match open.last_mut() {
            Some(parent) => parent.children.push(item),
            None => roots.push(item),
        }
    }
}

fn validate(items: &[LiterateItem], file: &str) -> Result<(), NavError> {
    for item in items {
        if item.target.is_none() && item.children.is_empty() {
            return Err(NavError::parse(
                file,
                item.line,
                "expected a link or a nested list",
            ));
        }
        if item.target.as_deref() == Some("") {
            return Err(NavError::parse(file, item.line, "link target is empty"));
        }
        validate(&item.children, file)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::NavTree;

    fn link(line: usize, title: &str, target: &str) -> LiterateItem {
        LiterateItem {
            line,
            title: Some(title.to_owned()),
            target: Some(target.to_owned()),
            children: Vec::new(),
        }
    }

    /// Rebuild a tree from parsed items.
    fn to_tree(items: &[LiterateItem]) -> NavTree {
        fn walk(items: &[LiterateItem], prefix: &[String], nav: &mut NavTree) {
            for item in items {
                let mut path = prefix.to_vec();
                path.push(item.title.clone().unwrap_or_default());
                if let Some(target) = &item.target {
                    nav.set(path.clone(), target.clone()).unwrap();
                }
                walk(&item.children, &path, nav);
            }
        }
        let mut nav = NavTree::new();
        walk(items, &[], &mut nav);
        nav
    }

    #[test]
    fn test_escape_title() {
        assert_eq!(escape_title("*Title"), "\\*Title");
        assert_eq!(escape_title("__init__"), "\\__init__");
        assert_eq!(escape_title("Title"), "Title");
        assert_eq!(escape_title("a*b"), "a*b");
    }

    #[test]
    fn test_unescape_title() {
        assert_eq!(unescape_title("\\*Title"), "*Title");
        assert_eq!(unescape_title("\\Title"), "\\Title");
        assert_eq!(unescape_title("Title"), "Title");
    }

    #[test]
    fn test_parse_flat_links() {
        let items = parse_literate("* [foo](foo.md)\n* [bar](bar.md)\n", "summary.md").unwrap();

        assert_eq!(
            items,
            vec![link(1, "foo", "foo.md"), link(2, "bar", "bar.md")]
        );
    }

    #[test]
    fn test_parse_nested_sections() {
        let text = "# API\n\n* Section\n    * [Page](section/page.md)\n    * Deeper\n        * [Leaf](leaf.md)\n* [Top](top.md)\n";

        let items = parse_literate(text, "summary.md").unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title.as_deref(), Some("Section"));
        assert_eq!(items[0].target, None);
        assert_eq!(items[0].children.len(), 2);
        assert_eq!(items[0].children[1].children[0], link(6, "Leaf", "leaf.md"));
        assert_eq!(items[1], link(7, "Top", "top.md"));
    }

    #[test]
    fn test_parse_link_with_children() {
        let text = "* [bar](bar/index.md)\n    * [baz](bar/baz.md)\n";

        let items = parse_literate(text, "summary.md").unwrap();

        assert_eq!(items[0].target.as_deref(), Some("bar/index.md"));
        assert_eq!(items[0].children, vec![link(2, "baz", "bar/baz.md")]);
    }

    #[test]
    fn test_parse_untitled_link() {
        let items = parse_literate("* [](page.md)\n", "summary.md").unwrap();

        assert_eq!(items[0].title, None);
        assert_eq!(items[0].target.as_deref(), Some("page.md"));
    }

    #[test]
    fn test_parse_unescapes_titles() {
        let items = parse_literate("* [\\_private](p.md)\n", "summary.md").unwrap();

        assert_eq!(items[0].title.as_deref(), Some("_private"));
    }

    #[test]
    fn test_parse_accepts_tabs_and_dash_bullets() {
        let items = parse_literate("- Section\n\t- [a](a.md)\n", "summary.md").unwrap();

        assert_eq!(items[0].children, vec![link(2, "a", "a.md")]);
    }

    #[test]
    fn test_parse_rejects_bad_indentation() {
        let err = parse_literate("* A\n   * [b](b.md)\n", "api/summary.md").unwrap_err();

        match err {
            NavError::Parse { file, line, message } => {
                assert_eq!(file, "api/summary.md");
                assert_eq!(line, 2);
                assert!(message.contains("multiple of 4"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_skipped_level() {
        let err = parse_literate("* A\n        * [b](b.md)\n", "summary.md").unwrap_err();

        assert!(matches!(err, NavError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_parse_rejects_text_inside_list() {
        let err = parse_literate("* [a](a.md)\nsome paragraph\n", "summary.md").unwrap_err();

        assert!(matches!(err, NavError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_parse_rejects_empty_section() {
        let err = parse_literate("* [a](a.md)\n* Lonely\n", "summary.md").unwrap_err();

        assert!(matches!(err, NavError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_parse_with_base_indentation() {
        let items = parse_literate("    * A\n        * [b](b.md)\n", "summary.md").unwrap();

        assert_eq!(items[0].children, vec![link(2, "b", "b.md")]);
    }

    #[test]
    fn test_render_then_parse_round_trip() {
        let mut nav = NavTree::new();
        nav.set(["foo"], "foo.md").unwrap();
        nav.set(["bar"], "bar/index.md").unwrap();
        nav.set(["bar", "baz"], "bar/baz.md").unwrap();
        nav.set(["bar", "*star"], "bar/star.md").unwrap();
        nav.set(["deep", "er", "est"], "deep/er/est.md").unwrap();

        let text = nav.render_to_string(0);
        let items = parse_literate(&text, "summary.md").unwrap();

        assert_eq!(to_tree(&items), nav);
    }
}
