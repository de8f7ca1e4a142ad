//! Configured navigation entries.
//!
//! [`NavEntry`] mirrors the usual YAML/TOML navigation layout: a list whose
//! items are either a bare target (`"index.md"`) or a single-key mapping from
//! a title to a target or to a nested list.
//!
//! ```yaml
//! - index.md
//! - Guide: guide/
//! - API:
//!     - api/overview.md
//!     - Reference: autoapi/
//! ```
//!
//! Targets ending in `/` name a directory to expand; targets containing `*`
//! are glob patterns.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One entry of a configured navigation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawEntry")]
pub enum NavEntry {
    /// A link to a page, directory, pattern or external URL.
    Page {
        /// Title shown in navigation. `None` lets the page supply its own.
        title: Option<String>,
        /// Link target.
        target: String,
    },
    /// A titled group of entries.
    Section {
        /// Section title.
        title: String,
        /// Nested entries.
        children: Vec<NavEntry>,
    },
}

impl NavEntry {
    /// Untitled link.
    #[must_use]
    pub fn link(target: impl Into<String>) -> Self {
        Self::Page {
            title: None,
            target: target.into(),
        }
    }

    /// Titled link.
    #[must_use]
    pub fn titled(title: impl Into<String>, target: impl Into<String>) -> Self {
        Self::Page {
            title: Some(title.into()),
            target: target.into(),
        }
    }

    /// Titled section.
    #[must_use]
    pub fn section(title: impl Into<String>, children: Vec<NavEntry>) -> Self {
        Self::Section {
            title: title.into(),
            children,
        }
    }

    /// Entry title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Page { title, .. } => title.as_deref(),
            Self::Section { title, .. } => Some(title),
        }
    }
}

/// Serialized shape of an entry, before the single-key check.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Target(String),
    Titled(BTreeMap<String, RawValue>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Target(String),
    Children(Vec<NavEntry>),
}

impl TryFrom<RawEntry> for NavEntry {
    type Error = String;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        match raw {
            RawEntry::Target(target) => Ok(Self::link(target)),
            RawEntry::Titled(map) => {
                if map.len() != 1 {
                    return Err(format!(
                        "navigation entry must map exactly one title, got {}",
                        map.len()
                    ));
                }
                let Some((title, value)) = map.into_iter().next() else {
                    return Err("navigation entry is empty".to_owned());
                };
                Ok(match value {
                    RawValue::Target(target) => Self::titled(title, target),
                    RawValue::Children(children) => Self::section(title, children),
                })
            }
        }
    }
}

impl Serialize for NavEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Page {
                title: None,
                target,
            } => serializer.serialize_str(target),
            Self::Page {
                title: Some(title),
                target,
            } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(title, target)?;
                map.end()
            }
            Self::Section { title, children } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(title, children)?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_deserialize_yaml_nav() {
        let yaml = "
- index.md
- Guide: guide/
- API:
    - api/overview.md
    - Reference: autoapi/
";
        let nav: Vec<NavEntry> = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(
            nav,
            vec![
                NavEntry::link("index.md"),
                NavEntry::titled("Guide", "guide/"),
                NavEntry::section(
                    "API",
                    vec![
                        NavEntry::link("api/overview.md"),
                        NavEntry::titled("Reference", "autoapi/"),
                    ]
                ),
            ]
        );
    }

    #[test]
    fn test_deserialize_rejects_multi_key_entry() {
        let yaml = "- A: a.md\n  B: b.md\n";

        let result: Result<Vec<NavEntry>, _> = serde_yaml::from_str(yaml);

        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_round_trips_through_json() {
        let nav = vec![
            NavEntry::link("index.md"),
            NavEntry::section("API", vec![NavEntry::titled("Foo", "api/foo.md")]),
        ];

        let json = serde_json::to_value(&nav).unwrap();

        assert_eq!(
            json,
            serde_json::json!(["index.md", {"API": [{"Foo": "api/foo.md"}]}])
        );
        let back: Vec<NavEntry> = serde_json::from_value(json).unwrap();
        assert_eq!(back, nav);
    }

    #[test]
    fn test_title() {
        assert_eq!(NavEntry::link("a.md").title(), None);
        assert_eq!(NavEntry::titled("A", "a.md").title(), Some("A"));
        assert_eq!(NavEntry::section("S", Vec::new()).title(), Some("S"));
    }
}
