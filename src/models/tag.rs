//! Tag model with the fixed name to color table.

use serde::{Deserialize, Serialize};

/// Color for tag names missing from the table.
pub const DEFAULT_TAG_COLOR: &str = "#64748b";

const TAG_COLORS: &[(&str, &str)] = &[
    ("Basics", "#22c55e"),
    ("DataFrame", "#3b82f6"),
    ("Kandy", "#f093fb"),
    ("API", "#06b6d4"),
    ("Ktor", "#ef4444"),
    ("Spring AI", "#43e97b"),
    ("Spring AI Tutorials", "#11998e"),
    ("Kotlin Language", "#7f52ff"),
    ("Charts", "#f093fb"),
    ("DataFrame Examples", "#667eea"),
    ("AI", "#8b5cf6"),
    ("LLM", "#ec4899"),
    ("Agents", "#f59e0b"),
    ("Features", "#8b5cf6"),
    ("HTTP", "#f97316"),
    ("Performance", "#eab308"),
    ("Finance", "#10b981"),
    ("Kotlin 2.2", "#a855f7"),
    ("Documentation", "#6b7280"),
];

/// Look up the display color for a tag name.
pub fn color_for(name: &str) -> &'static str {
    TAG_COLORS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_TAG_COLOR)
}

/// A notebook tag with its display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TagRecord")]
pub struct Tag {
    pub name: String,
    pub color: String,
}

impl Tag {
    /// Create a tag whose color comes from the table.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let color = color_for(&name).to_string();
        Self { name, color }
    }
}

/// Catalog files may list a tag as a bare name or as an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum TagRecord {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        color: Option<String>,
    },
}

impl From<TagRecord> for Tag {
    fn from(record: TagRecord) -> Self {
        match record {
            TagRecord::Name(name) => Tag::named(name),
            TagRecord::Full {
                name,
                color: Some(color),
            } => Tag { name, color },
            TagRecord::Full { name, color: None } => Tag::named(name),
        }
    }
}
