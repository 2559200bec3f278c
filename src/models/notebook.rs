//! Notebook catalog entry and its authors.

use serde::{Deserialize, Serialize};

use super::Tag;

/// Someone credited on a notebook.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub verified: bool,
}

impl Author {
    /// Up to two upper-cased initials, used when there is no avatar.
    pub fn initials(&self) -> String {
        self.name
            .split(' ')
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

/// A catalog entry pointing at a serialized notebook document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notebook {
    pub id: String,
    pub title: String,
    /// Display date, shown verbatim
    pub date: String,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Resource path of the document, relative to the assets root
    pub path: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub best_to_start: bool,
}

impl Notebook {
    /// Case-insensitive tag membership.
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(name: &str) -> Author {
        Author {
            name: name.to_string(),
            avatar: None,
            verified: false,
        }
    }

    #[test]
    fn test_initials() {
        assert_eq!(author("Kotlin team").initials(), "KT");
        assert_eq!(author("ada").initials(), "A");
        assert_eq!(author("Jean Luc Picard").initials(), "JL");
    }

    #[test]
    fn test_deserialize_defaults() {
        let notebook: Notebook = serde_json::from_str(
            r#"{"id": "import", "title": "Import", "date": "Dec 15, 2025",
                "tags": ["Basics"], "path": "/assets/import.ipynb"}"#,
        )
        .unwrap();

        assert!(notebook.authors.is_empty());
        assert!(!notebook.featured);
        assert!(!notebook.best_to_start);
        assert!(notebook.has_tag("basics"));
        assert!(!notebook.has_tag("Ktor"));
    }
}
