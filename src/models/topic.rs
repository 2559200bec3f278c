//! Topic model used to group notebooks on the catalog page.

use serde::{Deserialize, Serialize};

use super::Notebook;

/// A browsable topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub name: String,
    /// CSS background for the topic card
    pub background_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub related_tags: Vec<String>,
}

impl Topic {
    /// Whether the notebook belongs under this topic.
    ///
    /// Without related tags a topic matches notebooks tagged with its own name.
    pub fn includes(&self, notebook: &Notebook) -> bool {
        if self.related_tags.is_empty() {
            return notebook.has_tag(&self.name);
        }
        self.related_tags.iter().any(|tag| notebook.has_tag(tag))
    }
}
