//! The static catalog of notebooks and topics.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Notebook, Tag, Topic};
use crate::errors::AppError;

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

/// Read-only catalog, loaded once at start-up.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub notebooks: Vec<Notebook>,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

impl Catalog {
    /// The catalog bundled with the binary.
    pub fn builtin() -> Result<Self, AppError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Load a catalog file from disk.
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::Config(format!(
                "Failed to read catalog {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate a catalog.
    pub fn from_json(content: &str) -> Result<Self, AppError> {
        let catalog: Catalog = serde_json::from_str(content)
            .map_err(|e| AppError::Config(format!("Invalid catalog: {}", e)))?;

        let mut seen = HashSet::new();
        for notebook in &catalog.notebooks {
            if !seen.insert(notebook.id.as_str()) {
                return Err(AppError::Config(format!(
                    "Duplicate notebook id in catalog: {}",
                    notebook.id
                )));
            }
        }

        Ok(catalog)
    }

    pub fn notebook(&self, id: &str) -> Option<&Notebook> {
        self.notebooks.iter().find(|n| n.id == id)
    }

    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    pub fn featured(&self) -> Vec<&Notebook> {
        self.notebooks.iter().filter(|n| n.featured).collect()
    }

    pub fn best_to_start(&self) -> Vec<&Notebook> {
        self.notebooks.iter().filter(|n| n.best_to_start).collect()
    }

    /// Notebooks under a topic, in catalog order.
    pub fn notebooks_for_topic(&self, topic_id: &str) -> Result<Vec<&Notebook>, AppError> {
        let topic = self
            .topic(topic_id)
            .ok_or_else(|| AppError::NotFound(format!("Topic {} not found", topic_id)))?;

        Ok(self
            .notebooks
            .iter()
            .filter(|n| topic.includes(n))
            .collect())
    }

    pub fn notebooks_with_tag(&self, tag: &str) -> Vec<&Notebook> {
        self.notebooks.iter().filter(|n| n.has_tag(tag)).collect()
    }

    /// Distinct tags across all notebooks, in first-seen order.
    pub fn tags(&self) -> Vec<Tag> {
        let mut seen = HashSet::new();
        self.notebooks
            .iter()
            .flat_map(|n| n.tags.iter())
            .filter(|t| seen.insert(t.name.clone()))
            .cloned()
            .collect()
    }
}
