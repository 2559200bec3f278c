//! Notebook API endpoints.

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult, ViewQuery};
use crate::errors::AppError;
use crate::models::Notebook;
use crate::render::{RenderedDocument, Renderer};
use crate::AppState;

/// Notebook list filters.
#[derive(Debug, Default, Deserialize)]
pub struct NotebookFilter {
    /// Only notebooks under this topic id.
    #[serde(default)]
    pub topic: Option<String>,
    /// Only notebooks carrying this tag name.
    #[serde(default)]
    pub tag: Option<String>,
}

/// A notebook with its rendered document.
#[derive(Debug, Serialize)]
pub struct NotebookView {
    pub notebook: Notebook,
    pub document: RenderedDocument,
}

/// GET /api/notebooks - List notebooks, optionally filtered.
pub async fn list_notebooks(
    State(state): State<AppState>,
    Query(filter): Query<NotebookFilter>,
) -> ApiResult<Vec<Notebook>> {
    let mut notebooks: Vec<&Notebook> = match &filter.tag {
        Some(tag) => state.catalog.notebooks_with_tag(tag),
        None => state.catalog.notebooks.iter().collect(),
    };

    if let Some(topic_id) = &filter.topic {
        let topic = state
            .catalog
            .topic(topic_id)
            .ok_or_else(|| AppError::NotFound(format!("Topic {} not found", topic_id)))?;
        notebooks.retain(|n| topic.includes(n));
    }

    success(notebooks.into_iter().cloned().collect())
}

/// GET /api/notebooks/:id - Get a single notebook entry.
pub async fn get_notebook(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Notebook> {
    match state.catalog.notebook(&id) {
        Some(notebook) => success(notebook.clone()),
        None => Err(AppError::NotFound(format!("Notebook {} not found", id))),
    }
}

/// GET /api/notebooks/:id/document - Load and render a notebook.
pub async fn get_notebook_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(view): Query<ViewQuery>,
) -> ApiResult<NotebookView> {
    let (notebook, document) = state.loader.open(&state.catalog, &id).await?;
    let renderer = Renderer::new(state.config.default_language.clone(), view.theme);

    success(NotebookView {
        notebook: notebook.clone(),
        document: renderer.render(&document),
    })
}
