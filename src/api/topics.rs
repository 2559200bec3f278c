//! Topic API endpoints.

use axum::extract::{Path, State};

use super::{success, ApiResult};
use crate::models::{Notebook, Topic};
use crate::AppState;

/// GET /api/topics - List all topics.
pub async fn list_topics(State(state): State<AppState>) -> ApiResult<Vec<Topic>> {
    success(state.catalog.topics.clone())
}

/// GET /api/topics/:id/notebooks - Notebooks under a topic.
pub async fn list_topic_notebooks(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Notebook>> {
    let notebooks = state.catalog.notebooks_for_topic(&id)?;
    success(notebooks.into_iter().cloned().collect())
}
