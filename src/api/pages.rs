//! HTML page handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use super::ViewQuery;
use crate::errors::AppError;
use crate::html;
use crate::render::{Renderer, Theme};
use crate::AppState;

/// Index page query: selected topic and theme.
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub theme: Theme,
}

/// Page-level failure rendered as an HTML error state.
pub struct PageError {
    error: AppError,
    theme: Theme,
}

impl PageError {
    fn new(error: AppError, theme: Theme) -> Self {
        Self { error, theme }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Page error: {}", self.error);
        } else {
            tracing::debug!("Page error: {}", self.error);
        }
        (status, Html(html::error_page(&self.error.message(), self.theme))).into_response()
    }
}

/// GET / - Catalog page.
pub async fn index_page(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> Result<Html<String>, PageError> {
    let selected = match query.topic.as_deref().filter(|t| !t.is_empty()) {
        Some(id) => Some(state.catalog.topic(id).ok_or_else(|| {
            PageError::new(
                AppError::NotFound(format!("Topic {} not found", id)),
                query.theme,
            )
        })?),
        None => None,
    };

    Ok(Html(html::index_page(&state.catalog, selected, query.theme)))
}

/// GET /notebook/:id - Notebook page.
pub async fn notebook_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(view): Query<ViewQuery>,
) -> Result<Html<String>, PageError> {
    let (notebook, document) = state
        .loader
        .open(&state.catalog, &id)
        .await
        .map_err(|e| PageError::new(e, view.theme))?;

    let rendered = Renderer::new(state.config.default_language.clone(), view.theme)
        .render(&document);

    Ok(Html(html::notebook_page(
        notebook,
        &rendered,
        &state.config.source_url,
        view.theme,
    )))
}
