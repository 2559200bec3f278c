//! Search API endpoints.

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::models::Notebook;
use crate::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search query string.
    #[serde(default)]
    pub q: String,
    /// Maximum number of results (default: 8).
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    8
}

/// Search result with notebooks and metadata.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
    pub total: usize,
    pub limit: usize,
}

/// Single search result item.
#[derive(Debug, Serialize)]
pub struct SearchResultItem {
    pub notebook: Notebook,
    pub score: f32,
}

/// Maximum number of search results allowed.
const MAX_SEARCH_LIMIT: usize = 50;

/// GET /api/search - Search notebooks by title and tag.
pub async fn search_notebooks(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<SearchResponse> {
    let limit = params.limit.min(MAX_SEARCH_LIMIT);

    let results: Vec<SearchResultItem> = state
        .search
        .search(&params.q, limit)?
        .into_iter()
        .filter_map(|hit| {
            let notebook = state.catalog.notebook(&hit.notebook_id)?.clone();
            Some(SearchResultItem {
                notebook,
                score: hit.score,
            })
        })
        .collect();

    let total = results.len();

    success(SearchResponse {
        results,
        total,
        limit,
    })
}
