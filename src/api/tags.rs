//! Tag API endpoints.

use axum::extract::State;

use super::{success, ApiResult};
use crate::models::Tag;
use crate::AppState;

/// GET /api/tags - Distinct tags used by the catalog.
pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Vec<Tag>> {
    success(state.catalog.tags())
}
