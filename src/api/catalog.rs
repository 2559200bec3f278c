//! Catalog API endpoint.

use axum::extract::State;

use super::{success, ApiResult};
use crate::models::Catalog;
use crate::AppState;

/// GET /api/catalog - The full catalog.
pub async fn get_catalog(State(state): State<AppState>) -> ApiResult<Catalog> {
    success(state.catalog.as_ref().clone())
}
