use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use common::storage::types::document::{DocumentKey, DocumentScope};
use tracing::debug;

use crate::{api_state::ApiState, error::ApiError};

/// Re-reads the whole `(language, doc_type)` directory and returns it ordered
/// by `order`, refreshing that scope of the cache.
pub async fn list_documents(
    State(state): State<ApiState>,
    Path((language, doc_type)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = DocumentScope::new(&language, &doc_type)?;
    let documents = state.cache.load_all_and_replace(&scope).await?;

    Ok(Json(documents))
}

pub async fn get_document(
    State(state): State<ApiState>,
    Path((language, doc_type, doc_id)): Path<(String, String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let key = DocumentKey::new(&language, &doc_type, &doc_id)?;
    debug!(%key, "Serving document");
    let document = state.cache.get_or_load(&key).await?;

    Ok(Json(document))
}
