use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use common::{
    search::{search_documents, MIN_QUERY_CHARS},
    storage::types::document::normalize_segment,
};
use serde::Deserialize;
use tracing::info;

use crate::{api_state::ApiState, error::ApiError};

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

pub async fn search(
    State(state): State<ApiState>,
    Path(language): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let language = normalize_segment("language", &language)?;
    let query = params.q.trim();
    if query.chars().count() < MIN_QUERY_CHARS {
        return Err(ApiError::ValidationError(format!(
            "Search query must be at least {MIN_QUERY_CHARS} characters"
        )));
    }

    let documents = state.cache.load_language(&language).await?;
    let hits = search_documents(
        documents.iter().map(|doc| &**doc),
        query,
        state.config.search_result_limit,
    );
    info!(%language, query, hits = hits.len(), "Search completed");

    Ok(Json(hits))
}
