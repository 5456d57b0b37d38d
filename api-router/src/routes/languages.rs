use axum::{extract::State, response::IntoResponse, Json};

use crate::{api_state::ApiState, error::ApiError};

pub async fn list_languages(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let languages = state.cache.catalog().list_languages().await?;

    Ok(Json(languages))
}
