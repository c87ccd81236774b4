//! Query endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::info;

use super::state::AppState;
use super::types::{ApiError, AskParams, AskResponse, StatusResponse};

pub const STATUS_MESSAGE: &str = "Hybrid AI Chat is running!";

/// `GET /`
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: STATUS_MESSAGE.to_string(),
    })
}

/// `GET /ask?query=...`
pub async fn ask(
    State(state): State<AppState>,
    Query(params): Query<AskParams>,
) -> Result<Json<AskResponse>, ApiError> {
    let query = params
        .query
        .ok_or_else(|| ApiError::bad_request("Missing 'query' parameter").with_param("query"))?;

    info!(query_len = query.len(), "Answering query");
    let response = state
        .pipeline
        .answer(&query)
        .await
        .map_err(|e| ApiError::from(e).with_param("query"))?;

    Ok(Json(AskResponse {
        query: query.trim().to_string(),
        response,
    }))
}
