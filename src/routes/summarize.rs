use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{SummaryRequest, SummaryResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/summarize", post(summarize_article))
}

pub async fn summarize_article(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<SummaryResult>, AppError> {
    info!(
        "POST /summarize - title={:?} llm={}",
        request.title,
        state.summary_engine.llm_enabled()
    );

    let result = state.summary_engine.summarize(&request).await.map_err(|e| {
        error!("Summarization failed: {}", e);
        e
    })?;
    Ok(Json(result))
}
