pub mod analysis;
pub mod research;

use std::sync::Arc;

use axum::{extract::State, response::Json};
use chrono::Utc;
use tracing::info;

use medassist_common::{ChatRequest, ChatResponse, HealthResponse};

use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::prompts::{self, Task};
use crate::AppState;

pub async fn api_health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(Utc::now()))
}

pub async fn api_chat(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    info!(language = %body.language, chars = body.message.chars().count(), "Chat request");

    let prompt = prompts::render(
        prompts::template(Task::Chat, body.language),
        &[("question", body.message.as_str())],
    );
    let response = state.llm.generate_text(&prompt).await?;

    Ok(Json(ChatResponse {
        response,
        language: body.language,
        timestamp: Utc::now(),
    }))
}
