use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use tracing::info;

use medassist_common::{AnalysisResult, ExtractedText, Language, TextAnalysisRequest};

use crate::error::ApiError;
use crate::extract::{ImageForm, ValidatedJson};
use crate::normalize::normalize_analysis;
use crate::prompts::{self, Task};
use crate::AppState;

pub async fn api_analyze_text(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<TextAnalysisRequest>,
) -> Result<Json<AnalysisResult>, ApiError> {
    info!(language = %body.language, chars = body.text.chars().count(), "Text analysis request");

    let prompt = prompts::render(
        prompts::template(Task::TextAnalysis, body.language),
        &[
            ("context", body.context.as_str()),
            ("text", body.text.as_str()),
            ("format_instructions", prompts::format_instructions()),
        ],
    );
    let raw = state.llm.generate_text(&prompt).await?;

    Ok(Json(
        normalize_analysis(&raw).into_result(body.language, Utc::now()),
    ))
}

/// Structured image analysis, or plain text extraction when `extract_text_only` is set.
pub async fn api_analyze_image(
    State(state): State<Arc<AppState>>,
    form: ImageForm,
) -> Result<Response, ApiError> {
    info!(
        language = %form.language,
        bytes = form.file.len(),
        file_name = form.file_name.as_deref().unwrap_or(""),
        extract_text_only = form.extract_text_only,
        "Image analysis request"
    );

    if form.extract_text_only {
        let text = extract_text(&state, &form.file, form.language).await?;
        return Ok(Json(text).into_response());
    }

    let prompt = prompts::render(
        prompts::template(Task::ImageAnalysis, form.language),
        &[
            ("context", form.context.as_str()),
            ("format_instructions", prompts::format_instructions()),
        ],
    );
    let raw = state.llm.generate_text_with_image(&prompt, &form.file).await?;

    Ok(Json(normalize_analysis(&raw).into_result(form.language, Utc::now())).into_response())
}

pub async fn api_extract_text(
    State(state): State<Arc<AppState>>,
    form: ImageForm,
) -> Result<Json<ExtractedText>, ApiError> {
    info!(bytes = form.file.len(), "Text extraction request");

    Ok(Json(extract_text(&state, &form.file, form.language).await?))
}

async fn extract_text(
    state: &AppState,
    image: &[u8],
    language: Language,
) -> Result<ExtractedText, ApiError> {
    let prompt = prompts::template(Task::TextExtraction, language);
    let text = state.llm.generate_text_with_image(prompt, image).await?;
    Ok(ExtractedText { text })
}
