use std::sync::Arc;

use axum::{extract::State, response::Json};
use chrono::Utc;
use tracing::info;

use medassist_common::{ResearchRequest, ResearchResult, ResearchSummary};

use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::prompts::{self, Task};
use crate::AppState;

/// Only the highest-ranked hits are fed to the summary prompt.
pub const SUMMARY_SOURCES: usize = 3;

pub async fn api_research(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<ResearchRequest>,
) -> Result<Json<ResearchSummary>, ApiError> {
    info!(
        query = %body.query,
        max_results = body.max_results,
        language = %body.language,
        "Research request"
    );

    let results = state.search.search(&body.query, body.max_results).await?;

    let summary = if results.is_empty() {
        String::new()
    } else {
        let prompt = prompts::render(
            prompts::select(Task::ResearchSummary, &body.language),
            &[
                ("query", body.query.as_str()),
                ("sources", format_sources(&results).as_str()),
            ],
        );
        state.llm.generate_text(&prompt).await?
    };

    Ok(Json(ResearchSummary {
        query: body.query,
        results,
        summary,
        timestamp: Utc::now(),
    }))
}

/// Numbered source list built from the top [`SUMMARY_SOURCES`] results.
pub fn format_sources(results: &[ResearchResult]) -> String {
    results
        .iter()
        .take(SUMMARY_SOURCES)
        .enumerate()
        .map(|(i, r)| format!("[{}] {}\nURL: {}\n{}", i + 1, r.title, r.url, r.content.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}
