pub mod error;
pub mod extract;
pub mod gateway;
pub mod normalize;
pub mod prompts;
pub mod rest;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use gateway::{GeminiGateway, LanguageModelGateway, SearchGateway, TavilyGateway};
use medassist_common::Config;

/// Per-process state. Gateways are stateless; nothing is shared between requests
/// besides them.
pub struct AppState {
    pub llm: Arc<dyn LanguageModelGateway>,
    pub search: Arc<dyn SearchGateway>,
}

impl AppState {
    pub fn new(llm: Arc<dyn LanguageModelGateway>, search: Arc<dyn SearchGateway>) -> Self {
        Self { llm, search }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(GeminiGateway::from_config(config)),
            Arc::new(TavilyGateway::from_config(config)),
        )
    }
}

pub fn build_router(state: Arc<AppState>, config: &Config) -> Router {
    Router::new()
        .route("/api/health", get(rest::api_health))
        .route("/api/chat", post(rest::api_chat))
        .route("/api/analyze-text", post(rest::analysis::api_analyze_text))
        .route("/api/analyze-image", post(rest::analysis::api_analyze_image))
        .route("/api/extract-text", post(rest::analysis::api_extract_text))
        .route("/api/analyze-image-text", post(rest::analysis::api_extract_text))
        .route("/api/research", post(rest::research::api_research))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors_layer(config))
        // Logging layer: method + path only, never bodies
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
