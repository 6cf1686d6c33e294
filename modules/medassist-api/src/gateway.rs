use std::time::Instant;

use async_trait::async_trait;
use tracing::{info, warn};

use ai_client::Gemini;
use medassist_common::{Config, MedAssistError, ResearchResult, Result};
use tavily_client::TavilyClient;

// --- Traits ---

#[async_trait]
pub trait LanguageModelGateway: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String>;
    async fn generate_text_with_image(&self, prompt: &str, image: &[u8]) -> Result<String>;
}

#[async_trait]
pub trait SearchGateway: Send + Sync {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<ResearchResult>>;
}

// --- Gemini ---

pub struct GeminiGateway {
    ai: Gemini,
}

impl GeminiGateway {
    pub fn new(ai: Gemini) -> Self {
        Self { ai }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Gemini::new(&config.google_api_key, &config.gemini_model)
                .with_temperature(config.temperature)
                .with_max_output_tokens(config.max_tokens),
        )
    }
}

#[async_trait]
impl LanguageModelGateway for GeminiGateway {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let started = Instant::now();
        let text = self.ai.generate_text(prompt).await.map_err(|e| {
            warn!(model = self.ai.model(), error = %e, "Gemini text generation failed");
            MedAssistError::provider(e)
        })?;
        info!(
            model = self.ai.model(),
            prompt_chars = prompt.len(),
            response_chars = text.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Gemini text generation"
        );
        Ok(text)
    }

    async fn generate_text_with_image(&self, prompt: &str, image: &[u8]) -> Result<String> {
        let started = Instant::now();
        let text = self
            .ai
            .generate_text_with_image(prompt, image)
            .await
            .map_err(|e| {
                warn!(model = self.ai.model(), error = %e, "Gemini image generation failed");
                MedAssistError::provider(e)
            })?;
        info!(
            model = self.ai.model(),
            image_bytes = image.len(),
            response_chars = text.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Gemini image generation"
        );
        Ok(text)
    }
}

// --- Tavily ---

pub struct TavilyGateway {
    client: TavilyClient,
}

impl TavilyGateway {
    pub fn new(client: TavilyClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(TavilyClient::new(&config.tavily_api_key))
    }
}

#[async_trait]
impl SearchGateway for TavilyGateway {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<ResearchResult>> {
        let hits = self.client.search(query, max_results).await.map_err(|e| {
            warn!(error = %e, "Tavily search failed");
            MedAssistError::provider(e)
        })?;

        Ok(hits
            .into_iter()
            .map(|hit| ResearchResult {
                title: hit.title,
                url: hit.url,
                content: hit.content,
                score: hit.score,
            })
            .collect())
    }
}
