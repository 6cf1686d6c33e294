mod client;
pub(crate) mod types;

use tracing::debug;

use crate::error::{AiError, Result};
use crate::image_part::prepare_image;
use client::GeminiClient;
use types::*;

// =============================================================================
// Gemini
// =============================================================================

#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    pub(crate) model: String,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
    base_url: Option<String>,
    http: reqwest::Client,
}

impl Gemini {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            temperature: None,
            max_output_tokens: None,
            base_url: None,
            http: reqwest::Client::new(),
        }
    }

    /// Override the API root. The URL must include the API version, e.g.
    /// `https://proxy.internal/v1beta`; model paths are appended to it.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn client(&self) -> GeminiClient {
        let client = GeminiClient::new(&self.api_key, self.http.clone());
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    /// Send a text-only prompt and return the model's text.
    pub async fn generate_text(&self, prompt: &str) -> Result<String> {
        self.generate(vec![Part::text(prompt)]).await
    }

    /// Send a prompt followed by one image. The image is validated locally first;
    /// bytes that cannot be decoded never reach the network.
    pub async fn generate_text_with_image(&self, prompt: &str, image: &[u8]) -> Result<String> {
        let inline = prepare_image(image)?;
        debug!(mime_type = inline.mime_type, bytes = image.len(), "Prepared image part");

        self.generate(vec![
            Part::text(prompt),
            Part::inline_data(inline.mime_type, inline.data),
        ])
        .await
    }

    async fn generate(&self, parts: Vec<Part>) -> Result<String> {
        let request = GenerateContentRequest::new()
            .content(Content::user(parts))
            .generation_config(self.temperature, self.max_output_tokens);

        let response = self.client().generate_content(&self.model, &request).await?;

        response
            .text()
            .ok_or_else(|| AiError::EmptyResponse(response.empty_reason()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_new() {
        let ai = Gemini::new("test-key", "gemini-1.5-flash")
            .with_temperature(0.4)
            .with_max_output_tokens(256);
        assert_eq!(ai.model(), "gemini-1.5-flash");
        assert_eq!(ai.api_key, "test-key");
        assert_eq!(ai.temperature, Some(0.4));
        assert_eq!(ai.max_output_tokens, Some(256));
    }

    #[test]
    fn test_gemini_with_base_url() {
        let ai = Gemini::new("test-key", "gemini-1.5-flash")
            .with_base_url("https://proxy.test/v1beta/");
        assert_eq!(ai.base_url.as_deref(), Some("https://proxy.test/v1beta/"));
    }

    #[test]
    fn endpoint_appends_model_path_to_versioned_base() {
        let default = Gemini::new("k", "gemini-1.5-flash").client();
        assert_eq!(
            default.endpoint("gemini-1.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );

        let proxied = Gemini::new("k", "gemini-1.5-pro")
            .with_base_url("http://proxy.test/v1beta/")
            .client();
        assert_eq!(
            proxied.endpoint("gemini-1.5-pro"),
            "http://proxy.test/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }

    #[tokio::test]
    async fn corrupt_image_fails_before_any_request() {
        // Port 9 (discard) is never contacted: decoding fails first.
        let ai = Gemini::new("test-key", "gemini-1.5-flash").with_base_url("http://127.0.0.1:9");
        let err = ai
            .generate_text_with_image("describe", b"\x89PNG\r\n\x1a\nbroken")
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Image(_)));
    }

    #[tokio::test]
    async fn invalid_api_key_header_is_a_config_error() {
        let client = GeminiClient::new("bad\nkey", reqwest::Client::new());
        let err = client
            .generate_content("m", &GenerateContentRequest::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Config(_)));
    }
}
