pub mod error;
pub mod types;

pub use error::{Result, TavilyError};
pub use types::{SearchDepth, SearchHit, SearchRequest, SearchResponse};

const BASE_URL: &str = "https://api.tavily.com";

pub struct TavilyClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TavilyClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Run an advanced-depth web search. Hits come back in the provider's ranking order.
    pub async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>> {
        tracing::info!(query, max_results, "Tavily search");

        let request = SearchRequest {
            query: query.to_string(),
            max_results,
            search_depth: SearchDepth::Advanced,
        };

        let url = format!("{}/search", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(TavilyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&body)?;
        tracing::info!(
            count = parsed.results.len(),
            response_time = parsed.response_time,
            "Tavily search complete"
        );

        Ok(parsed.results)
    }
}
