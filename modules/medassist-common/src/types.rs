use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::MedAssistError;

/// Appended to every analysis, regardless of what the model returned.
pub const DISCLAIMER: &str = "This analysis is for informational purposes only and does not \
replace professional medical advice. Always consult a qualified healthcare provider.";

// --- Language ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Fr];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }

    /// Resolve a free-form tag, falling back to English for anything unsupported.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = MedAssistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "fr" => Ok(Language::Fr),
            other => Err(MedAssistError::Validation(format!(
                "language must be one of en, fr (got {other:?})"
            ))),
        }
    }
}

// --- Health ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy(timestamp: DateTime<Utc>) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp,
        }
    }
}

// --- Chat ---

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 1000))]
    pub message: String,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub language: Language,
    pub timestamp: DateTime<Utc>,
}

// --- Analysis ---

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TextAnalysisRequest {
    #[validate(length(min = 1))]
    pub text: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub language: Language,
}

/// The part of an analysis the model is asked to produce.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisFindings {
    /// A concise summary of the material in plain language.
    pub summary: String,
    /// The most important observations, most significant first.
    pub key_findings: Vec<String>,
    /// Practical recommendations for the reader.
    pub recommendations: Vec<String>,
    /// Concrete follow-up actions, such as which professional to consult.
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub key_findings: Vec<String>,
    pub recommendations: Vec<String>,
    pub next_steps: Vec<String>,
    pub disclaimer: String,
    pub language: Language,
    pub timestamp: DateTime<Utc>,
}

impl AnalysisResult {
    /// Attach the server-assigned fields to model findings.
    pub fn from_findings(
        findings: AnalysisFindings,
        language: Language,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            summary: findings.summary,
            key_findings: findings.key_findings,
            recommendations: findings.recommendations,
            next_steps: findings.next_steps,
            disclaimer: DISCLAIMER.to_string(),
            language,
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedText {
    pub text: String,
}

// --- Research ---

fn default_max_results() -> u32 {
    5
}

fn default_language_tag() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResearchRequest {
    #[validate(length(min = 3, max = 200))]
    pub query: String,
    #[serde(default = "default_max_results")]
    #[validate(range(min = 1, max = 10))]
    pub max_results: u32,
    #[serde(default = "default_language_tag")]
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub title: String,
    pub url: String,
    pub content: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchSummary {
    pub query: String,
    pub results: Vec<ResearchResult>,
    pub summary: String,
    pub timestamp: DateTime<Utc>,
}
