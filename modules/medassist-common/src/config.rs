use std::env;
use std::str::FromStr;

use crate::error::{MedAssistError, Result};

const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // AI providers
    pub google_api_key: String,
    pub tavily_api_key: String,
    pub gemini_model: String,
    pub temperature: f32,
    pub max_tokens: u32,

    // Web server
    pub web_host: String,
    pub web_port: u16,
    pub cors_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let temperature: f32 = parse_or(&var, "TEMPERATURE", 0.3)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(MedAssistError::Config(format!(
                "TEMPERATURE must be between 0.0 and 2.0, got {temperature}"
            )));
        }

        Ok(Self {
            google_api_key: required(&var, "GOOGLE_API_KEY")?,
            tavily_api_key: required(&var, "TAVILY_API_KEY")?,
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature,
            max_tokens: parse_or(&var, "MAX_TOKENS", 2048)?,
            web_host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            web_port: parse_or(&var, "PORT", 8000)?,
            cors_origins: split_origins(
                &var("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string()),
            ),
            max_upload_bytes: parse_or(&var, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.web_host, self.web_port)
    }

    /// True when `CORS_ORIGINS` contains the `*` wildcard.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

fn required(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    var(key).ok_or_else(|| MedAssistError::Config(format!("{key} environment variable is required")))
}

fn parse_or<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T> {
    match var(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| MedAssistError::Config(format!("{key} has an invalid value: {raw}"))),
        None => Ok(default),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
