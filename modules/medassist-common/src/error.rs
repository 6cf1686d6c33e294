use thiserror::Error;

pub type Result<T> = std::result::Result<T, MedAssistError>;

#[derive(Error, Debug)]
pub enum MedAssistError {
    /// Request payload is malformed or out of range. Raised before any provider call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request body exceeded the configured upload limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Language-model or search backend failure, including image decode failures.
    #[error("{0}")]
    Provider(String),

    /// Model output was not the structured data that was asked for.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MedAssistError {
    pub fn provider(err: impl std::fmt::Display) -> Self {
        MedAssistError::Provider(err.to_string())
    }

    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            MedAssistError::Validation(_) | MedAssistError::PayloadTooLarge(_)
        )
    }
}

impl From<validator::ValidationErrors> for MedAssistError {
    fn from(errors: validator::ValidationErrors) -> Self {
        MedAssistError::Validation(errors.to_string())
    }
}
