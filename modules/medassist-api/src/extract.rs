//! Request extractors that turn every kind of bad input into a client error.

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use medassist_common::{Language, MedAssistError};

use crate::error::ApiError;

/// JSON body that has been deserialized and passed its validation rules.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| rejected(rejection.status(), rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Multipart upload used by the image endpoints.
#[derive(Debug, Clone)]
pub struct ImageForm {
    pub file: Bytes,
    pub file_name: Option<String>,
    pub language: Language,
    pub context: String,
    pub extract_text_only: bool,
}

impl<S> FromRequest<S> for ImageForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| rejected(rejection.status(), rejection.body_text()))?;
        Ok(ImageForm::read(multipart).await?)
    }
}

impl ImageForm {
    async fn read(mut multipart: Multipart) -> Result<Self, MedAssistError> {
        let mut file = None;
        let mut file_name = None;
        let mut language = Language::default();
        let mut context = String::new();
        let mut extract_text_only = false;

        while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    file_name = field.file_name().map(str::to_string);
                    file = Some(field.bytes().await.map_err(invalid_form)?);
                }
                "language" => {
                    let tag = field.text().await.map_err(invalid_form)?;
                    if !tag.trim().is_empty() {
                        language = tag.parse()?;
                    }
                }
                "context" => context = field.text().await.map_err(invalid_form)?,
                "extract_text_only" => {
                    extract_text_only = parse_flag(&field.text().await.map_err(invalid_form)?)?;
                }
                _ => {}
            }
        }

        let file = file.filter(|bytes| !bytes.is_empty()).ok_or_else(|| {
            MedAssistError::Validation("file is required and must not be empty".to_string())
        })?;

        Ok(Self {
            file,
            file_name,
            language,
            context,
            extract_text_only,
        })
    }
}

fn invalid_form(err: axum::extract::multipart::MultipartError) -> MedAssistError {
    rejected(err.status(), err.body_text())
}

/// Body-limit rejections keep their 413; every other rejection is a validation error.
fn rejected(status: StatusCode, message: String) -> MedAssistError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        MedAssistError::PayloadTooLarge(message)
    } else {
        MedAssistError::Validation(message)
    }
}

fn parse_flag(raw: &str) -> Result<bool, MedAssistError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" | "" => Ok(false),
        other => Err(MedAssistError::Validation(format!(
            "extract_text_only must be a boolean (got {other:?})"
        ))),
    }
}
