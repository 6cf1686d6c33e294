use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{error, info};

use medassist_common::MedAssistError;

/// Handler error. Validation failures are client faults (422), oversize bodies
/// are 413, and everything else is a server fault (500) carrying the original
/// message.
#[derive(Debug)]
pub struct ApiError(pub MedAssistError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            MedAssistError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            MedAssistError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MedAssistError> for ApiError {
    fn from(err: MedAssistError) -> Self {
        ApiError(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError(errors.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.0.to_string();

        if status.is_server_error() {
            error!(status = status.as_u16(), %detail, "Request failed");
        } else {
            info!(status = status.as_u16(), %detail, "Request rejected");
        }

        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}
