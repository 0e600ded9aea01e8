//! HTTP mapping of rating errors

use crate::error::MmrError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// A failed request on its way to the client
#[derive(Debug)]
pub enum ApiError {
    /// The rating operation itself failed
    Rating(MmrError),
    /// The body could not be read as the expected JSON
    InvalidBody(String),
    /// The service is stopped or not yet started
    Unavailable,
}

impl From<MmrError> for ApiError {
    fn from(error: MmrError) -> Self {
        Self::Rating(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Rating(e) if e.validation().is_some() => StatusCode::BAD_REQUEST,
            ApiError::Rating(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            // Rejections carry the validation message alone, without the wrapper text
            ApiError::Rating(e) => {
                let message = match e.validation() {
                    Some(validation) => validation.to_string(),
                    None => e.to_string(),
                };
                let mut body = json!({ "error": message });
                if let Some(index) = e.batch_index() {
                    body["index"] = json!(index);
                }
                body
            }
            ApiError::InvalidBody(message) => json!({ "error": message }),
            ApiError::Unavailable => json!({ "error": "Service is not running" }),
        };

        (status, Json(body)).into_response()
    }
}
