use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

use crate::synthesis::SynthesisError;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Synthesis(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        // Vendor details stay in the logs
        let message = match &self {
            Self::Validation(message) => message.clone(),
            Self::Synthesis(_) => "Internal Server Error".to_string(),
        };
        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}
