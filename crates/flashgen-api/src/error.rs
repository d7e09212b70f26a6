//! HTTP mapping of FlashgenError
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use flashgen_core::FlashgenError;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    Flashgen(FlashgenError),
    Internal(String),
}

impl From<FlashgenError> for ApiError {
    fn from(err: FlashgenError) -> Self {
        ApiError::Flashgen(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Flashgen(err) => match err {
                FlashgenError::NotFound { .. } => StatusCode::NOT_FOUND,
                FlashgenError::MissingComponent { .. } => StatusCode::NOT_FOUND,
                FlashgenError::UnsupportedCombination(_) => StatusCode::UNPROCESSABLE_ENTITY,
                FlashgenError::InvalidImageRequest(_) => StatusCode::BAD_REQUEST,
                FlashgenError::ComponentTooLarge { .. }
                | FlashgenError::Catalog(_)
                | FlashgenError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Flashgen(err) => err.to_string(),
            ApiError::Internal(msg) => format!("INTERNAL/{}", msg),
        };

        if status.is_server_error() {
            tracing::error!(status = %status, error = %message, "request failed");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
