use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::client::ClientError;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ClientError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ClientError::InvalidVideoId(_) => StatusCode::BAD_REQUEST,
            ClientError::NotFound(_) => StatusCode::NOT_FOUND,
            ClientError::Transport(_) | ClientError::Status { .. } | ClientError::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for ClientError {
    fn into_response(self) -> Response {
        let code = self.status_code();
        if code.is_server_error() {
            error!("Upstream failure: {:#}", self);
        }
        let body = ErrorResponse {
            error: self.to_string(),
            code: code.as_u16(),
        };
        (code, Json(body)).into_response()
    }
}
