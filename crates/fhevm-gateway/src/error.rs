//! Gateway error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("User {user} may not decrypt data held by {contract}")]
    Forbidden { contract: String, user: String },

    #[error("Undecryptable ciphertext: {0}")]
    Ciphertext(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            GatewayError::Forbidden { .. } => StatusCode::FORBIDDEN,
            GatewayError::Ciphertext(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Json(_) => StatusCode::BAD_REQUEST,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}

impl From<fhevm_core::Error> for GatewayError {
    fn from(err: fhevm_core::Error) -> Self {
        match err {
            fhevm_core::Error::InvalidAddress(a) => GatewayError::InvalidAddress(a),
            fhevm_core::Error::InvalidHex(h) => GatewayError::InvalidRequest(h),
            fhevm_core::Error::Library(e) => GatewayError::Ciphertext(e.to_string()),
            other => GatewayError::Internal(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
