//! Error types for fhevm-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    #[error("Unsupported encryption type: {0}")]
    UnsupportedEncryptionType(String),

    #[error("Library error: {0}")]
    Library(#[from] LibraryError),
}

/// Failure raised inside an encryption library implementation.
///
/// Carries only the library's message; dispatchers re-wrap it with a stable
/// error kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct LibraryError(pub String);

impl LibraryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
