//! Client error types
//!
//! One variant per failure kind so callers can match on the kind instead of
//! parsing messages. I/O failures keep the original message.

use fhevm_core::EncryptionType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("FHEVM instance is not ready; create one with create_fhevm_instance() first")]
    NotReady,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid contract address: {0}")]
    InvalidContractAddress(String),

    #[error("Invalid user address: {0}")]
    InvalidUserAddress(String),

    #[error("Invalid chain id: {0}")]
    InvalidChainId(u64),

    #[error("Invalid gateway URL: {0}")]
    InvalidGatewayUrl(String),

    #[error("Gateway URL is required; provide a network name or gateway_url")]
    MissingGatewayUrl,

    #[error("ACL address is required; provide a network name or acl_address")]
    MissingAclAddress,

    #[error("Failed to create FHEVM instance: {0}")]
    InstanceCreationFailed(String),

    #[error("Unsupported encryption type: {0}")]
    UnsupportedEncryptionType(String),

    #[error("Negative values are not supported")]
    NegativeValueNotSupported,

    #[error("String values must be Ethereum addresses or integers, got {0:?}")]
    UnsupportedStringValue(String),

    #[error("Address type requires a string value")]
    InvalidAddressType,

    #[error("Value {value} does not fit in {ty}")]
    ValueOutOfRange { value: String, ty: EncryptionType },

    #[error("Failed to encrypt input: {0}")]
    EncryptionFailed(String),

    #[error("Failed to decrypt output: {0}")]
    DecryptionFailed(String),

    #[error("Gateway request failed with status {status}: {message}")]
    GatewayRequestFailed { status: u16, message: String },

    #[error("Failed to grant access: {0}")]
    AccessGrantFailed(String),

    #[error("Failed to revoke access: {0}")]
    AccessRevokeFailed(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(fhevm_core::Error),
}

impl From<fhevm_core::Error> for ClientError {
    fn from(err: fhevm_core::Error) -> Self {
        match err {
            fhevm_core::Error::InvalidAddress(addr) => ClientError::InvalidAddress(addr),
            fhevm_core::Error::UnsupportedEncryptionType(ty) => {
                ClientError::UnsupportedEncryptionType(ty)
            }
            other => ClientError::Core(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
