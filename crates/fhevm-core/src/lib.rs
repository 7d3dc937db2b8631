//! fhevm-core: types, registry and validation for the FHEVM SDK
//!
//! This crate holds everything that does not touch the network:
//! - Network presets (gateway URL and ACL contract per chain)
//! - Validation helpers for addresses, chain ids, URLs and type names
//! - The closed [`EncryptionType`] set and the [`DecryptedValue`] sum type
//! - Envelope and handle layout for encrypted inputs
//! - Capability traits for the encryption library and the permission store
//!
//! The FHE cryptography itself lives behind [`FhevmLibrary`]. The bundled
//! [`mock::MockLibrary`] keeps plaintexts in the clear and exists for local
//! development and tests.

mod access;
mod config;
mod encryption_type;
mod envelope;
mod error;
mod library;
pub mod mock;
pub mod network;
mod validation;
mod value;

pub use access::{AccessChange, AccessControl, MemoryAccessControl};
pub use config::{FhevmConfig, VERSION};
pub use encryption_type::EncryptionType;
pub use envelope::{EncryptedEnvelope, Handle, HANDLE_VERSION};
pub use error::{Error, LibraryError};
pub use library::{EncryptedInput, FhevmLibrary, InstanceParams, LibraryInstance, TypedPlaintext};
pub use network::{NetworkConfig, NETWORKS};
pub use validation::{
    bytes_to_hex, hex_to_bytes, normalize_address, parse_address, validate_address,
    validate_chain_id, validate_encryption_type, validate_url,
};
pub use value::{DecryptedValue, InputValue, MAX_SAFE_INTEGER};

pub use alloy_primitives::{Address, U256};

pub type Result<T> = std::result::Result<T, Error>;
