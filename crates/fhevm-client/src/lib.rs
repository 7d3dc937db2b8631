//! fhevm-client: instance lifecycle plus encrypt/decrypt dispatch
//!
//! Create an [`Instance`] from a [`FhevmConfig`], then encrypt contract
//! inputs locally and ask the gateway to decrypt results. Every operation
//! takes `Option<&Instance>` and fails with [`ClientError::NotReady`] when
//! no ready instance is supplied.

pub mod decrypt;
pub mod encrypt;
pub mod error;
pub mod gateway;
pub mod instance;

pub use decrypt::{
    decrypt_output, grant_access, has_access, parse_decrypted_value, revoke_access, Ciphertext,
};
pub use encrypt::{detect_encryption_type, encrypt_batch, encrypt_input, EncryptEntry};
pub use error::{ClientError, Result};
pub use gateway::{GatewayAccessControl, GatewayClient};
pub use instance::{
    create_fhevm_instance, is_fhevm_ready, refresh_fhevm_instance, Instance, InstanceManager,
};

pub use fhevm_core;
pub use fhevm_core::{DecryptedValue, EncryptedEnvelope, EncryptionType, FhevmConfig, InputValue};
