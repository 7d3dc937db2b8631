//! fhevm-kit: FHEVM SDK core
//!
//! Umbrella crate re-exporting the workspace:
//! - [`fhevm_core`]: network registry, validation, value and envelope types
//! - [`fhevm_client`]: instance manager plus encryption and decryption dispatch
//! - [`fhevm_gateway`]: development decryption gateway

pub use fhevm_client;
pub use fhevm_core;
pub use fhevm_gateway;

pub use fhevm_client::{
    create_fhevm_instance, decrypt_output, encrypt_batch, encrypt_input, grant_access, has_access,
    is_fhevm_ready, refresh_fhevm_instance, revoke_access, ClientError, DecryptedValue,
    EncryptEntry, EncryptedEnvelope, EncryptionType, FhevmConfig, InputValue, Instance,
    InstanceManager,
};
pub use fhevm_core::VERSION;
