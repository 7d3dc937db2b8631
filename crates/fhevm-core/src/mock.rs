//! Cleartext development library
//!
//! Implements the library capability without any cryptography: the payload
//! carries plaintexts in the clear so a development gateway can "decrypt"
//! them. Handles and input proofs follow the production layout, which makes
//! this backend suitable for local networks and tests only.
//!
//! Payload format, one 33-byte record per value:
//! ```text
//! [0]      FHE type id
//! [1..33)  value, big-endian 256-bit
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use alloy_primitives::U256;
use async_trait::async_trait;
use tiny_keccak::{Hasher, Keccak};

use crate::library::{EncryptedInput, FhevmLibrary, InstanceParams, LibraryInstance, TypedPlaintext};
use crate::validation::bytes_to_hex;
use crate::{EncryptedEnvelope, EncryptionType, Handle, LibraryError};

/// Bytes per encoded plaintext record
pub const RECORD_SIZE: usize = 33;

/// Most values one batch can hold. The proof's handle count is a single byte.
pub const MAX_BATCH_VALUES: usize = u8::MAX as usize;

const CIPHERTEXT_DOMAIN: &[u8] = b"ZK-w_rct";
const HANDLE_DOMAIN: &[u8] = b"ZK-w_hdl";

fn keccak256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    for part in parts {
        hasher.update(part);
    }
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// Encode plaintexts into the cleartext payload format
pub fn encode_ciphertext(values: &[TypedPlaintext]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * RECORD_SIZE);
    for v in values {
        out.push(v.ty.type_id());
        out.extend_from_slice(&v.value.to_be_bytes::<32>());
    }
    out
}

/// Decode a cleartext payload back into typed plaintexts
pub fn decode_ciphertext(data: &[u8]) -> Result<Vec<TypedPlaintext>, LibraryError> {
    if data.is_empty() || data.len() % RECORD_SIZE != 0 {
        return Err(LibraryError::new(format!(
            "payload length {} is not a positive multiple of {}",
            data.len(),
            RECORD_SIZE
        )));
    }
    data.chunks_exact(RECORD_SIZE)
        .map(|record| {
            let ty = EncryptionType::from_type_id(record[0]).ok_or_else(|| {
                LibraryError::new(format!("unknown FHE type id {}", record[0]))
            })?;
            let value = U256::from_be_slice(&record[1..]);
            Ok(TypedPlaintext { ty, value })
        })
        .collect()
}

fn check_width(plaintext: &TypedPlaintext) -> Result<(), LibraryError> {
    if plaintext.value.bit_len() > plaintext.ty.bits() as usize {
        return Err(LibraryError::new(format!(
            "value {} does not fit in {}",
            plaintext.value, plaintext.ty
        )));
    }
    Ok(())
}

/// Library whose instances produce cleartext payloads
#[derive(Debug, Default)]
pub struct MockLibrary {
    initialized: AtomicBool,
    init_calls: AtomicUsize,
}

impl MockLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Number of times `init` was invoked
    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FhevmLibrary for MockLibrary {
    async fn init(&self) -> Result<(), LibraryError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn create_instance(
        &self,
        params: InstanceParams,
    ) -> Result<Arc<dyn LibraryInstance>, LibraryError> {
        if !self.is_initialized() {
            return Err(LibraryError::new("library not initialized"));
        }
        Ok(Arc::new(MockInstance { params }))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Instance created by [`MockLibrary`]
#[derive(Debug)]
pub struct MockInstance {
    params: InstanceParams,
}

impl LibraryInstance for MockInstance {
    fn encrypt(&self, input: EncryptedInput) -> Result<EncryptedEnvelope, LibraryError> {
        if input.is_empty() {
            return Err(LibraryError::new("encrypted input has no values"));
        }
        if input.len() > MAX_BATCH_VALUES {
            return Err(LibraryError::new(format!(
                "encrypted input holds {} values, at most {} allowed",
                input.len(),
                MAX_BATCH_VALUES
            )));
        }
        for plaintext in input.values() {
            check_width(plaintext)?;
        }

        let data = encode_ciphertext(input.values());
        let blob_hash = keccak256(&[CIPHERTEXT_DOMAIN, &data]);
        let chain_word = U256::from(input.chain_id()).to_be_bytes::<32>();

        let handles: Vec<Handle> = input
            .values()
            .iter()
            .enumerate()
            .map(|(i, plaintext)| {
                let index = i as u8;
                let hash = keccak256(&[
                    HANDLE_DOMAIN,
                    &blob_hash,
                    &[index],
                    input.acl_address().as_slice(),
                    &chain_word,
                ]);
                Handle::compose(&hash, index, input.chain_id(), plaintext.ty)
            })
            .collect();

        // numHandles | numSigners | handles | payload hash
        let mut proof = Vec::with_capacity(2 + handles.len() * 32 + 32);
        proof.push(handles.len() as u8);
        proof.push(0);
        for handle in &handles {
            proof.extend_from_slice(handle.as_bytes());
        }
        proof.extend_from_slice(&blob_hash);

        Ok(EncryptedEnvelope {
            data,
            handles,
            input_proof: bytes_to_hex(&proof, true),
        })
    }

    fn params(&self) -> &InstanceParams {
        &self.params
    }
}
