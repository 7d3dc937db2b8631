//! Capability traits for the underlying encryption library
//!
//! The SDK never performs FHE itself. A library implementation supplies
//! process-wide initialization, instance construction and the single-shot
//! encryption of an [`EncryptedInput`] batch.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;

use crate::{EncryptedEnvelope, EncryptionType, LibraryError};

/// Parameters a library instance is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceParams {
    pub chain_id: u64,
    pub gateway_url: String,
    pub acl_address: Address,
    /// Network public key; empty means "fetch from the gateway"
    pub public_key: Vec<u8>,
}

/// Entry point of an encryption library
#[async_trait]
pub trait FhevmLibrary: Send + Sync {
    /// One-time setup. Must be idempotent: the instance manager calls it on
    /// every instance creation.
    async fn init(&self) -> Result<(), LibraryError>;

    /// Build an instance bound to the given chain and gateway
    async fn create_instance(
        &self,
        params: InstanceParams,
    ) -> Result<Arc<dyn LibraryInstance>, LibraryError>;

    /// Short name used in logs
    fn name(&self) -> &'static str {
        "fhevm-library"
    }
}

/// A live library instance
pub trait LibraryInstance: Send + Sync {
    /// Encrypt every value accumulated in `input` in one shot
    fn encrypt(&self, input: EncryptedInput) -> Result<EncryptedEnvelope, LibraryError>;

    fn params(&self) -> &InstanceParams;
}

/// One plaintext stored in a pending batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedPlaintext {
    pub ty: EncryptionType,
    pub value: U256,
}

/// Short-lived builder for an encrypted input batch.
///
/// Values added here share the `acl_address` + `chain_id` pair. Each `add*`
/// stores exactly one value; handles come back in the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedInput {
    acl_address: Address,
    chain_id: u64,
    values: Vec<TypedPlaintext>,
}

impl EncryptedInput {
    pub fn new(acl_address: Address, chain_id: u64) -> Self {
        Self {
            acl_address,
            chain_id,
            values: Vec::new(),
        }
    }

    pub fn add8(&mut self, value: u8) -> &mut Self {
        self.push(EncryptionType::Uint8, U256::from(value))
    }

    pub fn add16(&mut self, value: u16) -> &mut Self {
        self.push(EncryptionType::Uint16, U256::from(value))
    }

    pub fn add32(&mut self, value: u32) -> &mut Self {
        self.push(EncryptionType::Uint32, U256::from(value))
    }

    pub fn add64(&mut self, value: u64) -> &mut Self {
        self.push(EncryptionType::Uint64, U256::from(value))
    }

    pub fn add_bool(&mut self, value: bool) -> &mut Self {
        self.push(EncryptionType::Bool, U256::from(value as u8))
    }

    /// Add an address at its native 160-bit width
    pub fn add_address(&mut self, value: Address) -> &mut Self {
        self.push(EncryptionType::Address, U256::from_be_slice(value.as_slice()))
    }

    fn push(&mut self, ty: EncryptionType, value: U256) -> &mut Self {
        self.values.push(TypedPlaintext { ty, value });
        self
    }

    pub fn acl_address(&self) -> Address {
        self.acl_address
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn values(&self) -> &[TypedPlaintext] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_order() {
        let mut input = EncryptedInput::new(Address::repeat_byte(0x11), 31337);
        input.add8(1).add_bool(true).add64(u64::MAX);
        let types: Vec<_> = input.values().iter().map(|v| v.ty).collect();
        assert_eq!(
            types,
            vec![EncryptionType::Uint8, EncryptionType::Bool, EncryptionType::Uint64]
        );
        assert_eq!(input.values()[2].value, U256::from(u64::MAX));
        assert_eq!(input.chain_id(), 31337);
    }

    #[test]
    fn test_address_keeps_full_width() {
        let addr = Address::repeat_byte(0xff);
        let mut input = EncryptedInput::new(Address::ZERO, 1);
        input.add_address(addr);
        let expected = (U256::from(1) << 160) - U256::from(1);
        assert_eq!(input.values()[0].value, expected);
    }
}
