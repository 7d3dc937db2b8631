//! Gateway state: permission store plus cleartext "decryption"

use std::sync::Arc;

use fhevm_core::mock::decode_ciphertext;
use fhevm_core::{
    parse_address, AccessChange, AccessControl, Address, EncryptionType, MemoryAccessControl,
    TypedPlaintext, MAX_SAFE_INTEGER, U256,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::metrics;

pub struct GatewayState {
    pub config: GatewayConfig,
    acl_address: Address,
    access: MemoryAccessControl,
    prometheus: Option<PrometheusHandle>,
}

pub type SharedState = Arc<GatewayState>;

impl GatewayState {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let acl_address = parse_address(&config.acl_address)?;
        Ok(Self {
            config,
            acl_address,
            access: MemoryAccessControl::new(),
            prometheus: None,
        })
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    pub fn acl_address(&self) -> Address {
        self.acl_address
    }

    pub fn render_metrics(&self) -> Option<String> {
        self.prometheus.as_ref().map(|h| h.render())
    }

    pub async fn grant_count(&self) -> usize {
        self.access.len().await
    }

    /// Decrypt the first value of `ciphertext` for `contract`.
    ///
    /// With `enforce_acl` on, naming a user requires a grant for that
    /// (contract, user) pair under the configured ACL contract.
    pub async fn decrypt(
        &self,
        ciphertext: &[u8],
        contract: &str,
        user: Option<&str>,
    ) -> Result<(Value, EncryptionType)> {
        let contract_address = parse_address(contract)?;

        if let (Some(user), true) = (user, self.config.enforce_acl) {
            let change = AccessChange {
                acl_address: self.acl_address,
                contract_address,
                user_address: parse_address(user)?,
            };
            if !self.check(change).await? {
                return Err(GatewayError::Forbidden {
                    contract: contract.to_string(),
                    user: user.to_string(),
                });
            }
        }

        let values = decode_ciphertext(ciphertext)
            .map_err(|e| GatewayError::Ciphertext(e.to_string()))?;
        let first = values
            .first()
            .ok_or_else(|| GatewayError::Ciphertext("no values in payload".to_string()))?;

        Ok((render_plaintext(first), first.ty))
    }

    pub async fn grant(&self, change: AccessChange) -> Result<()> {
        self.access
            .grant(change)
            .await
            .map_err(|e| GatewayError::Internal(e.to_string()))?;
        metrics::set_grants(self.access.len().await);
        Ok(())
    }

    pub async fn revoke(&self, change: AccessChange) -> Result<()> {
        self.access
            .revoke(change)
            .await
            .map_err(|e| GatewayError::Internal(e.to_string()))?;
        metrics::set_grants(self.access.len().await);
        Ok(())
    }

    pub async fn check(&self, change: AccessChange) -> Result<bool> {
        self.access
            .check(change)
            .await
            .map_err(|e| GatewayError::Internal(e.to_string()))
    }
}

/// JSON form of a plaintext: bool, checksummed address, or an integer that
/// switches to a decimal string above the safe-integer range
pub fn render_plaintext(plaintext: &TypedPlaintext) -> Value {
    match plaintext.ty {
        EncryptionType::Bool => Value::Bool(!plaintext.value.is_zero()),
        EncryptionType::Address => {
            let bytes = plaintext.value.to_be_bytes::<32>();
            Value::String(Address::from_slice(&bytes[12..]).to_checksum(None))
        }
        _ if plaintext.value <= U256::from(MAX_SAFE_INTEGER) => {
            Value::from(plaintext.value.to::<u64>())
        }
        _ => Value::String(plaintext.value.to_string()),
    }
}

pub fn create_shared_state(config: GatewayConfig) -> Result<SharedState> {
    Ok(Arc::new(GatewayState::new(config)?))
}
