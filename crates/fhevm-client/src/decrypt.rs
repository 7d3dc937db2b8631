//! Decryption requests and decryption-permission management

use serde_json::Value;

use fhevm_core::{
    hex_to_bytes, parse_address, validate_address, AccessChange, DecryptedValue, U256,
};

use crate::error::{ClientError, Result};
use crate::gateway::DecryptRequest;
use crate::instance::{require_ready, Instance};

/// Ciphertext as handed over by a contract call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ciphertext {
    /// Hex text, with or without `0x`
    Hex(String),
    Bytes(Vec<u8>),
}

impl Ciphertext {
    /// Raw bytes regardless of input form
    pub fn to_bytes(&self) -> fhevm_core::Result<Vec<u8>> {
        match self {
            Ciphertext::Hex(s) => hex_to_bytes(s),
            Ciphertext::Bytes(b) => Ok(b.clone()),
        }
    }
}

impl From<&str> for Ciphertext {
    fn from(s: &str) -> Self {
        Ciphertext::Hex(s.to_string())
    }
}

impl From<String> for Ciphertext {
    fn from(s: String) -> Self {
        Ciphertext::Hex(s)
    }
}

impl From<Vec<u8>> for Ciphertext {
    fn from(b: Vec<u8>) -> Self {
        Ciphertext::Bytes(b)
    }
}

impl From<&[u8]> for Ciphertext {
    fn from(b: &[u8]) -> Self {
        Ciphertext::Bytes(b.to_vec())
    }
}

fn parse_integer(value: &Value) -> std::result::Result<U256, String> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(U256::from)
            .ok_or_else(|| format!("not an unsigned integer: {}", n)),
        Value::String(s) => {
            let parsed = match s.strip_prefix("0x") {
                Some(hex) => U256::from_str_radix(hex, 16),
                None => U256::from_str_radix(s, 10),
            };
            parsed.map_err(|e| format!("invalid integer {:?}: {}", s, e))
        }
        other => Err(format!("unexpected value {}", other)),
    }
}

fn parse_bool(value: &Value) -> std::result::Result<bool, String> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s == "true" => Ok(true),
        Value::String(s) if s == "false" || s.is_empty() => Ok(false),
        other => parse_integer(other).map(|n| !n.is_zero()),
    }
}

/// Interpret a gateway `{value, type}` pair.
///
/// `bool` (declared or a JSON boolean) stays boolean; `address` (declared,
/// or an undeclared 0x-address string) stays a string; everything else is
/// an unsigned integer, widened to `BigInt` above the safe-integer range.
pub fn parse_decrypted_value(
    value: &Value,
    ty: Option<&str>,
) -> std::result::Result<DecryptedValue, String> {
    if ty == Some("bool") || value.is_boolean() {
        return parse_bool(value).map(DecryptedValue::Bool);
    }

    match (ty, value) {
        (Some("address"), Value::String(s)) if validate_address(s) => {
            return Ok(DecryptedValue::Address(s.clone()))
        }
        (Some("address"), other) => {
            return Err(format!("not an address: {}", other))
        }
        (None, Value::String(s)) if validate_address(s) => {
            return Ok(DecryptedValue::Address(s.clone()))
        }
        _ => {}
    }

    parse_integer(value).map(DecryptedValue::from_integer)
}

/// Ask the gateway to decrypt `ciphertext` held by `contract_address`.
///
/// Addresses are validated before any request is sent. A non-2xx response
/// fails with `GatewayRequestFailed`; transport and parse errors fail with
/// `DecryptionFailed`.
pub async fn decrypt_output(
    instance: Option<&Instance>,
    ciphertext: Ciphertext,
    contract_address: &str,
    user_address: Option<&str>,
) -> Result<DecryptedValue> {
    let instance = require_ready(instance)?;

    if !validate_address(contract_address) {
        return Err(ClientError::InvalidContractAddress(contract_address.to_string()));
    }
    if let Some(user) = user_address {
        if !validate_address(user) {
            return Err(ClientError::InvalidUserAddress(user.to_string()));
        }
    }

    let bytes = ciphertext
        .to_bytes()
        .map_err(|e| ClientError::DecryptionFailed(e.to_string()))?;

    let request = DecryptRequest {
        ciphertext: bytes,
        contract_address: contract_address.to_string(),
        user_address: user_address.map(str::to_string),
    };

    tracing::debug!(
        contract = contract_address,
        bytes = request.ciphertext.len(),
        gateway = instance.gateway_url(),
        "Requesting decryption"
    );

    let response = instance.gateway.decrypt(&request).await.map_err(|e| match e {
        e @ ClientError::GatewayRequestFailed { .. } => e,
        other => ClientError::DecryptionFailed(other.to_string()),
    })?;

    parse_decrypted_value(&response.value, response.ty.as_deref())
        .map_err(ClientError::DecryptionFailed)
}

/// Validate both addresses and build the permission entry
fn access_change(
    instance: &Instance,
    contract_address: &str,
    user_address: &str,
) -> Result<AccessChange> {
    if !validate_address(contract_address) {
        return Err(ClientError::InvalidContractAddress(contract_address.to_string()));
    }
    if !validate_address(user_address) {
        return Err(ClientError::InvalidUserAddress(user_address.to_string()));
    }
    let acl = instance
        .config
        .acl_address
        .as_deref()
        .ok_or(ClientError::MissingAclAddress)?;

    Ok(AccessChange {
        acl_address: parse_address(acl)?,
        contract_address: parse_address(contract_address)
            .map_err(|_| ClientError::InvalidContractAddress(contract_address.to_string()))?,
        user_address: parse_address(user_address)
            .map_err(|_| ClientError::InvalidUserAddress(user_address.to_string()))?,
    })
}

/// Allow `user_address` to decrypt data held by `contract_address`
pub async fn grant_access(
    instance: Option<&Instance>,
    contract_address: &str,
    user_address: &str,
) -> Result<()> {
    let instance = require_ready(instance)?;
    let change = access_change(instance, contract_address, user_address)?;

    instance
        .access
        .grant(change)
        .await
        .map_err(|e| ClientError::AccessGrantFailed(e.to_string()))?;

    tracing::info!(
        contract = contract_address,
        user = user_address,
        "Decryption permission granted"
    );
    Ok(())
}

/// Withdraw a permission granted by [`grant_access`]
pub async fn revoke_access(
    instance: Option<&Instance>,
    contract_address: &str,
    user_address: &str,
) -> Result<()> {
    let instance = require_ready(instance)?;
    let change = access_change(instance, contract_address, user_address)?;

    instance
        .access
        .revoke(change)
        .await
        .map_err(|e| ClientError::AccessRevokeFailed(e.to_string()))?;

    tracing::info!(
        contract = contract_address,
        user = user_address,
        "Decryption permission revoked"
    );
    Ok(())
}

/// Whether `user_address` may decrypt data held by `contract_address`.
///
/// Never fails: an unready instance, a malformed address or an unreachable
/// permission store all answer `false`.
pub async fn has_access(
    instance: Option<&Instance>,
    contract_address: &str,
    user_address: &str,
) -> bool {
    let Ok(instance) = require_ready(instance) else {
        return false;
    };
    let Ok(change) = access_change(instance, contract_address, user_address) else {
        return false;
    };

    match instance.access.check(change).await {
        Ok(allowed) => allowed,
        Err(e) => {
            tracing::warn!(error = %e, contract = contract_address, "Permission check failed");
            false
        }
    }
}

impl Instance {
    pub async fn decrypt(
        &self,
        ciphertext: impl Into<Ciphertext>,
        contract_address: &str,
        user_address: Option<&str>,
    ) -> Result<DecryptedValue> {
        decrypt_output(Some(self), ciphertext.into(), contract_address, user_address).await
    }

    pub async fn grant_access(&self, contract_address: &str, user_address: &str) -> Result<()> {
        grant_access(Some(self), contract_address, user_address).await
    }

    pub async fn revoke_access(&self, contract_address: &str, user_address: &str) -> Result<()> {
        revoke_access(Some(self), contract_address, user_address).await
    }

    pub async fn has_access(&self, contract_address: &str, user_address: &str) -> bool {
        has_access(Some(self), contract_address, user_address).await
    }
}
