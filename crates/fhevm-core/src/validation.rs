//! Validation and hex helpers
//!
//! Every `validate_*` function is total: it answers `false` instead of
//! failing, so callers can use them as guards before any I/O.

use alloy_primitives::Address;
use url::Url;

use crate::{EncryptionType, Error, Result};

/// `true` iff `s` is `0x` followed by exactly 40 hex digits (any case)
pub fn validate_address(s: &str) -> bool {
    match s.strip_prefix("0x") {
        Some(hex) => hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

/// `true` iff the chain id is a positive integer
pub fn validate_chain_id(chain_id: u64) -> bool {
    chain_id > 0
}

/// `true` iff `s` parses as an absolute URL
pub fn validate_url(s: &str) -> bool {
    Url::parse(s).is_ok()
}

/// `true` iff `s` names a member of [`EncryptionType`]
pub fn validate_encryption_type(s: &str) -> bool {
    s.parse::<EncryptionType>().is_ok()
}

/// Lower-case a valid address
pub fn normalize_address(s: &str) -> Result<String> {
    if !validate_address(s) {
        return Err(Error::InvalidAddress(s.to_string()));
    }
    Ok(s.to_ascii_lowercase())
}

/// Parse a valid address into its 20-byte form
pub fn parse_address(s: &str) -> Result<Address> {
    if !validate_address(s) {
        return Err(Error::InvalidAddress(s.to_string()));
    }
    s.parse::<Address>()
        .map_err(|_| Error::InvalidAddress(s.to_string()))
}

/// Decode hex with or without a `0x` prefix. The empty string decodes to no bytes.
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|e| Error::InvalidHex(format!("{}: {}", s, e)))
}

/// Encode bytes as lower-case hex, `0x`-prefixed when `prefix` is set
pub fn bytes_to_hex(bytes: &[u8], prefix: bool) -> String {
    if prefix {
        format!("0x{}", hex::encode(bytes))
    } else {
        hex::encode(bytes)
    }
}
