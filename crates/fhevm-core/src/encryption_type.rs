//! Encryption type identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Closed set of plaintext types an encrypted input can carry.
///
/// Parsing is exact: `"uint8"` is accepted, `"UINT8"` and `"u8"` are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncryptionType {
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Bool,
    Address,
}

impl EncryptionType {
    /// Every member of the set, in declaration order
    pub const ALL: [EncryptionType; 6] = [
        EncryptionType::Uint8,
        EncryptionType::Uint16,
        EncryptionType::Uint32,
        EncryptionType::Uint64,
        EncryptionType::Bool,
        EncryptionType::Address,
    ];

    /// Canonical name as used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            EncryptionType::Uint8 => "uint8",
            EncryptionType::Uint16 => "uint16",
            EncryptionType::Uint32 => "uint32",
            EncryptionType::Uint64 => "uint64",
            EncryptionType::Bool => "bool",
            EncryptionType::Address => "address",
        }
    }

    /// Plaintext width in bits
    pub fn bits(&self) -> u16 {
        match self {
            EncryptionType::Bool => 1,
            EncryptionType::Uint8 => 8,
            EncryptionType::Uint16 => 16,
            EncryptionType::Uint32 => 32,
            EncryptionType::Uint64 => 64,
            EncryptionType::Address => 160,
        }
    }

    /// FHE type id embedded in ciphertext handles
    pub fn type_id(&self) -> u8 {
        match self {
            EncryptionType::Bool => 0,
            EncryptionType::Uint8 => 2,
            EncryptionType::Uint16 => 3,
            EncryptionType::Uint32 => 4,
            EncryptionType::Uint64 => 5,
            EncryptionType::Address => 7,
        }
    }

    /// Inverse of [`EncryptionType::type_id`]
    pub fn from_type_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.type_id() == id)
    }

    /// Largest unsigned value representable, `None` for non-integer types
    pub fn max_value(&self) -> Option<u64> {
        match self {
            EncryptionType::Uint8 => Some(u8::MAX as u64),
            EncryptionType::Uint16 => Some(u16::MAX as u64),
            EncryptionType::Uint32 => Some(u32::MAX as u64),
            EncryptionType::Uint64 => Some(u64::MAX),
            EncryptionType::Bool | EncryptionType::Address => None,
        }
    }

    /// Smallest unsigned width that holds `value`.
    ///
    /// Thresholds are 255, 65535 and 4294967295; anything larger is `uint64`.
    pub fn smallest_for(value: u128) -> Self {
        if value <= u8::MAX as u128 {
            EncryptionType::Uint8
        } else if value <= u16::MAX as u128 {
            EncryptionType::Uint16
        } else if value <= u32::MAX as u128 {
            EncryptionType::Uint32
        } else {
            EncryptionType::Uint64
        }
    }

    pub fn is_integer(&self) -> bool {
        self.max_value().is_some()
    }
}

impl fmt::Display for EncryptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncryptionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| Error::UnsupportedEncryptionType(s.to_string()))
    }
}
