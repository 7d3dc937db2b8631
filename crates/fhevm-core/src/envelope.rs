//! Encrypted envelopes and ciphertext handles

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::EncryptionType;

/// Handle layout version written into byte 31
pub const HANDLE_VERSION: u8 = 0;

/// 32-byte identifier for one encrypted value inside a batch.
///
/// Layout:
/// ```text
/// [0..21)   hash prefix
/// [21]      index within the batch
/// [22..30)  chain id, big-endian u64
/// [30]      FHE type id
/// [31]      handle version
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(pub B256);

impl Handle {
    /// Assemble a handle from its hash and metadata fields
    pub fn compose(hash: &[u8; 32], index: u8, chain_id: u64, ty: EncryptionType) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..21].copy_from_slice(&hash[..21]);
        bytes[21] = index;
        bytes[22..30].copy_from_slice(&chain_id.to_be_bytes());
        bytes[30] = ty.type_id();
        bytes[31] = HANDLE_VERSION;
        Handle(B256::from(bytes))
    }

    pub fn index(&self) -> u8 {
        self.0[21]
    }

    pub fn chain_id(&self) -> u64 {
        let mut id = [0u8; 8];
        id.copy_from_slice(&self.0[22..30]);
        u64::from_be_bytes(id)
    }

    /// Declared plaintext type, `None` if the type byte is unknown
    pub fn fhe_type(&self) -> Option<EncryptionType> {
        EncryptionType::from_type_id(self.0[30])
    }

    pub fn version(&self) -> u8 {
        self.0[31]
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0 .0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of one encryption call: ciphertext payload, one handle per value
/// (in insertion order) and the proof the receiving contract verifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedEnvelope {
    #[serde(with = "hex_bytes")]
    pub data: Vec<u8>,
    pub handles: Vec<Handle>,
    pub input_proof: String,
}

impl EncryptedEnvelope {
    /// Handle of the first encrypted value
    pub fn first_handle(&self) -> Option<&Handle> {
        self.handles.first()
    }
}

/// Serde helper for 0x-prefixed hex byte payloads
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&crate::validation::bytes_to_hex(bytes, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        crate::validation::hex_to_bytes(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_layout() {
        let hash = [0xabu8; 32];
        let handle = Handle::compose(&hash, 3, 11155111, EncryptionType::Uint16);
        assert_eq!(handle.index(), 3);
        assert_eq!(handle.chain_id(), 11155111);
        assert_eq!(handle.fhe_type(), Some(EncryptionType::Uint16));
        assert_eq!(handle.version(), HANDLE_VERSION);
        assert_eq!(&handle.as_bytes()[..21], &hash[..21]);
    }

    #[test]
    fn test_envelope_json_shape() {
        let envelope = EncryptedEnvelope {
            data: vec![0xde, 0xad],
            handles: vec![Handle::compose(&[0u8; 32], 0, 1, EncryptionType::Bool)],
            input_proof: "0x01".into(),
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["data"], "0xdead");
        assert_eq!(json["inputProof"], "0x01");
        assert!(json["handles"][0].as_str().unwrap().starts_with("0x"));

        let back: EncryptedEnvelope = serde_json::from_value(json).unwrap();
        assert_eq!(back, envelope);
    }
}
