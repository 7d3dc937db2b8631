//! Encryption dispatch: type detection, value preparation, library call

use futures::future::try_join_all;

use fhevm_core::{
    parse_address, validate_address, Address, EncryptedEnvelope, EncryptedInput, EncryptionType,
    InputValue, U256,
};

use crate::error::{ClientError, Result};
use crate::instance::{require_ready, Instance};

/// One item of a batch encryption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptEntry {
    pub value: InputValue,
    pub ty: Option<EncryptionType>,
}

impl EncryptEntry {
    pub fn new(value: impl Into<InputValue>, ty: Option<EncryptionType>) -> Self {
        Self {
            value: value.into(),
            ty,
        }
    }
}

/// Plaintext after coercion to the chosen type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prepared {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Address(Address),
}

/// Pick a type for `value` when the caller did not declare one.
///
/// Booleans map to `bool`, address strings to `address`, and non-negative
/// integers to the smallest of `uint8/16/32/64` that holds them.
pub fn detect_encryption_type(value: &InputValue) -> Result<EncryptionType> {
    match value {
        InputValue::Bool(_) => Ok(EncryptionType::Bool),
        InputValue::Text(s) if validate_address(s) => Ok(EncryptionType::Address),
        InputValue::Text(s) => Err(ClientError::UnsupportedStringValue(s.clone())),
        InputValue::Int(v) if *v < 0 => Err(ClientError::NegativeValueNotSupported),
        InputValue::Int(v) => Ok(EncryptionType::smallest_for(*v as u128)),
    }
}

/// Parse decimal or `0x` hex text as an unsigned integer
fn parse_integer_text(s: &str) -> Option<U256> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.strip_prefix("0x") {
        Some(hex) if !hex.is_empty() => U256::from_str_radix(hex, 16).ok(),
        Some(_) => None,
        None => U256::from_str_radix(trimmed, 10).ok(),
    }
}

/// Coerce `value` to an unsigned integer no wider than `ty`
fn to_uint(value: &InputValue, ty: EncryptionType) -> Result<U256> {
    let n = match value {
        InputValue::Int(v) => U256::from(*v as u128),
        InputValue::Bool(b) => U256::from(*b as u8),
        InputValue::Text(s) => parse_integer_text(s)
            .ok_or_else(|| ClientError::UnsupportedStringValue(s.clone()))?,
    };
    let max = ty.max_value().map(U256::from).unwrap_or(U256::MAX);
    if n > max {
        return Err(ClientError::ValueOutOfRange {
            value: n.to_string(),
            ty,
        });
    }
    Ok(n)
}

fn prepare(value: &InputValue, ty: EncryptionType) -> Result<Prepared> {
    match ty {
        EncryptionType::Bool => Ok(Prepared::Bool(value.truthy())),
        EncryptionType::Address => match value {
            InputValue::Text(s) => Ok(Prepared::Address(parse_address(s)?)),
            _ => Err(ClientError::InvalidAddressType),
        },
        EncryptionType::Uint8 => Ok(Prepared::U8(to_uint(value, ty)?.to::<u8>())),
        EncryptionType::Uint16 => Ok(Prepared::U16(to_uint(value, ty)?.to::<u16>())),
        EncryptionType::Uint32 => Ok(Prepared::U32(to_uint(value, ty)?.to::<u32>())),
        EncryptionType::Uint64 => Ok(Prepared::U64(to_uint(value, ty)?.to::<u64>())),
    }
}

/// Add `prepared` through the width-specific builder method
fn add_to_input(input: &mut EncryptedInput, prepared: Prepared) {
    match prepared {
        Prepared::Bool(b) => input.add_bool(b),
        Prepared::U8(v) => input.add8(v),
        Prepared::U16(v) => input.add16(v),
        Prepared::U32(v) => input.add32(v),
        Prepared::U64(v) => input.add64(v),
        Prepared::Address(a) => input.add_address(a),
    };
}

/// Validate and encrypt a single value.
///
/// All validation runs before the library is called. Library failures come
/// back as `EncryptionFailed`; no partial envelope is returned.
pub async fn encrypt_input(
    instance: Option<&Instance>,
    value: InputValue,
    ty: Option<EncryptionType>,
) -> Result<EncryptedEnvelope> {
    let instance = require_ready(instance)?;

    if value.is_negative() {
        return Err(ClientError::NegativeValueNotSupported);
    }

    let ty = match ty {
        Some(ty) => ty,
        None => detect_encryption_type(&value)?,
    };
    let prepared = prepare(&value, ty)?;

    let mut input = EncryptedInput::new(instance.acl_address(), instance.chain_id());
    add_to_input(&mut input, prepared);

    tracing::debug!(ty = %ty, chain_id = instance.chain_id(), "Dispatching encryption");

    let handle = instance.handle.clone();
    let envelope = tokio::task::spawn_blocking(move || handle.encrypt(input))
        .await
        .map_err(|e| ClientError::EncryptionFailed(e.to_string()))?
        .map_err(|e| ClientError::EncryptionFailed(e.to_string()))?;

    Ok(envelope)
}

/// Encrypt every entry concurrently.
///
/// Results keep input order. Any failure fails the whole batch with the
/// first error observed.
pub async fn encrypt_batch(
    instance: Option<&Instance>,
    entries: Vec<EncryptEntry>,
) -> Result<Vec<EncryptedEnvelope>> {
    let count = entries.len();
    let envelopes = try_join_all(
        entries
            .into_iter()
            .map(|entry| encrypt_input(instance, entry.value, entry.ty)),
    )
    .await?;

    tracing::debug!(count, "Batch encryption complete");
    Ok(envelopes)
}

impl Instance {
    pub async fn encrypt(
        &self,
        value: impl Into<InputValue>,
        ty: Option<EncryptionType>,
    ) -> Result<EncryptedEnvelope> {
        encrypt_input(Some(self), value.into(), ty).await
    }

    pub async fn encrypt_batch(&self, entries: Vec<EncryptEntry>) -> Result<Vec<EncryptedEnvelope>> {
        encrypt_batch(Some(self), entries).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::tests::{test_instance, unready_instance};
    use fhevm_core::mock::decode_ciphertext;

    async fn detected_width(value: u64) -> EncryptionType {
        let instance = test_instance().await;
        let envelope = instance.encrypt(value, None).await.unwrap();
        envelope.handles[0].fhe_type().unwrap()
    }

    #[tokio::test]
    async fn test_auto_detect_boundaries() {
        let cases = [
            (0u64, EncryptionType::Uint8),
            (255, EncryptionType::Uint8),
            (256, EncryptionType::Uint16),
            (65535, EncryptionType::Uint16),
            (65536, EncryptionType::Uint32),
            (4294967295, EncryptionType::Uint32),
            (4294967296, EncryptionType::Uint64),
            (u64::MAX, EncryptionType::Uint64),
        ];
        for (value, expected) in cases {
            assert_eq!(detected_width(value).await, expected, "value {value}");
        }
    }

    #[tokio::test]
    async fn test_encrypt_42_selects_uint8() {
        let instance = test_instance().await;
        let envelope = encrypt_input(Some(&instance), 42u32.into(), None).await.unwrap();
        assert_eq!(envelope.handles.len(), 1);
        assert_eq!(envelope.handles[0].fhe_type(), Some(EncryptionType::Uint8));
        assert_eq!(envelope.handles[0].chain_id(), 31337);
        assert!(envelope.input_proof.starts_with("0x"));
    }

    #[test]
    fn test_detect_types() {
        assert_eq!(detect_encryption_type(&true.into()).unwrap(), EncryptionType::Bool);
        let addr = format!("0x{}", "a".repeat(40));
        assert_eq!(
            detect_encryption_type(&addr.as_str().into()).unwrap(),
            EncryptionType::Address
        );
        assert!(matches!(
            detect_encryption_type(&"hello".into()),
            Err(ClientError::UnsupportedStringValue(_))
        ));
        assert!(matches!(
            detect_encryption_type(&format!("0x{}", "g".repeat(40)).into()),
            Err(ClientError::UnsupportedStringValue(_))
        ));
    }

    #[tokio::test]
    async fn test_negative_rejected_for_every_type() {
        let instance = test_instance().await;
        let mut types: Vec<Option<EncryptionType>> =
            EncryptionType::ALL.into_iter().map(Some).collect();
        types.push(None);
        for ty in types {
            for v in [-1i64, -256, i64::MIN] {
                let err = instance.encrypt(v, ty).await.unwrap_err();
                assert!(
                    matches!(err, ClientError::NegativeValueNotSupported),
                    "{v} as {ty:?}: {err:?}"
                );
            }
            let err = instance.encrypt("-5", ty).await.unwrap_err();
            assert!(
                matches!(err, ClientError::NegativeValueNotSupported),
                "\"-5\" as {ty:?}: {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_address_type_checks() {
        let instance = test_instance().await;
        let err = instance.encrypt(5u8, Some(EncryptionType::Address)).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidAddressType));

        let err = instance
            .encrypt("not-an-address", Some(EncryptionType::Address))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidAddress(_)));

        let addr = "0x9D6891A6240D6130c54ae243d8005063D05fE14b";
        let envelope = instance.encrypt(addr, None).await.unwrap();
        assert_eq!(envelope.handles[0].fhe_type(), Some(EncryptionType::Address));
        let decoded = decode_ciphertext(&envelope.data).unwrap();
        assert_eq!(decoded[0].value, U256::from_str_radix(&addr[2..], 16).unwrap());
    }

    #[tokio::test]
    async fn test_explicit_type_range_check() {
        let instance = test_instance().await;
        let err = instance.encrypt(256u32, Some(EncryptionType::Uint8)).await.unwrap_err();
        assert!(matches!(err, ClientError::ValueOutOfRange { ty: EncryptionType::Uint8, .. }));

        let too_big = InputValue::Int(u64::MAX as i128 + 1);
        let err = instance.encrypt(too_big, None).await.unwrap_err();
        assert!(matches!(err, ClientError::ValueOutOfRange { ty: EncryptionType::Uint64, .. }));

        let envelope = instance.encrypt(255u32, Some(EncryptionType::Uint8)).await.unwrap();
        assert_eq!(envelope.handles[0].fhe_type(), Some(EncryptionType::Uint8));
    }

    #[tokio::test]
    async fn test_numeric_text_and_bool_coercion() {
        let instance = test_instance().await;
        let envelope = instance.encrypt("1000", Some(EncryptionType::Uint32)).await.unwrap();
        assert_eq!(decode_ciphertext(&envelope.data).unwrap()[0].value, U256::from(1000));

        let envelope = instance.encrypt("0xff", Some(EncryptionType::Uint16)).await.unwrap();
        assert_eq!(decode_ciphertext(&envelope.data).unwrap()[0].value, U256::from(255));

        let err = instance.encrypt("abc", Some(EncryptionType::Uint8)).await.unwrap_err();
        assert!(matches!(err, ClientError::UnsupportedStringValue(_)));

        let envelope = instance.encrypt(7u8, Some(EncryptionType::Bool)).await.unwrap();
        assert_eq!(decode_ciphertext(&envelope.data).unwrap()[0].value, U256::from(1));
    }

    #[tokio::test]
    async fn test_not_ready() {
        let err = encrypt_input(None, 1u8.into(), None).await.unwrap_err();
        assert!(matches!(err, ClientError::NotReady));

        let unready = unready_instance().await;
        let err = encrypt_input(Some(&unready), 1u8.into(), None).await.unwrap_err();
        assert!(matches!(err, ClientError::NotReady));
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let instance = test_instance().await;
        let envelopes = instance
            .encrypt_batch(vec![
                EncryptEntry::new(70_000u32, None),
                EncryptEntry::new(true, None),
                EncryptEntry::new(1u8, Some(EncryptionType::Uint64)),
            ])
            .await
            .unwrap();
        let types: Vec<_> = envelopes.iter().map(|e| e.handles[0].fhe_type().unwrap()).collect();
        assert_eq!(
            types,
            vec![EncryptionType::Uint32, EncryptionType::Bool, EncryptionType::Uint64]
        );
    }

    #[tokio::test]
    async fn test_batch_is_all_or_nothing() {
        let instance = test_instance().await;
        let result = instance
            .encrypt_batch(vec![
                EncryptEntry::new(1u8, Some(EncryptionType::Uint8)),
                EncryptEntry::new("not-an-address", Some(EncryptionType::Address)),
            ])
            .await;
        assert!(matches!(result, Err(ClientError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let instance = test_instance().await;
        assert!(instance.encrypt_batch(Vec::new()).await.unwrap().is_empty());
    }
}
