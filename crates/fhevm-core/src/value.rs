//! Plaintext values going into encryption and coming out of decryption

use alloy_primitives::U256;
use serde::{Serialize, Serializer};
use std::fmt;

/// Largest integer a JavaScript number holds exactly (2^53 - 1)
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

/// Plaintext accepted by the encryption dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputValue {
    Bool(bool),
    /// Signed so negative inputs can be represented and rejected
    Int(i128),
    /// Addresses, or integers written as decimal / `0x` hex text
    Text(String),
}

impl InputValue {
    /// Boolean coercion: non-zero integers and non-empty text are `true`
    pub fn truthy(&self) -> bool {
        match self {
            InputValue::Bool(b) => *b,
            InputValue::Int(v) => *v != 0,
            InputValue::Text(s) => !s.is_empty(),
        }
    }

    /// Negative integers, including negative decimal text such as `"-5"`
    pub fn is_negative(&self) -> bool {
        match self {
            InputValue::Int(v) => *v < 0,
            InputValue::Text(s) => match s.trim().strip_prefix('-') {
                Some(digits) => {
                    !digits.is_empty()
                        && digits.bytes().all(|b| b.is_ascii_digit())
                        && digits.bytes().any(|b| b != b'0')
                }
                None => false,
            },
            InputValue::Bool(_) => false,
        }
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputValue::Bool(b) => write!(f, "{}", b),
            InputValue::Int(v) => write!(f, "{}", v),
            InputValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for InputValue {
    fn from(v: bool) -> Self {
        InputValue::Bool(v)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for InputValue {
            fn from(v: $t) -> Self {
                InputValue::Int(v as i128)
            }
        })*
    };
}

impl_from_int!(u8, u16, u32, u64, i8, i16, i32, i64, i128);

impl From<&str> for InputValue {
    fn from(v: &str) -> Self {
        InputValue::Text(v.to_string())
    }
}

impl From<String> for InputValue {
    fn from(v: String) -> Self {
        InputValue::Text(v)
    }
}

/// Decrypted plaintext.
///
/// Integers up to [`MAX_SAFE_INTEGER`] are `Number`; anything larger is
/// `BigInt`. Callers branch on the variant, so the split point is fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecryptedValue {
    Number(u64),
    BigInt(U256),
    Bool(bool),
    Address(String),
}

impl DecryptedValue {
    /// Pick `Number` or `BigInt` for an unsigned integer
    pub fn from_integer(value: U256) -> Self {
        if value <= U256::from(MAX_SAFE_INTEGER) {
            DecryptedValue::Number(value.to::<u64>())
        } else {
            DecryptedValue::BigInt(value)
        }
    }

    /// Integer view of `Number` / `BigInt`
    pub fn as_u256(&self) -> Option<U256> {
        match self {
            DecryptedValue::Number(n) => Some(U256::from(*n)),
            DecryptedValue::BigInt(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DecryptedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<&str> {
        match self {
            DecryptedValue::Address(a) => Some(a),
            _ => None,
        }
    }
}

impl fmt::Display for DecryptedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecryptedValue::Number(n) => write!(f, "{}", n),
            DecryptedValue::BigInt(n) => write!(f, "{}", n),
            DecryptedValue::Bool(b) => write!(f, "{}", b),
            DecryptedValue::Address(a) => f.write_str(a),
        }
    }
}

/// Numbers serialize as JSON numbers, big integers as decimal strings
impl Serialize for DecryptedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DecryptedValue::Number(n) => serializer.serialize_u64(*n),
            DecryptedValue::BigInt(n) => serializer.serialize_str(&n.to_string()),
            DecryptedValue::Bool(b) => serializer.serialize_bool(*b),
            DecryptedValue::Address(a) => serializer.serialize_str(a),
        }
    }
}
