//! Serializable form of decoded ABI values

use alloy_dyn_abi::DynSolValue;
use serde::Serialize;

/// A decoded argument after normalization.
///
/// Integers are decimal text so that 256-bit values survive any JSON reader.
/// Byte buffers and addresses are lowercase `0x` hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DecodedValue {
    Address(String),
    Integer(String),
    Bool(bool),
    Bytes(String),
    Text(String),
    List(Vec<DecodedValue>),
}

impl DecodedValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DecodedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<&str> {
        match self {
            DecodedValue::Address(addr) => Some(addr),
            _ => None,
        }
    }
}

/// Normalize a decoded value, recursing into arrays and tuples
#[allow(unreachable_patterns)]
pub fn normalize(value: &DynSolValue) -> DecodedValue {
    match value {
        DynSolValue::Bool(b) => DecodedValue::Bool(*b),
        DynSolValue::Int(i, _) => DecodedValue::Integer(i.to_string()),
        DynSolValue::Uint(u, _) => DecodedValue::Integer(u.to_string()),
        DynSolValue::Address(addr) => DecodedValue::Address(hex_string(addr.as_slice())),
        DynSolValue::FixedBytes(word, size) => {
            DecodedValue::Bytes(hex_string(&word.as_slice()[..(*size).min(32)]))
        }
        DynSolValue::Function(func) => DecodedValue::Bytes(hex_string(func.as_slice())),
        DynSolValue::Bytes(bytes) => DecodedValue::Bytes(hex_string(bytes)),
        DynSolValue::String(s) => DecodedValue::Text(s.clone()),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            DecodedValue::List(items.iter().map(normalize).collect())
        }
        other => DecodedValue::Text(format!("{other:?}")),
    }
}

/// Normalize a list of decoded values
pub fn normalize_all(values: &[DynSolValue]) -> Vec<DecodedValue> {
    values.iter().map(normalize).collect()
}

fn hex_string(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, FixedBytes, I256, U256};

    #[test]
    fn test_scalars() {
        let addr: Address = "0x0C4D665424c61c32229FDeBe04d0793eA5DA6ede".parse().unwrap();
        assert_eq!(
            normalize(&DynSolValue::Address(addr)),
            DecodedValue::Address("0x0c4d665424c61c32229fdebe04d0793ea5da6ede".into())
        );
        assert_eq!(
            normalize(&DynSolValue::Bool(true)),
            DecodedValue::Bool(true)
        );
        assert_eq!(
            normalize(&DynSolValue::Int(I256::from_dec_str("-5").unwrap(), 256)),
            DecodedValue::Integer("-5".into())
        );
    }

    #[test]
    fn test_large_uint_is_decimal_text() {
        let value = DynSolValue::Uint(U256::MAX, 256);
        assert_eq!(
            normalize(&value),
            DecodedValue::Integer(U256::MAX.to_string())
        );
    }

    #[test]
    fn test_bytes_are_lowercase_hex() {
        let value = DynSolValue::Bytes(vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(normalize(&value), DecodedValue::Bytes("0xdeadbeef".into()));

        let mut word = FixedBytes::<32>::ZERO;
        word[0] = 0xab;
        word[1] = 0xcd;
        let value = DynSolValue::FixedBytes(word, 2);
        assert_eq!(normalize(&value), DecodedValue::Bytes("0xabcd".into()));
    }

    #[test]
    fn test_nested_arrays() {
        let value = DynSolValue::Array(vec![
            DynSolValue::Array(vec![DynSolValue::Uint(U256::from(1), 256)]),
            DynSolValue::Array(vec![DynSolValue::Bytes(vec![0x01])]),
        ]);
        assert_eq!(
            normalize(&value),
            DecodedValue::List(vec![
                DecodedValue::List(vec![DecodedValue::Integer("1".into())]),
                DecodedValue::List(vec![DecodedValue::Bytes("0x01".into())]),
            ])
        );
    }

    #[test]
    fn test_serializes_to_plain_json() {
        let values = vec![
            DecodedValue::Address("0xabc".into()),
            DecodedValue::Integer("42".into()),
            DecodedValue::Bool(false),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"["0xabc","42",false]"#);
    }
}
