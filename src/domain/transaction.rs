//! Pending transactions as supplied by the host

use alloy_primitives::Selector;
use serde_json::Value;

use crate::domain::InsightError;

/// The fields of a pending transaction the pipeline looks at.
///
/// Anything else in the host's object is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingTransaction {
    pub to: Option<String>,
    pub data: Option<String>,
}

impl PendingTransaction {
    /// Pick `to` and `data` out of a host object. Non-string values count as absent.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };
        let field = |name: &str| object.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            to: field("to"),
            data: field("data"),
        }
    }

    /// Decode `data` into call data with a selector
    pub fn calldata(&self) -> Result<Calldata, InsightError> {
        let data = self
            .data
            .as_deref()
            .ok_or_else(|| InsightError::MalformedTransaction("no call data".into()))?;
        Calldata::from_hex(data)
    }
}

/// Call data split into selector and argument payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calldata {
    bytes: Vec<u8>,
}

impl Calldata {
    /// Parse hex call data, with or without the `0x` prefix
    pub fn from_hex(data: &str) -> Result<Self, InsightError> {
        let trimmed = data.trim();
        let payload = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if payload.len() < 8 {
            return Err(InsightError::MalformedTransaction(format!(
                "call data too short: {} hex chars, need at least 8",
                payload.len()
            )));
        }
        if payload.len() % 2 != 0 {
            return Err(InsightError::MalformedTransaction(
                "call data has odd length".into(),
            ));
        }

        let bytes = hex::decode(payload)
            .map_err(|e| InsightError::MalformedTransaction(format!("invalid hex: {e}")))?;
        Ok(Self { bytes })
    }

    pub fn selector(&self) -> Selector {
        Selector::from_slice(&self.bytes[..4])
    }

    /// Argument bytes after the selector
    pub fn payload(&self) -> &[u8] {
        &self.bytes[4..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_ignores_extra_fields() {
        let tx = PendingTransaction::from_value(&json!({
            "to": "0xabc",
            "data": "0x6088e93a",
            "gas": "0x5208",
            "value": "0x0"
        }));
        assert_eq!(tx.to.as_deref(), Some("0xabc"));
        assert_eq!(tx.data.as_deref(), Some("0x6088e93a"));
    }

    #[test]
    fn test_non_string_data_is_absent() {
        let tx = PendingTransaction::from_value(&json!({ "to": null, "data": 42 }));
        assert_eq!(tx, PendingTransaction::default());
        assert!(matches!(
            tx.calldata(),
            Err(InsightError::MalformedTransaction(_))
        ));

        let tx = PendingTransaction::from_value(&json!("0x6088e93a"));
        assert_eq!(tx, PendingTransaction::default());
    }

    #[test]
    fn test_short_calldata_is_malformed() {
        for data in ["0x", "0x6088e9", "6088e9", ""] {
            assert!(
                matches!(Calldata::from_hex(data), Err(InsightError::MalformedTransaction(_))),
                "{data:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_odd_length_and_bad_hex() {
        assert!(Calldata::from_hex("0x6088e93a0").is_err());
        assert!(Calldata::from_hex("0xzz88e93a").is_err());
    }

    #[test]
    fn test_selector_and_payload() {
        let calldata = Calldata::from_hex("0x6088E93A0102").unwrap();
        assert_eq!(hex::encode(calldata.selector().as_slice()), "6088e93a");
        assert_eq!(calldata.payload(), &[0x01, 0x02]);

        let bare = Calldata::from_hex("6088e93a").unwrap();
        assert!(bare.payload().is_empty());
    }
}
