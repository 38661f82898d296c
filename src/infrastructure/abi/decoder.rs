//! ABI decoder implementation using alloy-dyn-abi

use alloy_dyn_abi::{DynSolType, DynSolValue};

use crate::domain::abi::AbiDecoder;
use crate::domain::InsightError;

/// ABI decoder implementation using alloy-dyn-abi
#[derive(Debug, Default, Clone, Copy)]
pub struct AlloyAbiDecoder;

impl AlloyAbiDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl AbiDecoder for AlloyAbiDecoder {
    fn decode_arguments(
        &self,
        types: &[&str],
        payload: &[u8],
    ) -> Result<Vec<DynSolValue>, InsightError> {
        // Parse types from the signature
        let types: Vec<DynSolType> = types
            .iter()
            .map(|kind| {
                DynSolType::parse(kind)
                    .map_err(|e| InsightError::Decode(format!("unsupported type '{kind}': {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if types.is_empty() {
            return Ok(Vec::new());
        }

        // Decode as a parameter list: head/tail layout with offsets for dynamic types
        let decoded = DynSolType::Tuple(types)
            .abi_decode_params(payload)
            .map_err(|e| InsightError::Decode(format!("failed to decode arguments: {e}")))?;

        // Extract individual values from the tuple
        Ok(match decoded {
            DynSolValue::Tuple(values) => values,
            other => vec![other],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::{normalize_all, DecodedValue};
    use alloy_primitives::{Address, U256};

    fn nft() -> Address {
        "0x363006B693F3abbd9F476605A555c26642A39ed9".parse().unwrap()
    }

    #[test]
    fn test_decode_address_uint() {
        // withdrawNFT(0x3630..., 1) without the selector
        let payload = hex::decode(
            "000000000000000000000000363006b693f3abbd9f476605a555c26642a39ed90000000000000000000000000000000000000000000000000000000000000001"
        ).unwrap();

        let values = AlloyAbiDecoder::new()
            .decode_arguments(&["address", "uint256"], &payload)
            .unwrap();

        assert_eq!(values, vec![DynSolValue::Address(nft()), DynSolValue::Uint(U256::from(1), 256)]);
    }

    #[test]
    fn test_round_trip_representative_types() {
        let originals = vec![
            DynSolValue::Address(nft()),
            DynSolValue::Uint(U256::from(123_456_789u64), 256),
            DynSolValue::Bool(true),
            DynSolValue::Bytes(vec![0xca, 0xfe, 0xba, 0xbe, 0x00, 0x01]),
        ];
        let payload = DynSolValue::Tuple(originals.clone()).abi_encode_params();

        let decoded = AlloyAbiDecoder::new()
            .decode_arguments(&["address", "uint256", "bool", "bytes"], &payload)
            .unwrap();

        assert_eq!(normalize_all(&decoded), normalize_all(&originals));
        assert_eq!(
            normalize_all(&decoded),
            vec![
                DecodedValue::Address("0x363006b693f3abbd9f476605a555c26642a39ed9".into()),
                DecodedValue::Integer("123456789".into()),
                DecodedValue::Bool(true),
                DecodedValue::Bytes("0xcafebabe0001".into()),
            ]
        );
    }

    #[test]
    fn test_dynamic_string() {
        let payload =
            DynSolValue::Tuple(vec![DynSolValue::String("ipfs://token/1".into())]).abi_encode_params();
        let decoded = AlloyAbiDecoder::new()
            .decode_arguments(&["string"], &payload)
            .unwrap();
        assert_eq!(decoded, vec![DynSolValue::String("ipfs://token/1".into())]);
    }

    #[test]
    fn test_no_parameters() {
        let decoded = AlloyAbiDecoder::new().decode_arguments(&[], &[]).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_short_payload_is_decode_error() {
        let result = AlloyAbiDecoder::new().decode_arguments(&["address", "uint256"], &[0u8; 40]);
        assert!(matches!(result, Err(InsightError::Decode(_))));
    }

    #[test]
    fn test_unsupported_type_is_decode_error() {
        let result = AlloyAbiDecoder::new().decode_arguments(&["uint7"], &[0u8; 32]);
        assert!(matches!(result, Err(InsightError::Decode(_))));

        let result = AlloyAbiDecoder::new().decode_arguments(&["notatype"], &[0u8; 32]);
        assert!(matches!(result, Err(InsightError::Decode(_))));
    }
}
