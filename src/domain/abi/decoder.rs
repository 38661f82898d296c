//! ABI decoder trait

use alloy_dyn_abi::DynSolValue;

use crate::domain::InsightError;

/// Decodes call arguments and return data against declared types
pub trait AbiDecoder: Send + Sync {
    /// Decode argument bytes against a list of parameter types
    ///
    /// # Arguments
    /// * `types` - Solidity type names in declaration order (e.g. `["address", "uint256"]`)
    /// * `payload` - The argument bytes, without the 4-byte selector
    ///
    /// # Returns
    /// * `Ok(values)` - One value per declared type
    /// * `Err(InsightError::Decode)` - Unsupported type or payload too short
    fn decode_arguments(
        &self,
        types: &[&str],
        payload: &[u8],
    ) -> Result<Vec<DynSolValue>, InsightError>;
}
