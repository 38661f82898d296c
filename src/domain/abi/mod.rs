//! ABI domain models and contracts
//!
//! This module defines the traits and types for ABI decoding,
//! independent of the underlying implementation (alloy-dyn-abi).

mod decoder;
mod signature;
mod value;

pub use decoder::AbiDecoder;
pub use signature::{selector_hex, selector_of, FunctionSignature};
pub use value::{normalize, normalize_all, DecodedValue};
