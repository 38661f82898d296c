//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - ABI decoding using alloy-dyn-abi
//! - The 4byte signature directory client
//! - Truffle artifact scanning
//! - Alloy-based chain reader

pub mod abi;
pub mod ethereum;

pub use abi::{AlloyAbiDecoder, ArtifactScanner, DirectoryOptions, FourByteDirectory};
pub use ethereum::{AlloyChainReader, LazyChainReader, ProviderConfig};
