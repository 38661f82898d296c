//! Ethereum infrastructure - Alloy provider implementations

mod provider;

pub use provider::{AlloyChainReader, LazyChainReader, ProviderConfig};
