//! The two known contracts: addresses, operations and ABIs

mod operations;
mod registry;

use alloy_json_abi::JsonAbi;
use anyhow::{Context, Result};

pub use operations::{KnownOperation, Operation, SelectorTable};
pub use registry::{
    identify, AddressBook, ContractBindings, ContractRegistry, ContractRole, IdentifiedContract,
    NetworkId,
};

const VAULT_ABI: &str = include_str!("abi/NFTVault.json");
const MINTER_ABI: &str = include_str!("abi/SimpleNFT.json");

/// ABI of `NFTVault.sol`
pub fn vault_abi() -> Result<JsonAbi> {
    serde_json::from_str(VAULT_ABI).context("Failed to parse NFTVault ABI")
}

/// ABI of `SimpleNFT.sol`
pub fn minter_abi() -> Result<JsonAbi> {
    serde_json::from_str(MINTER_ABI).context("Failed to parse SimpleNFT ABI")
}
