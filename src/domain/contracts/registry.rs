//! Network-scoped table of known contract addresses

use std::collections::BTreeMap;
use std::fmt;

use alloy_primitives::Address;
use serde::Serialize;

/// Chain identifier reported by the host (`eth_chainId`)
pub type NetworkId = u64;

/// Which of the known contracts an address belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractRole {
    Minter,
    Vault,
    Unknown,
}

impl ContractRole {
    /// Contract name as it appears in build artifacts
    pub fn contract_name(self) -> Option<&'static str> {
        match self {
            ContractRole::Minter => Some("SimpleNFT"),
            ContractRole::Vault => Some("NFTVault"),
            ContractRole::Unknown => None,
        }
    }

    pub fn from_contract_name(name: &str) -> Option<Self> {
        match name {
            "SimpleNFT" => Some(ContractRole::Minter),
            "NFTVault" => Some(ContractRole::Vault),
            _ => None,
        }
    }

    pub fn is_known(self) -> bool {
        self != ContractRole::Unknown
    }
}

impl fmt::Display for ContractRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractRole::Minter => f.write_str("minter"),
            ContractRole::Vault => f.write_str("vault"),
            ContractRole::Unknown => f.write_str("unknown"),
        }
    }
}

/// Deployed addresses of the known contracts on one network
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContractBindings {
    pub minter: Option<Address>,
    pub vault: Option<Address>,
}

impl ContractBindings {
    pub fn get(&self, role: ContractRole) -> Option<Address> {
        match role {
            ContractRole::Minter => self.minter,
            ContractRole::Vault => self.vault,
            ContractRole::Unknown => None,
        }
    }

    pub fn set(&mut self, role: ContractRole, address: Address) {
        match role {
            ContractRole::Minter => self.minter = Some(address),
            ContractRole::Vault => self.vault = Some(address),
            ContractRole::Unknown => {}
        }
    }

    /// Fill roles that are unset here from `other`
    pub fn fill_from(&mut self, other: &ContractBindings) {
        self.minter = self.minter.or(other.minter);
        self.vault = self.vault.or(other.vault);
    }

    /// Role of `to`, compared case-insensitively
    pub fn role_of(&self, to: &str) -> ContractRole {
        let to = to.trim().to_lowercase();
        [ContractRole::Minter, ContractRole::Vault]
            .into_iter()
            .find(|role| {
                self.get(*role)
                    .is_some_and(|addr| lowercase_hex(&addr) == to)
            })
            .unwrap_or(ContractRole::Unknown)
    }
}

/// The outcome of contract identification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifiedContract {
    pub role: ContractRole,
    pub address: Option<Address>,
}

impl IdentifiedContract {
    pub const UNKNOWN: Self = Self {
        role: ContractRole::Unknown,
        address: None,
    };
}

/// Source of contract bindings per network
///
/// The pipeline asks for bindings on every invocation, so an implementation
/// backed by live data is re-queried whenever the active network changes.
pub trait AddressBook: Send + Sync {
    fn bindings(&self, network: NetworkId) -> Option<ContractBindings>;
}

/// Immutable in-memory registry, built once from configuration and artifacts
#[derive(Debug, Clone, Default)]
pub struct ContractRegistry {
    networks: BTreeMap<NetworkId, ContractBindings>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `role` to `address` on `network`, replacing an earlier binding
    pub fn insert(&mut self, network: NetworkId, role: ContractRole, address: Address) {
        self.networks.entry(network).or_default().set(role, address);
    }

    /// Merge another registry into this one
    ///
    /// Bindings already present here win over those from `other`.
    pub fn merge(&mut self, other: ContractRegistry) {
        for (network, bindings) in other.networks {
            self.networks.entry(network).or_default().fill_from(&bindings);
        }
    }

    pub fn networks(&self) -> impl Iterator<Item = (&NetworkId, &ContractBindings)> {
        self.networks.iter()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

impl AddressBook for ContractRegistry {
    fn bindings(&self, network: NetworkId) -> Option<ContractBindings> {
        self.networks.get(&network).cloned()
    }
}

/// Identify the contract a transaction is sent to.
///
/// Missing bindings or a missing recipient both resolve to `Unknown`.
pub fn identify(bindings: Option<&ContractBindings>, to: Option<&str>) -> IdentifiedContract {
    let (Some(bindings), Some(to)) = (bindings, to) else {
        return IdentifiedContract::UNKNOWN;
    };

    let role = bindings.role_of(to);
    IdentifiedContract {
        role,
        address: bindings.get(role),
    }
}

fn lowercase_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}
