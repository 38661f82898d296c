use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use alloy_primitives::Address;
use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use crate::domain::contracts::{ContractRegistry, ContractRole, NetworkId};
use crate::infrastructure::{ArtifactScanner, DirectoryOptions, ProviderConfig};
use crate::insight::ResolutionPolicy;

/// Local development chain the contracts are deployed to by default
pub const DEV_CHAIN_ID: NetworkId = 1337;
pub const DEV_MINTER: &str = "0x363006B693F3abbd9F476605A555c26642A39ed9";
pub const DEV_VAULT: &str = "0x0C4D665424c61c32229FDeBe04d0793eA5DA6ede";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChainConfig {
    pub rpc: Option<String>,
    pub ws: Option<String>,
    pub ipc: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkSpec {
    pub chain_id: NetworkId,
    pub name: Option<String>,
    pub minter: Option<String>,
    pub vault: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryOverride {
    pub chain_id: NetworkId,
    pub endpoint: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryConfig {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub networks: Vec<DirectoryOverride>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chain: ChainConfig,

    #[serde(default)]
    pub networks: Vec<NetworkSpec>,

    /// Truffle build directories to scan for deployed artifacts
    #[serde(default)]
    pub artifacts: Vec<String>,

    #[serde(default)]
    pub directory: DirectoryConfig,

    #[serde(default)]
    pub policy: ResolutionPolicy,

    pub log_level: Option<String>,
}

impl NetworkSpec {
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| format!("chain {}", self.chain_id))
    }

    fn bindings(&self) -> impl Iterator<Item = (ContractRole, &str)> {
        [
            (ContractRole::Minter, self.minter.as_deref()),
            (ContractRole::Vault, self.vault.as_deref()),
        ]
        .into_iter()
        .filter_map(|(role, address)| address.map(|a| (role, a)))
    }
}

impl Config {
    /// Contract bindings: configured networks, then the builtin dev chain, then artifacts.
    ///
    /// Earlier sources win. Unparsable addresses are skipped with a warning.
    pub fn registry(&self) -> ContractRegistry {
        let mut registry = ContractRegistry::new();
        for network in &self.networks {
            for (role, raw) in network.bindings() {
                match parse_address(raw) {
                    Ok(address) => registry.insert(network.chain_id, role, address),
                    Err(err) => warn!(
                        network = %network.display_name(),
                        %role,
                        "skipping contract address: {err:#}"
                    ),
                }
            }
        }

        registry.merge(builtin_registry());

        let roots = self.artifact_roots();
        if !roots.is_empty() {
            registry.merge(ArtifactScanner::scan_roots(&roots));
        }
        registry
    }

    pub fn artifact_roots(&self) -> Vec<PathBuf> {
        self.artifacts.iter().filter_map(|raw| expand_path(raw)).collect()
    }

    pub fn directory_options(&self) -> DirectoryOptions {
        let mut options = DirectoryOptions::default();
        if let Some(endpoint) = self.directory.endpoint.clone().filter(|s| !s.trim().is_empty()) {
            options.endpoint = endpoint;
        }
        options.network_endpoints = self
            .directory
            .networks
            .iter()
            .map(|o| (o.chain_id, o.endpoint.clone()))
            .collect::<HashMap<_, _>>();
        options.timeout = self.directory.timeout_secs.map(Duration::from_secs);
        options
    }

    /// Configured chain endpoint; IPC first, then WebSocket, then HTTP
    pub fn provider_config(&self) -> Option<ProviderConfig> {
        #[cfg(unix)]
        {
            if let Some(path) = self.chain.ipc.as_deref().and_then(expand_path) {
                return Some(ProviderConfig::Ipc(path));
            }
        }
        if let Some(ws) = self.chain.ws.clone().filter(|s| !s.trim().is_empty()) {
            return Some(ProviderConfig::WebSocket(ws));
        }
        self.chain
            .rpc
            .clone()
            .filter(|s| !s.trim().is_empty())
            .map(ProviderConfig::Http)
    }
}

/// The dev-chain deployment
pub fn builtin_registry() -> ContractRegistry {
    let mut registry = ContractRegistry::new();
    for (role, raw) in [(ContractRole::Minter, DEV_MINTER), (ContractRole::Vault, DEV_VAULT)] {
        if let Ok(address) = parse_address(raw) {
            registry.insert(DEV_CHAIN_ID, role, address);
        }
    }
    registry
}

/// Load the config file.
///
/// An explicit path must be readable. A missing file at the default location yields defaults.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_from(path);
    }
    match config_path() {
        Some(path) if path.exists() => load_from(&path),
        _ => Ok(Config::default()),
    }
}

pub fn load_from(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str::<Config>(&content).with_context(|| format!("Invalid config {}", path.display()))
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("VAULT_INSIGHTS_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("vault-insights").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("vault-insights").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "vault-insights", "vault-insights")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn expand_path(path: &str) -> Option<PathBuf> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
            return Some(home.join(rest));
        }
    }

    let mut buf = PathBuf::from(trimmed);
    if buf.is_relative() {
        if let Ok(cwd) = std::env::current_dir() {
            buf = cwd.join(buf);
        }
    }
    Some(buf)
}

fn parse_address(raw: &str) -> Result<Address> {
    raw.trim()
        .parse::<Address>()
        .with_context(|| format!("invalid address '{raw}'"))
}
