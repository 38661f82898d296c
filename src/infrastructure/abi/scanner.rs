//! Build artifact scanner - discovers deployed contract addresses on the filesystem

use std::fs;
use std::path::{Path, PathBuf};

use alloy_primitives::Address;
use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::contracts::{ContractRegistry, ContractRole, NetworkId};

/// Subset of a Truffle artifact (`build/contracts/<Name>.json`)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TruffleArtifact {
    contract_name: String,
    #[serde(default)]
    networks: std::collections::HashMap<String, TruffleDeployment>,
}

#[derive(Debug, Deserialize)]
struct TruffleDeployment {
    address: Option<String>,
}

/// Result of scanning artifact directories
#[derive(Debug, Default)]
pub struct ArtifactScan {
    pub registry: ContractRegistry,
    pub scanned_files: usize,
    pub errors: Vec<String>,
}

/// Truffle artifact scanner
pub struct ArtifactScanner;

impl ArtifactScanner {
    /// Scan a single root directory for artifacts of the known contracts
    pub fn scan(root: impl AsRef<Path>) -> ArtifactScan {
        let root = root.as_ref();
        let mut scan = ArtifactScan::default();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !Self::is_ignored_dir(e.path()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    scan.errors.push(err.to_string());
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !Self::is_known_artifact(path) {
                continue;
            }

            scan.scanned_files += 1;

            if let Err(err) = Self::load_artifact(path, &mut scan.registry) {
                scan.errors.push(format!("{}: {:#}", path.display(), err));
            }
        }

        debug!(
            root = %root.display(),
            files = scan.scanned_files,
            networks = scan.registry.len(),
            "artifact scan done"
        );
        scan
    }

    /// Scan multiple root directories; earlier roots win on conflicts
    pub fn scan_roots(roots: &[PathBuf]) -> ContractRegistry {
        let mut registry = ContractRegistry::new();
        for root in roots {
            let scan = Self::scan(root);
            for err in &scan.errors {
                warn!(root = %root.display(), "artifact skipped: {err}");
            }
            registry.merge(scan.registry);
        }
        registry
    }

    /// Load a single artifact file
    fn load_artifact(path: &Path, registry: &mut ContractRegistry) -> anyhow::Result<()> {
        let content = fs::read_to_string(path)?;
        let artifact: TruffleArtifact =
            serde_json::from_str(&content).context("not a Truffle artifact")?;

        let Some(role) = ContractRole::from_contract_name(&artifact.contract_name) else {
            return Ok(());
        };

        for (network, deployment) in artifact.networks {
            let Some(address) = deployment.address else {
                continue;
            };
            let network: NetworkId = network
                .parse()
                .with_context(|| format!("invalid network id '{network}'"))?;
            let address: Address = address
                .parse()
                .with_context(|| format!("invalid address '{address}'"))?;
            registry.insert(network, role, address);
        }

        Ok(())
    }

    /// Only `SimpleNFT.json` and `NFTVault.json` are of interest
    fn is_known_artifact(path: &Path) -> bool {
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            return false;
        }
        path.file_stem()
            .and_then(|s| s.to_str())
            .and_then(ContractRole::from_contract_name)
            .is_some()
    }

    /// Check if a path should be ignored
    fn is_ignored_dir(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|name| matches!(name, ".git" | "target" | "node_modules" | ".cache"))
            .unwrap_or(false)
    }
}
