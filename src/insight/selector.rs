//! Selector resolution: static table first, signature directory as fallback

use std::sync::Arc;

use alloy_primitives::Selector;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::abi::FunctionSignature;
use crate::domain::contracts::{ContractRole, NetworkId, SelectorTable};
use crate::domain::{sort_oldest_first, InsightError, SignatureDirectory};

/// When to consult the remote directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolutionPolicy {
    /// Query the directory when a known contract's static table has no match
    pub escalate_known_contracts: bool,
    /// Query the directory for contracts not in the registry
    pub resolve_unknown_contracts: bool,
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self {
            escalate_known_contracts: false,
            resolve_unknown_contracts: true,
        }
    }
}

/// Maps a selector to candidate signatures
pub struct SelectorResolver {
    table: SelectorTable,
    directory: Arc<dyn SignatureDirectory>,
    policy: ResolutionPolicy,
}

impl SelectorResolver {
    pub fn new(directory: Arc<dyn SignatureDirectory>, policy: ResolutionPolicy) -> Self {
        Self {
            table: SelectorTable::new(),
            directory,
            policy,
        }
    }

    /// Candidate signatures for `selector`, oldest directory entry first.
    ///
    /// An empty list means nothing matched.
    pub async fn candidates(
        &self,
        network: Option<NetworkId>,
        role: ContractRole,
        selector: Selector,
    ) -> Result<Vec<FunctionSignature>, InsightError> {
        if role.is_known() {
            if let Some(op) = self.table.lookup(role, selector) {
                return Ok(vec![FunctionSignature::from_canonical(op.signature())]);
            }
            if !self.policy.escalate_known_contracts {
                debug!(%selector, %role, "static table miss, not escalating");
                return Ok(Vec::new());
            }
        } else if !self.policy.resolve_unknown_contracts {
            return Err(InsightError::UnknownContract(
                "recipient is not a registered contract".into(),
            ));
        }

        self.lookup_remote(network, selector).await
    }

    async fn lookup_remote(
        &self,
        network: Option<NetworkId>,
        selector: Selector,
    ) -> Result<Vec<FunctionSignature>, InsightError> {
        let mut entries = self
            .directory
            .lookup(network, selector)
            .await
            .map_err(|err| {
                warn!(%selector, "signature lookup failed: {err:#}");
                InsightError::Lookup(format!("{err:#}"))
            })?;

        sort_oldest_first(&mut entries);

        // Unparsable text from an untrusted source is dropped, not fatal
        let candidates: Vec<FunctionSignature> = entries
            .iter()
            .filter_map(|entry| FunctionSignature::parse(&entry.text_signature).ok())
            .collect();

        if candidates.len() > 1 {
            debug!(
                %selector,
                alternatives = ?&candidates[1..],
                "directory returned several signatures; using the oldest"
            );
        }

        Ok(candidates)
    }
}
