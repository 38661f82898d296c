//! Capabilities the pipeline needs from the outside world

use alloy_primitives::{Address, Bytes, Selector};
use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::domain::contracts::NetworkId;

/// Read-only access to the chain, routed through the host's connectivity
#[async_trait::async_trait]
pub trait ChainReader: Send + Sync + 'static {
    /// Identifier of the active network (`eth_chainId`)
    async fn network_id(&self) -> Result<NetworkId>;

    /// Execute a read-only call (`eth_call`) and return the raw return data
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes>;
}

/// One candidate from a public signature directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub text_signature: String,
    /// Registration time; `None` when missing or unparsable
    pub created_at: Option<DateTime<Utc>>,
}

/// Public selector-to-signature directory (e.g. 4byte.directory)
#[async_trait::async_trait]
pub trait SignatureDirectory: Send + Sync + 'static {
    /// All entries registered for `selector`, in whatever order the service returns
    async fn lookup(
        &self,
        network: Option<NetworkId>,
        selector: Selector,
    ) -> Result<Vec<DirectoryEntry>>;
}

/// Order entries oldest first; undated entries go last, keeping their relative order
pub fn sort_oldest_first(entries: &mut [DirectoryEntry]) {
    entries.sort_by_key(|entry| (entry.created_at.is_none(), entry.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(sig: &str, created_at: Option<&str>) -> DirectoryEntry {
        DirectoryEntry {
            text_signature: sig.to_string(),
            created_at: created_at.map(|ts| ts.parse().unwrap()),
        }
    }

    #[test]
    fn test_sort_oldest_first() {
        let mut entries = vec![
            entry("newest()", Some("2023-01-01T00:00:00Z")),
            entry("undated()", None),
            entry("oldest()", Some("2018-05-11T08:39:29.708250Z")),
            entry("middle()", Some("2020-06-01T12:00:00Z")),
        ];
        sort_oldest_first(&mut entries);
        let order: Vec<&str> = entries.iter().map(|e| e.text_signature.as_str()).collect();
        assert_eq!(order, vec!["oldest()", "middle()", "newest()", "undated()"]);
    }
}
