//! Remote signature resolution via the 4byte directory API

use std::collections::HashMap;
use std::time::Duration;

use alloy_primitives::Selector;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::domain::contracts::NetworkId;
use crate::domain::{DirectoryEntry, SignatureDirectory};

pub const DEFAULT_DIRECTORY_ENDPOINT: &str = "https://www.4byte.directory/api/v1/signatures/";

/// 4byte API response structures
#[derive(Debug, Deserialize)]
struct FourByteResponse {
    #[serde(default)]
    results: Vec<FourByteSignature>,
}

#[derive(Debug, Deserialize)]
struct FourByteSignature {
    text_signature: String,
    #[serde(default)]
    created_at: Option<String>,
}

/// Where and how to query the directory
#[derive(Debug, Clone)]
pub struct DirectoryOptions {
    /// Endpoint used when no per-network endpoint is configured
    pub endpoint: String,
    /// Per-network endpoint overrides
    pub network_endpoints: HashMap<NetworkId, String>,
    /// Request timeout; `None` leaves it to the transport
    pub timeout: Option<Duration>,
}

impl Default for DirectoryOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_DIRECTORY_ENDPOINT.to_string(),
            network_endpoints: HashMap::new(),
            timeout: None,
        }
    }
}

/// HTTP client for a 4byte-compatible signature directory
pub struct FourByteDirectory {
    http: reqwest::Client,
    options: DirectoryOptions,
}

impl FourByteDirectory {
    pub fn new(options: DirectoryOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("vault-insights/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to create HTTP client")?;
        Ok(Self { http, options })
    }

    /// Endpoint for the given network
    pub fn endpoint(&self, network: Option<NetworkId>) -> &str {
        network
            .and_then(|id| self.options.network_endpoints.get(&id))
            .map(String::as_str)
            .unwrap_or(&self.options.endpoint)
    }
}

#[async_trait::async_trait]
impl SignatureDirectory for FourByteDirectory {
    async fn lookup(
        &self,
        network: Option<NetworkId>,
        selector: Selector,
    ) -> Result<Vec<DirectoryEntry>> {
        let selector_hex = format!("0x{}", hex::encode(selector.as_slice()));
        let url = self.endpoint(network);

        debug!(%selector_hex, url, "querying signature directory");

        let response = self
            .http
            .get(url)
            .query(&[("hex_signature", selector_hex.as_str())])
            .send()
            .await
            .context("Failed to query signature directory")?;

        let status = response.status();
        if !status.is_success() {
            bail!("signature directory returned status {status} for {selector_hex}");
        }

        let data: FourByteResponse = response
            .json()
            .await
            .context("Failed to parse signature directory response")?;

        debug!(%selector_hex, count = data.results.len(), "directory lookup done");

        Ok(data.results.into_iter().map(into_entry).collect())
    }
}

fn into_entry(result: FourByteSignature) -> DirectoryEntry {
    let created_at = result
        .created_at
        .as_deref()
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|ts| ts.with_timezone(&Utc));

    DirectoryEntry {
        text_signature: result.text_signature,
        created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response() {
        let body = r#"{
            "count": 2,
            "next": null,
            "previous": null,
            "results": [
                {"id": 2, "created_at": "2021-09-14T02:21:55.372935Z", "text_signature": "collate_propagate_storage(bytes16)", "hex_signature": "0x42966c68", "bytes_signature": "B\u0096lh"},
                {"id": 1, "created_at": "2018-05-12T21:11:49.484318Z", "text_signature": "burn(uint256)", "hex_signature": "0x42966c68", "bytes_signature": "B\u0096lh"}
            ]
        }"#;
        let response: FourByteResponse = serde_json::from_str(body).unwrap();
        let entries: Vec<DirectoryEntry> = response.results.into_iter().map(into_entry).collect();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].text_signature, "burn(uint256)");
        assert_eq!(
            entries[1].created_at.map(|ts| ts.to_rfc3339()),
            Some("2018-05-12T21:11:49.484318+00:00".to_string())
        );
    }

    #[test]
    fn test_unparsable_timestamp_is_none() {
        let entry = into_entry(FourByteSignature {
            text_signature: "f()".into(),
            created_at: Some("yesterday".into()),
        });
        assert!(entry.created_at.is_none());
    }

    #[test]
    fn test_empty_results() {
        let response: FourByteResponse = serde_json::from_str(r#"{"count":0,"results":[]}"#).unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_network_endpoint_override() {
        let mut options = DirectoryOptions::default();
        options
            .network_endpoints
            .insert(11155111, "http://sepolia.example/api/".into());
        let directory = FourByteDirectory::new(options).unwrap();

        assert_eq!(directory.endpoint(Some(11155111)), "http://sepolia.example/api/");
        assert_eq!(directory.endpoint(Some(1)), DEFAULT_DIRECTORY_ENDPOINT);
        assert_eq!(directory.endpoint(None), DEFAULT_DIRECTORY_ENDPOINT);
    }
}
