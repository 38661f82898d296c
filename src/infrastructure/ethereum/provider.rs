//! Chain reader backed by an Alloy provider

use std::path::PathBuf;

use alloy::network::{Ethereum, TransactionBuilder};
use alloy::primitives::{Address, Bytes};
use alloy::providers::{
    fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
    Identity, Provider, ProviderBuilder, RootProvider,
};
use alloy::rpc::types::TransactionRequest;
use anyhow::{Context, Result};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::domain::contracts::NetworkId;
use crate::domain::ChainReader;

/// Where the chain reader connects
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    Http(String),
    WebSocket(String),
    /// Node socket, Unix only
    #[cfg(unix)]
    Ipc(PathBuf),
}

impl ProviderConfig {
    /// Endpoint as shown in logs
    pub fn display(&self) -> String {
        match self {
            ProviderConfig::Http(url) | ProviderConfig::WebSocket(url) => url.clone(),
            #[cfg(unix)]
            ProviderConfig::Ipc(path) => path.display().to_string(),
        }
    }
}

// Every transport ends up behind the same filled provider type
type FilledProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
    Ethereum,
>;

/// [`ChainReader`] over HTTP, WebSocket or IPC
pub struct AlloyChainReader {
    provider: FilledProvider,
    endpoint: String,
}

impl AlloyChainReader {
    /// Connect to the configured endpoint
    pub async fn connect(config: ProviderConfig) -> Result<Self> {
        let endpoint = config.display();
        let provider = match config {
            ProviderConfig::Http(url) => {
                let rpc_url = url.parse().context("Invalid HTTP URL")?;
                ProviderBuilder::new().connect_http(rpc_url)
            }
            ProviderConfig::WebSocket(url) => ProviderBuilder::new()
                .connect(&url)
                .await
                .context("Failed to create WebSocket provider")?,
            #[cfg(unix)]
            ProviderConfig::Ipc(path) => {
                use alloy::providers::IpcConnect;
                let ipc = IpcConnect::new(path.to_string_lossy().to_string());
                ProviderBuilder::new()
                    .connect_ipc(ipc)
                    .await
                    .context("Failed to create IPC provider")?
            }
        };

        debug!(%endpoint, "chain reader ready");
        Ok(Self { provider, endpoint })
    }

    pub fn endpoint_name(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ChainReader for AlloyChainReader {
    async fn network_id(&self) -> Result<NetworkId> {
        self.provider
            .get_chain_id()
            .await
            .with_context(|| format!("eth_chainId failed on {}", self.endpoint))
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes> {
        let request = TransactionRequest::default().with_to(to).with_input(input);
        self.provider
            .call(request)
            .await
            .with_context(|| format!("eth_call to {to} failed"))
    }
}

/// [`ChainReader`] that connects on first use.
///
/// A transaction that needs no chain access never opens the transport, so an
/// unreachable endpoint only surfaces as a failed read.
pub struct LazyChainReader {
    config: ProviderConfig,
    reader: OnceCell<AlloyChainReader>,
}

impl LazyChainReader {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            reader: OnceCell::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.reader.initialized()
    }

    async fn reader(&self) -> Result<&AlloyChainReader> {
        self.reader
            .get_or_try_init(|| async {
                let reader = AlloyChainReader::connect(self.config.clone()).await?;
                debug!(endpoint = reader.endpoint_name(), "connected");
                Ok::<_, anyhow::Error>(reader)
            })
            .await
    }
}

#[async_trait::async_trait]
impl ChainReader for LazyChainReader {
    async fn network_id(&self) -> Result<NetworkId> {
        self.reader().await?.network_id().await
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes> {
        self.reader().await?.call(to, input).await
    }
}
