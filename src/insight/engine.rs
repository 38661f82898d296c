//! The insight pipeline: identify, resolve, decode, enrich

use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::abi::{normalize_all, selector_hex, AbiDecoder};
use crate::domain::contracts::{identify, AddressBook, ContractRole, NetworkId, Operation};
use crate::domain::{ChainReader, Insight, InsightError, PendingTransaction, SignatureDirectory};

use super::enrich::ChainEnricher;
use super::selector::{ResolutionPolicy, SelectorResolver};

/// Turns pending transactions into insights.
///
/// Holds only immutable state, so one engine can serve concurrent callers.
pub struct InsightEngine {
    registry: Arc<dyn AddressBook>,
    resolver: SelectorResolver,
    decoder: Arc<dyn AbiDecoder>,
    enricher: ChainEnricher,
    chain: Arc<dyn ChainReader>,
}

impl InsightEngine {
    pub fn new(
        registry: Arc<dyn AddressBook>,
        chain: Arc<dyn ChainReader>,
        directory: Arc<dyn SignatureDirectory>,
        decoder: Arc<dyn AbiDecoder>,
        policy: ResolutionPolicy,
    ) -> Result<Self> {
        let enricher = ChainEnricher::new(chain.clone(), decoder.clone())?;
        Ok(Self {
            registry,
            resolver: SelectorResolver::new(directory, policy),
            decoder,
            enricher,
            chain,
        })
    }

    /// Build the insight for `transaction` on the chain reader's current network
    pub async fn get_insights(&self, transaction: &Value) -> Insight {
        let network = match self.chain.network_id().await {
            Ok(id) => Some(id),
            Err(err) => {
                debug!("network id unavailable, no contract bindings: {err:#}");
                None
            }
        };
        self.get_insights_on(network, transaction).await
    }

    /// Build the insight for `transaction` on an explicit network
    #[instrument(skip_all, fields(network = ?network))]
    pub async fn get_insights_on(&self, network: Option<NetworkId>, transaction: &Value) -> Insight {
        match self.decode(network, transaction).await {
            Ok(insight) => insight,
            Err(err) => {
                debug!(stage = err.kind(), "{err}");
                Insight::unknown()
            }
        }
    }

    async fn decode(&self, network: Option<NetworkId>, transaction: &Value) -> Result<Insight, InsightError> {
        let transaction = PendingTransaction::from_value(transaction);
        let calldata = transaction.calldata()?;

        let bindings = network.and_then(|id| self.registry.bindings(id));
        let contract = identify(bindings.as_ref(), transaction.to.as_deref());
        let selector = calldata.selector();
        debug!(role = %contract.role, selector = %selector_hex(&selector), "identified");

        let signature = self
            .resolver
            .candidates(network, contract.role, selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| InsightError::NoMatchingSelector(format!("0x{}", selector_hex(&selector))))?;

        let operation = Operation::from_signature(contract.role, signature);
        let signature = operation.signature();
        let values = self
            .decoder
            .decode_arguments(&signature.parameter_types(), calldata.payload())?;

        let mut insight = Insight::decoded(signature.as_str(), normalize_all(&values))
            .with_contract(contract.role.contract_name());

        if operation.is_withdraw() && contract.role == ContractRole::Vault {
            if let Some(vault) = contract.address {
                let enrichment = self.enricher.check_withdraw(vault, &values).await;
                insight.can_withdraw = Some(enrichment.status);
                insight.read_result = enrichment.read_result;
            }
        }

        Ok(insight)
    }
}
