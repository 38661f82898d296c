//! Withdrawal approval check against the vault

use std::sync::Arc;

use alloy_dyn_abi::{DynSolValue, JsonAbiExt};
use alloy_json_abi::Function;
use alloy_primitives::{Address, Bytes};
use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::domain::abi::{normalize_all, AbiDecoder, DecodedValue};
use crate::domain::contracts::vault_abi;
use crate::domain::{ChainReader, InsightError, WithdrawStatus};

/// Outcome of one approval read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub status: WithdrawStatus,
    pub read_result: Option<Vec<DecodedValue>>,
}

/// Reads `getApproval` from the vault before a withdrawal
pub struct ChainEnricher {
    chain: Arc<dyn ChainReader>,
    decoder: Arc<dyn AbiDecoder>,
    get_approval: Function,
    output_types: Vec<String>,
}

impl ChainEnricher {
    pub fn new(chain: Arc<dyn ChainReader>, decoder: Arc<dyn AbiDecoder>) -> Result<Self> {
        let abi = vault_abi()?;
        let get_approval = abi
            .function("getApproval")
            .and_then(|overloads| overloads.first())
            .cloned()
            .context("NFTVault ABI has no getApproval function")?;
        let output_types = get_approval
            .outputs
            .iter()
            .map(|param| param.selector_type().into_owned())
            .collect();

        Ok(Self {
            chain,
            decoder,
            get_approval,
            output_types,
        })
    }

    /// Ask the vault whether `(nft_contract, token_id)` may be withdrawn.
    ///
    /// Never fails: a failed read becomes [`WithdrawStatus::Failed`].
    pub async fn check_withdraw(&self, vault: Address, withdraw_args: &[DynSolValue]) -> Enrichment {
        match self.read_approval(vault, withdraw_args).await {
            Ok(values) => {
                let status = approval_status(&values);
                debug!(%vault, %status, "approval read");
                Enrichment {
                    status,
                    read_result: Some(values),
                }
            }
            Err(err) => {
                warn!(%vault, "approval read failed: {err}");
                Enrichment {
                    status: WithdrawStatus::Failed(err.to_string()),
                    read_result: None,
                }
            }
        }
    }

    async fn read_approval(
        &self,
        vault: Address,
        withdraw_args: &[DynSolValue],
    ) -> Result<Vec<DecodedValue>, InsightError> {
        let input = self
            .get_approval
            .abi_encode_input(withdraw_args)
            .map_err(|e| InsightError::Enrichment(format!("cannot encode getApproval: {e}")))?;

        let output = self
            .chain
            .call(vault, Bytes::from(input))
            .await
            .map_err(|e| InsightError::Enrichment(format!("{e:#}")))?;

        let types: Vec<&str> = self.output_types.iter().map(String::as_str).collect();
        let values = self
            .decoder
            .decode_arguments(&types, &output)
            .map_err(|e| InsightError::Enrichment(e.to_string()))?;

        Ok(normalize_all(&values))
    }
}

/// "Yes" only for exactly three values ending in `true`
fn approval_status(values: &[DecodedValue]) -> WithdrawStatus {
    if values.len() == 3 && values[2].as_bool() == Some(true) {
        return WithdrawStatus::Approved;
    }
    WithdrawStatus::NotApproved {
        pending: values
            .get(1)
            .and_then(DecodedValue::as_address)
            .map(str::to_string),
    }
}
