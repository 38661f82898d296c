//! Error taxonomy for the insight pipeline

use thiserror::Error;

/// Why a pipeline stage could not produce its output.
///
/// Every variant except [`InsightError::Enrichment`] ends the pipeline with the
/// unknown insight. Enrichment failures are folded into the insight instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsightError {
    #[error("malformed transaction: {0}")]
    MalformedTransaction(String),

    #[error("unknown contract: {0}")]
    UnknownContract(String),

    #[error("no matching function for selector {0}")]
    NoMatchingSelector(String),

    #[error("signature lookup failed: {0}")]
    Lookup(String),

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("chain read failed: {0}")]
    Enrichment(String),
}

impl InsightError {
    /// Short stage label used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            InsightError::MalformedTransaction(_) => "malformed_transaction",
            InsightError::UnknownContract(_) => "unknown_contract",
            InsightError::NoMatchingSelector(_) => "no_matching_selector",
            InsightError::Lookup(_) => "lookup",
            InsightError::Decode(_) => "decode",
            InsightError::Enrichment(_) => "enrichment",
        }
    }
}
