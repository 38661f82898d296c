//! The insight record handed back to the host

use std::fmt;

use serde::{Serialize, Serializer};

use crate::domain::abi::DecodedValue;

pub const UNKNOWN_TRANSACTION: &str = "Unknown transaction";

/// Human-readable summary of a pending transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    /// Matched signature, or "Unknown transaction"
    #[serde(rename = "type")]
    pub kind: String,
    /// Display name of the identified contract
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<DecodedValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_withdraw: Option<WithdrawStatus>,
    /// Values returned by the approval read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_result: Option<Vec<DecodedValue>>,
}

impl Insight {
    /// The degraded result: only `type` is set
    pub fn unknown() -> Self {
        Self {
            kind: UNKNOWN_TRANSACTION.to_string(),
            contract: None,
            args: None,
            can_withdraw: None,
            read_result: None,
        }
    }

    pub fn decoded(kind: impl Into<String>, args: Vec<DecodedValue>) -> Self {
        Self {
            kind: kind.into(),
            contract: None,
            args: Some(args),
            can_withdraw: None,
            read_result: None,
        }
    }

    pub fn with_contract(mut self, name: Option<&str>) -> Self {
        self.contract = name.map(str::to_string);
        self
    }

    pub fn is_unknown(&self) -> bool {
        self.kind == UNKNOWN_TRANSACTION
    }
}

/// Outcome of the withdrawal approval check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WithdrawStatus {
    Approved,
    /// Not approved; `pending` is the party whose approval is missing
    NotApproved { pending: Option<String> },
    /// The approval read itself failed
    Failed(String),
}

impl fmt::Display for WithdrawStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WithdrawStatus::Approved => f.write_str("Yes"),
            WithdrawStatus::NotApproved { pending: None } => f.write_str("No"),
            WithdrawStatus::NotApproved {
                pending: Some(party),
            } => write!(f, "No, you need to get approval from {party}"),
            WithdrawStatus::Failed(reason) => f.write_str(reason),
        }
    }
}

impl Serialize for WithdrawStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
