//! Transaction insights for the NFT vault and minter contracts.
//!
//! Given a pending transaction, [`InsightEngine`] identifies the target
//! contract, resolves the function selector, decodes the arguments and, for
//! vault withdrawals, reads the approval state from the chain.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod insight;

pub use domain::{Insight, InsightError, WithdrawStatus};
pub use insight::{InsightEngine, ResolutionPolicy};
