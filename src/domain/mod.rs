//! Domain layer - pipeline types and the ports it depends on
//!
//! Nothing in here performs I/O. Adapters live in `infrastructure`.

pub mod abi;
pub mod contracts;
mod error;
mod insight;
mod ports;
mod transaction;

pub use error::InsightError;
pub use insight::{Insight, WithdrawStatus, UNKNOWN_TRANSACTION};
pub use ports::{sort_oldest_first, ChainReader, DirectoryEntry, SignatureDirectory};
pub use transaction::{Calldata, PendingTransaction};
