//! Insight pipeline wired over the domain ports

mod engine;
mod enrich;
mod selector;

pub use engine::InsightEngine;
pub use enrich::{ChainEnricher, Enrichment};
pub use selector::{ResolutionPolicy, SelectorResolver};
