//! ABI infrastructure - Alloy-based decoding, signature directory and artifact scanning

mod decoder;
mod resolver;
mod scanner;

pub use decoder::AlloyAbiDecoder;
pub use resolver::{DirectoryOptions, FourByteDirectory, DEFAULT_DIRECTORY_ENDPOINT};
pub use scanner::{ArtifactScan, ArtifactScanner};
