//! liqwatch Ports
//!
//! Port definitions (traits) for the liqwatch monitor.
//! These define the boundary between the classification engine and the
//! exchange-specific adapters that feed it.

mod error;
mod normalizer;

pub use error::{NormalizeError, NormalizeResult};
pub use normalizer::EventNormalizer;
