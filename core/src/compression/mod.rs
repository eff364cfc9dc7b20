//! compression/mod.rs
//! Per-chunk compression and decompression.
//!
//! Notes:
//! - Every chunk is compressed independently, so chunks can be processed in any order.
//! - Registry resolves codec IDs (as stored in the container header) to implementations.
//! - Each compressed chunk is sealed in an envelope carrying its raw length and CRC-32.

pub mod backend;
pub mod codecs;
pub mod constants;
pub mod envelope;
pub mod registry;
pub mod types;

pub use backend::*;
pub use constants::*;
pub use registry::*;
pub use types::*;
