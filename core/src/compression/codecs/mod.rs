//! compression/codecs/mod.rs
//! Per-block codec implementations.
//!
//! Every codec compresses one block independently: no state crosses block
//! boundaries, which is what lets chunks be processed in any order.

pub mod deflate;
pub mod lz4;
pub mod stored;
pub mod zstd;

pub use self::deflate::*;
pub use self::lz4::*;
pub use self::stored::*;
pub use self::zstd::*;
