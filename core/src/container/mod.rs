//! container/mod.rs
//! Self-describing container: header, chunk index, sealed blocks.
//!
//! The index carries every block's compressed length, so a reader can slice
//! all blocks up front and hand them to workers without decoding anything.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
