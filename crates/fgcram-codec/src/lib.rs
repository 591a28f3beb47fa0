#![deny(unsafe_code)]

//! Low-level CRAM wire primitives.
//!
//! This crate provides the variable-length integer codecs and the raw block
//! framing used by the slice writer:
//! - [`itf8`] - 32-bit ITF8 encoding (1-5 bytes)
//! - [`ltf8`] - 64-bit LTF8 encoding (1-9 bytes)
//! - [`block`] - raw block frames with CRC32 trailers

pub mod block;
pub mod itf8;
pub mod ltf8;

// Re-export commonly used items
pub use block::{Block, BlockError, ContentType, MIN_MAJOR_WITH_CRC};
pub use itf8::{read_itf8, read_itf8_array, write_itf8, write_itf8_array};
pub use ltf8::{read_ltf8, write_ltf8};
