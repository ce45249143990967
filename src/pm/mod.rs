//! The `.pm` puzzle container format.

pub mod byte_stream;
pub mod codec;

pub use codec::{encode_puzzle, read_puzzle, write_puzzle, PM_MAGIC_VERSION};
