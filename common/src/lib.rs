//! Byte-level helpers shared by the bridge codec crates.

pub mod env;
pub mod hash;
pub mod hex_bytes;
pub mod tracing;

/// Width of every root, path node and block-data word in a burn proof.
pub const HASH_LEN: usize = 32;

/// Length of the destination identity carried by shield instructions.
pub const IDENTITY_ADDRESS_LEN: usize = 148;
