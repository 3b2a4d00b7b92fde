//! Hex decoding and fixed-width coercions for notary payloads.
//!
//! The notary emits bare hex, but `0x`-prefixed strings are tolerated here the
//! same way everywhere else in the workspace.

use thiserror::Error;

use crate::HASH_LEN;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BytesError {
    #[error("malformed hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("no bytes")]
    Empty,
    #[error("expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
    #[error("big-endian integer of {len} significant bytes does not fit in a u64")]
    Overflow { len: usize },
}

pub fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

/// Decodes `s`, rejecting odd lengths and non-hex characters.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, BytesError> {
    Ok(hex::decode(strip_0x(s))?)
}

/// [`decode_hex`] for fields where zero bytes would stand in for a missing
/// value.
pub fn decode_hex_nonempty(s: &str) -> Result<Vec<u8>, BytesError> {
    let bytes = decode_hex(s)?;
    match bytes.is_empty() {
        true => Err(BytesError::Empty),
        false => Ok(bytes),
    }
}

/// Coerces `bytes` into a 32-byte word. Anything but exactly 32 bytes is an
/// error: a short word is never zero-padded.
pub fn to_bytes32(bytes: &[u8]) -> Result<[u8; HASH_LEN], BytesError> {
    bytes.try_into().map_err(|_| BytesError::Length {
        expected: HASH_LEN,
        actual: bytes.len(),
    })
}

pub fn decode_hex32(s: &str) -> Result<[u8; HASH_LEN], BytesError> {
    to_bytes32(&decode_hex(s)?)
}

/// Reads `bytes` as a big-endian unsigned integer of arbitrary width.
///
/// Leading zero bytes are ignored, so `00 00 00 00 00 00 00 00 01` is `1`.
/// An empty slice is not read as zero.
pub fn be_u64(bytes: &[u8]) -> Result<u64, BytesError> {
    if bytes.is_empty() {
        return Err(BytesError::Empty);
    }
    let first_significant = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let significant = &bytes[first_significant..];
    if significant.len() > 8 {
        return Err(BytesError::Overflow {
            len: significant.len(),
        });
    }
    let mut buf = [0u8; 8];
    buf[8 - significant.len()..].copy_from_slice(significant);
    Ok(u64::from_be_bytes(buf))
}
