use burn_proof::{NetworkError, ProtocolError};
use thiserror::Error;

use crate::instruction::InstructionTag;

/// A request that must not be encoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("identity address must be {expected} bytes, got {actual}")]
    IdentityLength { expected: usize, actual: usize },
    #[error("identity address has non-printable byte {byte:#04x} at {position}")]
    IdentityNotPrintable { position: usize, byte: u8 },
    #[error("{0:?} is not a shield instruction")]
    NotAShield(InstructionTag),
    #[error("empty account list")]
    EmptyAccounts,
    #[error("{count} beacons given, between 1 and {max} are accepted")]
    BeaconCount { count: usize, max: usize },
}

/// A decoded proof that does not fit the unshield layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("count overflow: `{field}` has {count} entries, a single-byte count holds 255")]
    CountOverflow { field: &'static str, count: usize },
    #[error("empty account list")]
    EmptyAccounts,
}

/// Bytes the receiving program would refuse to parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unpack error at offset {offset}: {reason}")]
pub struct UnpackError {
    pub offset: usize,
    pub reason: String,
}

/// Any failure on the way from an unshield request to its payload.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}
