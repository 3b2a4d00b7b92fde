use std::time::Duration;

use bridge_common::hex_bytes::BytesError;
use thiserror::Error;

use crate::types::Committee;

/// Failure to obtain a response body from the notary.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("empty burn reference")]
    EmptyBurnReference,
    #[error("invalid notary endpoint `{endpoint}`: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
    #[error("notary request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("notary request timed out after {0:?}")]
    Timeout(Duration),
    #[error("notary responded with status {0}")]
    Status(reqwest::StatusCode),
    #[error("notary request cancelled")]
    Cancelled,
}

impl NetworkError {
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            NetworkError::Timeout(timeout)
        } else {
            NetworkError::Transport(err)
        }
    }

    /// Whether re-sending the identical request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            NetworkError::Transport(_) | NetworkError::Timeout(_) => true,
            NetworkError::Status(status) => status.is_server_error(),
            NetworkError::EmptyBurnReference
            | NetworkError::InvalidEndpoint { .. }
            | NetworkError::Cancelled => false,
        }
    }
}

/// How seriously a [`ProtocolError`] should be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// The proof decoded, but a recomputed value disagrees with what the
    /// on-chain verifier will expect. Submitting it will most likely fail.
    Warning,
    /// No usable proof could be produced.
    Fatal,
}

/// Malformed, incomplete or inconsistent notary response.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("proof not found: {reason}")]
    ProofNotFound { reason: String },
    #[error("malformed response envelope: {0}")]
    Envelope(#[from] serde_path_to_error::Error<serde_json::Error>),
    #[error("malformed hex in `{field}`: {source}")]
    MalformedHex {
        field: String,
        #[source]
        source: hex::FromHexError,
    },
    #[error("`{field}` is empty")]
    EmptyField { field: String },
    #[error("`{field}` must be {expected} bytes, got {actual}")]
    InvalidLength {
        field: String,
        expected: usize,
        actual: usize,
    },
    #[error("`{field}` does not fit in a u64 ({len} significant bytes)")]
    HeightOverflow { field: String, len: usize },
    #[error("path/flag length mismatch: {path} siblings, {is_left} flags")]
    PathFlagLengthMismatch { path: usize, is_left: usize },
    #[error("signer index/signature length mismatch: {indices} indices, {signatures} signatures")]
    AttestationLengthMismatch { indices: usize, signatures: usize },
    #[error(
        "{committee} instruction root mismatch: proof carries {}, path recomputes {}",
        hex::encode(.expected),
        hex::encode(.recomputed)
    )]
    RootMismatch {
        committee: Committee,
        expected: [u8; 32],
        recomputed: [u8; 32],
    },
    #[error(
        "{committee} block digest mismatch: expected {}, recomputed {}",
        hex::encode(.expected),
        hex::encode(.recomputed)
    )]
    BlockDigestMismatch {
        committee: Committee,
        expected: [u8; 32],
        recomputed: [u8; 32],
    },
    #[error("{committee} attestation has {signatures} signatures, needs more than {required} of {committee_size}")]
    InsufficientSignatures {
        committee: Committee,
        signatures: usize,
        required: usize,
        committee_size: usize,
    },
    #[error("{committee} signature #{position} is invalid: {reason}")]
    InvalidSignature {
        committee: Committee,
        position: usize,
        reason: String,
    },
    #[error("{committee} signer index {signer_index} is outside the committee")]
    UnknownSigner {
        committee: Committee,
        signer_index: u64,
    },
    #[error("{committee} signature #{position} was not produced by signer {signer_index}")]
    SignerMismatch {
        committee: Committee,
        position: usize,
        signer_index: u64,
    },
}

impl ProtocolError {
    pub fn severity(&self) -> Severity {
        match self {
            ProtocolError::RootMismatch { .. }
            | ProtocolError::BlockDigestMismatch { .. }
            | ProtocolError::InsufficientSignatures { .. }
            | ProtocolError::InvalidSignature { .. }
            | ProtocolError::UnknownSigner { .. }
            | ProtocolError::SignerMismatch { .. } => Severity::Warning,
            _ => Severity::Fatal,
        }
    }

    /// Attaches the name of the offending notary field to a byte-level error.
    pub(crate) fn in_field(field: impl Into<String>) -> impl FnOnce(BytesError) -> Self {
        move |err| {
            let field = field.into();
            match err {
                BytesError::Hex(source) => ProtocolError::MalformedHex { field, source },
                BytesError::Empty => ProtocolError::EmptyField { field },
                BytesError::Length { expected, actual } => ProtocolError::InvalidLength {
                    field,
                    expected,
                    actual,
                },
                BytesError::Overflow { len } => ProtocolError::HeightOverflow { field, len },
            }
        }
    }
}
