//! Dual-committee burn proofs: fetching them from a notary node, decoding the
//! notary's JSON envelope, and re-checking what the receiving program will
//! check on-chain.
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! let body = burn_proof::fetch("http://127.0.0.1:9334", "getsolburnproof", "c0ffee").await?;
//! let proof = burn_proof::decode(&body)?;
//! println!("beacon height {}", proof.height_of(burn_proof::Committee::Beacon));
//! # Ok(())
//! # }
//! ```

mod decoding;
pub mod error;
pub mod notary;
mod types;
pub mod verify;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use decoding::{decode, decode_with, ConsistencyCheck, DecodeOptions};
pub use error::{NetworkError, ProtocolError, Severity};
pub use notary::{fetch, NotaryClient, NotaryConfig, ProofRequest, ProofSource};
pub use types::{
    BurnProof, Committee, CommitteeAttestation, MerkleBranch, BURN_INSTRUCTION_LEN, COMMITTEE_COUNT,
};
pub use verify::CommitteeKeys;
