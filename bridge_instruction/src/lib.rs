//! Payloads for the vault bridge program.
//!
//! - [`shield`] deposits tokens into the vault, or re-shields tokens held by
//!   a signer with a withdraw request;
//! - [`unshield`] releases tokens against a [`burn_proof::BurnProof`] fetched
//!   from a notary node;
//! - [`init_beacon`] sets up the proxy account with its beacon committee.
//!
//! Every encoder returns a [`Payload`], the opaque instruction data plus the
//! ordered accounts from [`account`]. [`BridgeInstruction::unpack`] reads a
//! payload back with the receiving program's rules.

pub mod account;
mod error;
pub mod init_beacon;
mod instruction;
pub mod shield;
mod unpack;
pub mod unshield;

pub use account::AccountRole;
pub use burn_proof::BURN_INSTRUCTION_LEN;
pub use error::{BuildError, EncodingError, UnpackError, ValidationError};
pub use init_beacon::{InitBeaconRequest, MAX_BEACON_ADDRESSES};
pub use instruction::{
    InstructionTag, Payload, ProgramConstants, DEFAULT_WITHDRAW_REQUEST_TAG, DEPOSIT_TAG,
    INIT_BEACON_TAG, UNSHIELD_TAG,
};
pub use shield::ShieldRequest;
pub use unpack::{BridgeInstruction, UnshieldInstruction};
pub use unshield::{build_unshield, UnshieldRequest};
