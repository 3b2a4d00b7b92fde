//! Notary response envelope -> [`BurnProof`].
//!
//! A successful response looks like
//!
//! ```json
//! {
//!   "Result": {
//!     "Instruction": "9e01...",
//!     "BeaconHeight": "0000000000001f40",
//!     "BeaconInstRoot": "...", "BeaconInstPath": ["...", "..."],
//!     "BeaconInstPathIsLeft": [true, false], "BeaconBlkData": "...",
//!     "BeaconSigIdxs": [0, 1, 3], "BeaconSigs": ["...", "...", "..."],
//!     "BridgeHeight": "...", "BridgeInstRoot": "...", ...
//!   },
//!   "Error": null
//! }
//! ```
//!
//! Every byte-bearing field is hex. Heights are hex too, read as big-endian
//! integers.

use bridge_common::hex_bytes::{be_u64, decode_hex, decode_hex32, decode_hex_nonempty};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    error::ProtocolError,
    types::{BurnProof, Committee, CommitteeAttestation, MerkleBranch},
    verify::CommitteeKeys,
};

/// What to do with recomputed values that disagree with the proof.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsistencyCheck {
    /// Don't recompute anything.
    Off,
    /// Log each mismatch at `WARN` and return the proof anyway.
    #[default]
    Warn,
    /// Fail decoding on the first mismatch.
    Strict,
}

/// How [`decode_with`] checks the proof it decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    pub consistency: ConsistencyCheck,
    /// Committees whose attestation is recovered and compared with these
    /// keys. Without them a corrupted `BlkData` goes unnoticed.
    pub committee_keys: CommitteeKeys,
}

impl From<ConsistencyCheck> for DecodeOptions {
    fn from(consistency: ConsistencyCheck) -> Self {
        Self {
            consistency,
            ..Default::default()
        }
    }
}

#[derive(Deserialize, Debug)]
struct Envelope {
    // Kept as a raw value so an error response is recognised even when its
    // result is not shaped like a proof.
    #[serde(rename = "Result", alias = "result", default)]
    result: Option<serde_json::Value>,
    #[serde(rename = "Error", alias = "error", default)]
    error: Option<RpcError>,
}

#[derive(Deserialize, Debug, Default)]
struct RpcError {
    #[serde(rename = "Code", alias = "code", default)]
    code: i64,
    #[serde(rename = "Message", alias = "message", default)]
    message: String,
    #[serde(rename = "StackTrace", alias = "stackTrace", default)]
    stack_trace: String,
}

impl RpcError {
    fn is_present(&self) -> bool {
        self.code != 0 || !self.message.is_empty()
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct RawProof {
    instruction: String,
    beacon_height: String,
    bridge_height: String,
    beacon_inst_root: String,
    bridge_inst_root: String,
    beacon_inst_path: Vec<String>,
    bridge_inst_path: Vec<String>,
    beacon_inst_path_is_left: Vec<bool>,
    bridge_inst_path_is_left: Vec<bool>,
    beacon_blk_data: String,
    bridge_blk_data: String,
    beacon_sig_idxs: Vec<u64>,
    bridge_sig_idxs: Vec<u64>,
    beacon_sigs: Vec<String>,
    bridge_sigs: Vec<String>,
}

/// One committee's view of a [`RawProof`].
struct RawCommittee<'a> {
    committee: Committee,
    height: &'a str,
    inst_root: &'a str,
    inst_path: &'a [String],
    inst_path_is_left: &'a [bool],
    blk_data: &'a str,
    sig_idxs: &'a [u64],
    sigs: &'a [String],
}

impl RawProof {
    fn committee(&self, committee: Committee) -> RawCommittee<'_> {
        match committee {
            Committee::Beacon => RawCommittee {
                committee,
                height: &self.beacon_height,
                inst_root: &self.beacon_inst_root,
                inst_path: &self.beacon_inst_path,
                inst_path_is_left: &self.beacon_inst_path_is_left,
                blk_data: &self.beacon_blk_data,
                sig_idxs: &self.beacon_sig_idxs,
                sigs: &self.beacon_sigs,
            },
            Committee::Bridge => RawCommittee {
                committee,
                height: &self.bridge_height,
                inst_root: &self.bridge_inst_root,
                inst_path: &self.bridge_inst_path,
                inst_path_is_left: &self.bridge_inst_path_is_left,
                blk_data: &self.bridge_blk_data,
                sig_idxs: &self.bridge_sig_idxs,
                sigs: &self.bridge_sigs,
            },
        }
    }

    fn into_proof(self) -> Result<BurnProof, ProtocolError> {
        let instruction_bytes = decode_hex_nonempty(&self.instruction)
            .map_err(ProtocolError::in_field("Instruction"))?;
        let [beacon, bridge] = Committee::ALL.map(|committee| self.committee(committee).decode());
        let (beacon, bridge) = (beacon?, bridge?);

        Ok(BurnProof {
            instruction_bytes,
            height: [beacon.height, bridge.height],
            branch: [beacon.branch, bridge.branch],
            block_data: [beacon.block_data, bridge.block_data],
            attestation: [beacon.attestation, bridge.attestation],
        })
    }
}

struct DecodedCommittee {
    height: u64,
    branch: MerkleBranch,
    block_data: [u8; 32],
    attestation: CommitteeAttestation,
}

impl RawCommittee<'_> {
    fn field(&self, name: &str) -> String {
        format!("{}{name}", self.committee)
    }

    fn decode(&self) -> Result<DecodedCommittee, ProtocolError> {
        let height = decode_hex(self.height)
            .and_then(|bytes| be_u64(&bytes))
            .map_err(ProtocolError::in_field(self.field("Height")))?;

        let root = decode_hex32(self.inst_root)
            .map_err(ProtocolError::in_field(self.field("InstRoot")))?;
        let path = self
            .inst_path
            .iter()
            .enumerate()
            .map(|(i, node)| {
                decode_hex32(node)
                    .map_err(ProtocolError::in_field(format!("{}[{i}]", self.field("InstPath"))))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let branch = MerkleBranch::new(root, path, self.inst_path_is_left.to_vec())?;

        let block_data = decode_hex32(self.blk_data)
            .map_err(ProtocolError::in_field(self.field("BlkData")))?;

        let signatures = self
            .sigs
            .iter()
            .enumerate()
            .map(|(i, sig)| {
                decode_hex(sig)
                    .map_err(ProtocolError::in_field(format!("{}[{i}]", self.field("Sigs"))))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let attestation = CommitteeAttestation::new(self.sig_idxs.to_vec(), signatures)?;

        Ok(DecodedCommittee {
            height,
            branch,
            block_data,
            attestation,
        })
    }
}

/// Decodes a notary response body, logging consistency mismatches.
///
/// Equivalent to [`decode_with`] and [`ConsistencyCheck::Warn`].
pub fn decode(body: &[u8]) -> Result<BurnProof, ProtocolError> {
    decode_with(body, ConsistencyCheck::default())
}

pub fn decode_with(
    body: &[u8],
    options: impl Into<DecodeOptions>,
) -> Result<BurnProof, ProtocolError> {
    let DecodeOptions {
        consistency,
        committee_keys,
    } = options.into();
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ProtocolError::ProofNotFound {
            reason: "empty response body".into(),
        });
    }

    let envelope: Envelope =
        serde_path_to_error::deserialize(&mut serde_json::Deserializer::from_slice(body))?;

    if let Some(error) = envelope.error.filter(RpcError::is_present) {
        debug!(
            code = error.code,
            stack_trace = %error.stack_trace,
            "notary returned an error"
        );
        return Err(ProtocolError::ProofNotFound {
            reason: format!("notary error {}: {}", error.code, error.message),
        });
    }

    let raw: RawProof = match envelope.result {
        Some(result) if !result.is_null() => serde_path_to_error::deserialize(result)?,
        _ => {
            return Err(ProtocolError::ProofNotFound {
                reason: "response carries no result".into(),
            })
        }
    };
    let proof = raw.into_proof()?;
    debug!(
        instruction_len = proof.instruction_bytes.len(),
        beacon_height = proof.height_of(Committee::Beacon),
        bridge_height = proof.height_of(Committee::Bridge),
        "decoded burn proof"
    );

    match consistency {
        ConsistencyCheck::Off => {}
        ConsistencyCheck::Warn => {
            for mismatch in proof.check_consistency_with(&committee_keys) {
                warn!("{mismatch}");
            }
        }
        ConsistencyCheck::Strict => {
            if let Some(mismatch) = proof
                .check_consistency_with(&committee_keys)
                .into_iter()
                .next()
            {
                return Err(mismatch);
            }
        }
    }

    Ok(proof)
}
