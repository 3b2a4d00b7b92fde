//! Deterministic burn proofs for tests.
//!
//! [`Fixture::new`] produces a proof whose roots are recomputed from its own
//! branches and whose signatures are real secp256k1 signatures over its block
//! digests, so every check in [`crate::verify`] passes on it.

use k256::{ecdsa::SigningKey, elliptic_curve::sec1::ToEncodedPoint, PublicKey};
use serde_json::{json, Value};

use bridge_common::hash::ZERO_HASH;

use crate::{
    types::{
        BurnProof, Committee, CommitteeAttestation, MerkleBranch, BURN_INSTRUCTION_LEN,
        COMMITTEE_COUNT,
    },
    verify::{
        block_digest, compute_root, instruction_leaf, CommitteeKey, CommitteeKeys,
        COMMITTEE_KEY_LEN,
    },
};

/// Metadata type of a beacon-confirmed burn.
pub const BURN_META_TYPE: u8 = 157;

pub const TOKEN: [u8; 32] = [0x70; 32];
pub const RECEIVER: [u8; 32] = [0x52; 32];
pub const AMOUNT: u64 = 100_000_000;
pub const TXID: [u8; 32] = [0x7d; 32];

/// The canonical 162-byte burn instruction.
pub fn burn_instruction(
    token: &[u8; 32],
    receiver: &[u8; 32],
    amount: u64,
    txid: &[u8; 32],
) -> Vec<u8> {
    let mut inst = Vec::with_capacity(BURN_INSTRUCTION_LEN);
    inst.push(BURN_META_TYPE);
    inst.push(1); // shard
    inst.extend_from_slice(token);
    inst.extend_from_slice(receiver);
    inst.extend_from_slice(&[0; 24]);
    inst.extend_from_slice(&amount.to_be_bytes());
    inst.extend_from_slice(txid);
    inst.extend_from_slice(&[0; 32]);
    inst
}

fn signing_key(seed: u8) -> SigningKey {
    SigningKey::from_slice(&[seed; 32]).expect("seed is a valid scalar")
}

fn committee_key(key: &SigningKey) -> CommitteeKey {
    let point = PublicKey::from(key.verifying_key()).to_encoded_point(false);
    let mut out = [0u8; COMMITTEE_KEY_LEN];
    out.copy_from_slice(&point.as_bytes()[1..]);
    out
}

/// `r || s || v` with `v` in `{0, 1}`.
pub fn sign(seed: u8, digest: &[u8; 32]) -> Vec<u8> {
    let (signature, recovery_id) = signing_key(seed)
        .sign_prehash_recoverable(digest)
        .expect("digest is 32 bytes");
    let mut out = signature.to_bytes().to_vec();
    out.push(recovery_id.to_byte());
    out
}

struct CommitteeSetup {
    height: u64,
    path: Vec<[u8; 32]>,
    is_left: Vec<bool>,
    block_data: [u8; 32],
    key_seeds: Vec<u8>,
    signer_indices: Vec<u64>,
}

#[derive(Debug, Clone)]
pub struct Fixture {
    pub proof: BurnProof,
    /// Full key list of each committee, indexed by [`Committee::index`].
    pub committee_keys: [Vec<CommitteeKey>; COMMITTEE_COUNT],
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    pub fn new() -> Self {
        let instruction = burn_instruction(&TOKEN, &RECEIVER, AMOUNT, &TXID);
        let setups = [
            CommitteeSetup {
                height: 8000,
                path: vec![[0xa1; 32], ZERO_HASH, [0xa3; 32]],
                is_left: vec![true, false, false],
                block_data: [0xbd; 32],
                key_seeds: (1..=4).collect(),
                signer_indices: vec![0, 1, 3],
            },
            CommitteeSetup {
                height: 7000,
                path: vec![[0xb1; 32], [0xb2; 32]],
                is_left: vec![false, true],
                block_data: [0xbe; 32],
                key_seeds: (11..=13).collect(),
                signer_indices: vec![0, 1, 2],
            },
        ];

        let committees = setups.map(|setup| {
            let leaf = instruction_leaf(&instruction, setup.height);
            let root = compute_root(leaf, &setup.path, &setup.is_left);
            let digest = block_digest(&setup.block_data, &root);
            let signatures = setup
                .signer_indices
                .iter()
                .map(|ix| sign(setup.key_seeds[*ix as usize], &digest))
                .collect();
            let keys = setup
                .key_seeds
                .iter()
                .map(|seed| committee_key(&signing_key(*seed)))
                .collect::<Vec<_>>();
            (
                setup.height,
                MerkleBranch::new(root, setup.path, setup.is_left).expect("parallel arrays"),
                setup.block_data,
                CommitteeAttestation::new(setup.signer_indices, signatures)
                    .expect("parallel arrays"),
                keys,
            )
        });
        let [beacon, bridge] = committees;

        Self {
            proof: BurnProof {
                instruction_bytes: instruction,
                height: [beacon.0, bridge.0],
                branch: [beacon.1, bridge.1],
                block_data: [beacon.2, bridge.2],
                attestation: [beacon.3, bridge.3],
            },
            committee_keys: [beacon.4, bridge.4],
        }
    }

    pub fn keys_of(&self, committee: Committee) -> &[CommitteeKey] {
        &self.committee_keys[committee.index()]
    }

    /// Both key lists, as trusted by a decoder.
    pub fn trusted_keys(&self) -> CommitteeKeys {
        Committee::ALL
            .into_iter()
            .fold(CommitteeKeys::default(), |keys, committee| {
                keys.with(committee, self.keys_of(committee).to_vec())
            })
    }

    /// The proof as the `Result` object of a notary response.
    pub fn result_json(&self) -> Value {
        let p = &self.proof;
        let mut result = json!({ "Instruction": hex::encode(&p.instruction_bytes) });
        for committee in Committee::ALL {
            let branch = p.branch_of(committee);
            let attestation = p.attestation_of(committee);
            let fields = [
                ("Height", json!(hex::encode(p.height_of(committee).to_be_bytes()))),
                ("InstRoot", json!(hex::encode(branch.root()))),
                (
                    "InstPath",
                    json!(branch.path().iter().map(hex::encode).collect::<Vec<_>>()),
                ),
                ("InstPathIsLeft", json!(branch.is_left())),
                ("BlkData", json!(hex::encode(p.block_data_of(committee)))),
                ("SigIdxs", json!(attestation.signer_indices())),
                (
                    "Sigs",
                    json!(attestation
                        .signatures()
                        .iter()
                        .map(hex::encode)
                        .collect::<Vec<_>>()),
                ),
            ];
            for (name, value) in fields {
                result[format!("{committee}{name}")] = value;
            }
        }
        result
    }

    /// A successful notary response, ready to be mutated by a test.
    pub fn response_json(&self) -> Value {
        json!({
            "Id": 1,
            "Result": self.result_json(),
            "Error": null,
        })
    }

    pub fn response_body(&self) -> Vec<u8> {
        self.response_json().to_string().into_bytes()
    }
}

/// A notary error response.
pub fn error_body(code: i64, message: &str) -> Vec<u8> {
    json!({
        "Id": 1,
        "Result": null,
        "Error": { "Code": code, "Message": message, "StackTrace": "" },
    })
    .to_string()
    .into_bytes()
}
