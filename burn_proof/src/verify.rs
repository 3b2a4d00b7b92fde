//! Client-side recomputation of what the receiving program checks on-chain.
//!
//! Nothing here is required to build an unshield instruction. These checks
//! exist so a stale or corrupted proof is noticed before it is submitted:
//!
//! - the instruction leaf, `keccak(instruction || height_be32)`, folded up the
//!   branch must reproduce the branch root;
//! - each committee signs `keccak(keccak(block_data || root))`, so the block
//!   digest ties `block_data` to the root, and the signatures tie both to the
//!   committee's keys.
//!
//! Corrupted `block_data` leaves the instruction roots intact. It only shows
//! up once the attestation is checked against [`CommitteeKeys`].

use bridge_common::{
    hash::{keccak256, keccak256_concat, ZERO_HASH},
    HASH_LEN,
};
use k256::{
    ecdsa::{RecoveryId, Signature, VerifyingKey},
    elliptic_curve::sec1::ToEncodedPoint,
    PublicKey,
};
use tracing::debug;

use crate::{
    error::ProtocolError,
    types::{BurnProof, Committee, MerkleBranch, COMMITTEE_COUNT},
};

/// `r || s || v`.
pub const SIGNATURE_LEN: usize = 65;

/// Uncompressed secp256k1 public key without its `0x04` tag.
pub const COMMITTEE_KEY_LEN: usize = 64;

pub type CommitteeKey = [u8; COMMITTEE_KEY_LEN];

/// Trusted key lists, at most one per [`Committee`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitteeKeys([Option<Vec<CommitteeKey>>; COMMITTEE_COUNT]);

impl CommitteeKeys {
    pub fn with(mut self, committee: Committee, keys: Vec<CommitteeKey>) -> Self {
        self.0[committee.index()] = Some(keys);
        self
    }

    pub fn of(&self, committee: Committee) -> Option<&[CommitteeKey]> {
        self.0[committee.index()].as_deref()
    }
}

/// The leaf committed to the instruction tree: the instruction followed by its
/// height, left-padded to a 32-byte big-endian word.
pub fn instruction_leaf(instruction: &[u8], height: u64) -> [u8; HASH_LEN] {
    let mut height_word = [0u8; HASH_LEN];
    height_word[HASH_LEN - 8..].copy_from_slice(&height.to_be_bytes());
    keccak256_concat(&[instruction, &height_word[..]])
}

/// Folds `leaf` up a Merkle path.
///
/// An all-zero right sibling stands for a missing node, and the running node
/// is hashed with itself.
pub fn compute_root(
    leaf: [u8; HASH_LEN],
    path: &[[u8; HASH_LEN]],
    is_left: &[bool],
) -> [u8; HASH_LEN] {
    path.iter()
        .zip(is_left)
        .fold(leaf, |node, (sibling, &is_left)| {
            if is_left {
                keccak256_concat(&[&sibling[..], &node[..]])
            } else if *sibling == ZERO_HASH {
                keccak256_concat(&[&node[..], &node[..]])
            } else {
                keccak256_concat(&[&node[..], &sibling[..]])
            }
        })
}

/// The digest a committee signs for a block.
pub fn block_digest(block_data: &[u8; HASH_LEN], root: &[u8; HASH_LEN]) -> [u8; HASH_LEN] {
    keccak256(keccak256_concat(&[&block_data[..], &root[..]]))
}

impl MerkleBranch {
    pub fn recompute_root(&self, leaf: [u8; HASH_LEN]) -> [u8; HASH_LEN] {
        compute_root(leaf, self.path(), self.is_left())
    }
}

impl BurnProof {
    pub fn instruction_leaf(&self, committee: Committee) -> [u8; HASH_LEN] {
        instruction_leaf(&self.instruction_bytes, self.height_of(committee))
    }

    pub fn recomputed_root(&self, committee: Committee) -> [u8; HASH_LEN] {
        self.branch_of(committee)
            .recompute_root(self.instruction_leaf(committee))
    }

    pub fn block_digest(&self, committee: Committee) -> [u8; HASH_LEN] {
        block_digest(
            self.block_data_of(committee),
            self.branch_of(committee).root(),
        )
    }

    /// Recomputes both instruction roots, returning one warning-level
    /// [`ProtocolError`] per committee whose branch does not lead to its root.
    pub fn check_consistency(&self) -> Vec<ProtocolError> {
        self.check_consistency_with(&CommitteeKeys::default())
    }

    /// [`Self::check_consistency`], plus [`Self::verify_attestation`] for
    /// every committee `keys` has a list for.
    pub fn check_consistency_with(&self, keys: &CommitteeKeys) -> Vec<ProtocolError> {
        Committee::ALL
            .into_iter()
            .flat_map(|committee| {
                let expected = *self.branch_of(committee).root();
                let recomputed = self.recomputed_root(committee);
                let root = (expected != recomputed).then_some(ProtocolError::RootMismatch {
                    committee,
                    expected,
                    recomputed,
                });
                let attestation = keys
                    .of(committee)
                    .and_then(|keys| self.verify_attestation(committee, keys).err());
                root.into_iter().chain(attestation)
            })
            .collect()
    }

    /// Compares the block digest against a value obtained out of band, e.g.
    /// from a block header the caller already trusts.
    pub fn check_block_digest(
        &self,
        committee: Committee,
        expected: &[u8; HASH_LEN],
    ) -> Result<(), ProtocolError> {
        let recomputed = self.block_digest(committee);
        match recomputed == *expected {
            true => Ok(()),
            false => Err(ProtocolError::BlockDigestMismatch {
                committee,
                expected: *expected,
                recomputed,
            }),
        }
    }

    /// Recovers every signature of `committee` over its block digest and
    /// checks it against `committee_keys[signer_index]`, applying the
    /// receiving program's quorum rule (strictly more than two thirds).
    pub fn verify_attestation(
        &self,
        committee: Committee,
        committee_keys: &[CommitteeKey],
    ) -> Result<(), ProtocolError> {
        let attestation = self.attestation_of(committee);
        let required = committee_keys.len() * 2 / 3;
        if attestation.len() <= required {
            return Err(ProtocolError::InsufficientSignatures {
                committee,
                signatures: attestation.len(),
                required,
                committee_size: committee_keys.len(),
            });
        }

        let digest = self.block_digest(committee);
        for (position, (signer_index, signature)) in attestation
            .signer_indices()
            .iter()
            .zip(attestation.signatures())
            .enumerate()
        {
            let expected_key = usize::try_from(*signer_index)
                .ok()
                .and_then(|ix| committee_keys.get(ix))
                .ok_or(ProtocolError::UnknownSigner {
                    committee,
                    signer_index: *signer_index,
                })?;
            let recovered = recover_signer(&digest, signature).map_err(|reason| {
                ProtocolError::InvalidSignature {
                    committee,
                    position,
                    reason,
                }
            })?;
            if recovered != *expected_key {
                return Err(ProtocolError::SignerMismatch {
                    committee,
                    position,
                    signer_index: *signer_index,
                });
            }
        }
        debug!(%committee, signatures = attestation.len(), "attestation verified");
        Ok(())
    }
}

/// Recovers the committee key that produced `signature` over `digest`.
///
/// `v` is accepted both raw (`0`/`1`) and Ethereum-style (`27`/`28`).
pub fn recover_signer(digest: &[u8; HASH_LEN], signature: &[u8]) -> Result<CommitteeKey, String> {
    if signature.len() != SIGNATURE_LEN {
        return Err(format!(
            "expected {SIGNATURE_LEN} bytes, got {}",
            signature.len()
        ));
    }
    let (rs, v) = signature.split_at(SIGNATURE_LEN - 1);
    let signature = Signature::from_slice(rs).map_err(|e| e.to_string())?;
    let v = match v[0] {
        v @ 27..=28 => v - 27,
        v => v,
    };
    let recovery_id = RecoveryId::from_byte(v).ok_or(format!("invalid recovery id {v}"))?;
    let key = VerifyingKey::recover_from_prehash(digest, &signature, recovery_id)
        .map_err(|e| e.to_string())?;

    let point = PublicKey::from(&key).to_encoded_point(false);
    let mut out = [0u8; COMMITTEE_KEY_LEN];
    // skip the 0x04 tag
    out.copy_from_slice(&point.as_bytes()[1..]);
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_path_is_the_leaf() {
        let leaf = [7; 32];
        assert_eq!(compute_root(leaf, &[], &[]), leaf);
    }

    #[test]
    fn sibling_side_decides_the_hash_order() {
        let leaf = [1; 32];
        let sibling = [2; 32];
        assert_eq!(
            compute_root(leaf, &[sibling], &[true]),
            keccak256_concat(&[&sibling[..], &leaf[..]])
        );
        assert_eq!(
            compute_root(leaf, &[sibling], &[false]),
            keccak256_concat(&[&leaf[..], &sibling[..]])
        );
    }

    #[test]
    fn zero_right_sibling_duplicates_the_node() {
        let leaf = [1; 32];
        assert_eq!(
            compute_root(leaf, &[ZERO_HASH], &[false]),
            keccak256_concat(&[&leaf[..], &leaf[..]])
        );
        // only on the right
        assert_eq!(
            compute_root(leaf, &[ZERO_HASH], &[true]),
            keccak256_concat(&[&ZERO_HASH[..], &leaf[..]])
        );
    }

    #[test]
    fn height_is_a_big_endian_word() {
        let mut expected_input = b"inst".to_vec();
        expected_input.extend_from_slice(&[0; 24]);
        expected_input.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0x01, 0x02]);
        assert_eq!(instruction_leaf(b"inst", 0x0102), keccak256(expected_input));
    }

    #[test]
    fn short_signatures_are_rejected() {
        let err = recover_signer(&[0; 32], &[0; 64]).unwrap_err();
        assert_eq!(err, "expected 65 bytes, got 64");
    }
}
