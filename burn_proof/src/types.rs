use std::fmt::{self, Display, Formatter};

use bridge_common::HASH_LEN;

use crate::error::ProtocolError;

/// Number of independent committees attesting to a burn.
pub const COMMITTEE_COUNT: usize = 2;

/// Length of the canonical burn instruction the receiving program expects.
pub const BURN_INSTRUCTION_LEN: usize = 162;

/// The two signer sets whose attestations make up a [`BurnProof`].
///
/// Every per-committee array in [`BurnProof`] is indexed by
/// [`Committee::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Committee {
    Beacon,
    Bridge,
}

impl Committee {
    pub const ALL: [Committee; COMMITTEE_COUNT] = [Committee::Beacon, Committee::Bridge];

    pub const fn index(self) -> usize {
        match self {
            Committee::Beacon => 0,
            Committee::Bridge => 1,
        }
    }
}

impl Display for Committee {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Committee::Beacon => "Beacon",
            Committee::Bridge => "Bridge",
        })
    }
}

/// A Merkle inclusion path for one instruction.
///
/// `path` runs from the leaf up to (but excluding) `root`, and `is_left[i]`
/// marks whether `path[i]` is the left child at that level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleBranch {
    root: [u8; HASH_LEN],
    path: Vec<[u8; HASH_LEN]>,
    is_left: Vec<bool>,
}

impl MerkleBranch {
    pub fn new(
        root: [u8; HASH_LEN],
        path: Vec<[u8; HASH_LEN]>,
        is_left: Vec<bool>,
    ) -> Result<Self, ProtocolError> {
        if path.len() != is_left.len() {
            return Err(ProtocolError::PathFlagLengthMismatch {
                path: path.len(),
                is_left: is_left.len(),
            });
        }
        Ok(Self {
            root,
            path,
            is_left,
        })
    }

    pub fn root(&self) -> &[u8; HASH_LEN] {
        &self.root
    }

    pub fn path(&self) -> &[[u8; HASH_LEN]] {
        &self.path
    }

    pub fn is_left(&self) -> &[bool] {
        &self.is_left
    }

    /// Depth of the branch, which is also the length of both parallel arrays.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// Signatures collected from one committee over a block digest.
///
/// `signer_indices[i]` is the position in the committee of whoever produced
/// `signatures[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitteeAttestation {
    signer_indices: Vec<u64>,
    signatures: Vec<Vec<u8>>,
}

impl CommitteeAttestation {
    pub fn new(signer_indices: Vec<u64>, signatures: Vec<Vec<u8>>) -> Result<Self, ProtocolError> {
        if signer_indices.len() != signatures.len() {
            return Err(ProtocolError::AttestationLengthMismatch {
                indices: signer_indices.len(),
                signatures: signatures.len(),
            });
        }
        Ok(Self {
            signer_indices,
            signatures,
        })
    }

    pub fn signer_indices(&self) -> &[u64] {
        &self.signer_indices
    }

    pub fn signatures(&self) -> &[Vec<u8>] {
        &self.signatures
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

/// Proof that a burn instruction was recorded and finalized on the source
/// chain, attested by both committees.
///
/// Built once per unshield from a notary response and consumed by the
/// instruction encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnProof {
    /// The canonical cross-chain instruction being proven.
    pub instruction_bytes: Vec<u8>,
    pub height: [u64; COMMITTEE_COUNT],
    pub branch: [MerkleBranch; COMMITTEE_COUNT],
    pub block_data: [[u8; HASH_LEN]; COMMITTEE_COUNT],
    pub attestation: [CommitteeAttestation; COMMITTEE_COUNT],
}

impl BurnProof {
    pub fn height_of(&self, committee: Committee) -> u64 {
        self.height[committee.index()]
    }

    pub fn branch_of(&self, committee: Committee) -> &MerkleBranch {
        &self.branch[committee.index()]
    }

    pub fn block_data_of(&self, committee: Committee) -> &[u8; HASH_LEN] {
        &self.block_data[committee.index()]
    }

    pub fn attestation_of(&self, committee: Committee) -> &CommitteeAttestation {
        &self.attestation[committee.index()]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn branch_requires_parallel_arrays() {
        let err = MerkleBranch::new([0; 32], vec![[1; 32], [2; 32]], vec![true]).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::PathFlagLengthMismatch {
                path: 2,
                is_left: 1
            }
        ));
        assert_eq!(err.to_string(), "path/flag length mismatch: 2 siblings, 1 flags");
    }

    #[test]
    fn attestation_requires_parallel_arrays() {
        let err = CommitteeAttestation::new(vec![0, 1, 2], vec![vec![0; 65]]).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::AttestationLengthMismatch {
                indices: 3,
                signatures: 1
            }
        ));
    }

    #[test]
    fn committees_index_the_proof_arrays() {
        assert_eq!(Committee::ALL.map(Committee::index), [0, 1]);
        assert_eq!(Committee::Bridge.to_string(), "Bridge");
    }
}
