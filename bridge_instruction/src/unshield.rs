//! Unshield payloads and the fetch -> decode -> encode pipeline behind them.
//!
//! The receiving program verifies a single Merkle branch, so only the beacon
//! committee's half of the proof is serialized. The bridge half is still
//! decoded and checked for consistency.

use burn_proof::{
    verify::SIGNATURE_LEN, BurnProof, Committee, DecodeOptions, ProofRequest, ProofSource,
    BURN_INSTRUCTION_LEN,
};
use tracing::{debug, info, warn};

use crate::{
    account::AccountRole,
    error::{BuildError, EncodingError, ValidationError},
    instruction::{Payload, UNSHIELD_TAG},
};

/// Withdraws the tokens burned by `burn_reference` on the other chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnshieldRequest {
    pub burn_reference: String,
    /// Notary RPC method returning the burn proof.
    pub proof_method: String,
    pub notary_endpoint: String,
    pub accounts: Vec<AccountRole>,
    /// How the fetched proof is checked before it is encoded.
    pub decode: DecodeOptions,
}

/// Serializes the beacon half of `proof`:
///
/// ```text
/// tag                  1       0x01
/// instruction          var     instruction_bytes
/// height               8       u64 LE
/// path                 1 + 32n
/// is_left              1 + n   0x00 / 0x01
/// root                 32
/// block_data           32
/// signer_indices       1 + m   low byte of each index
/// signatures           1 + ..  concatenated as received
/// ```
///
/// Counts are single bytes. A list that does not fit is an error, never
/// truncated.
pub fn encode(proof: BurnProof, accounts: Vec<AccountRole>) -> Result<Payload, EncodingError> {
    if accounts.is_empty() {
        return Err(EncodingError::EmptyAccounts);
    }

    let committee = Committee::Beacon;
    let branch = proof.branch_of(committee);
    let attestation = proof.attestation_of(committee);

    let path_len = count("inst_path", branch.len())?;
    let is_left_len = count("inst_path_is_left", branch.is_left().len())?;
    let indices_len = count("signer_indices", attestation.signer_indices().len())?;
    let signatures_len = count("signatures", attestation.signatures().len())?;

    if proof.instruction_bytes.len() != BURN_INSTRUCTION_LEN {
        warn!(
            len = proof.instruction_bytes.len(),
            expected = BURN_INSTRUCTION_LEN,
            "burn instruction has an unexpected length"
        );
    }
    if let Some(position) = attestation
        .signatures()
        .iter()
        .position(|sig| sig.len() != SIGNATURE_LEN)
    {
        warn!(
            position,
            expected = SIGNATURE_LEN,
            "signature has an unexpected length"
        );
    }

    let mut data = Vec::with_capacity(
        1 + proof.instruction_bytes.len()
            + 8
            + 1
            + 33 * branch.len()
            + 64
            + 2
            + attestation.len() * (1 + SIGNATURE_LEN),
    );
    data.push(UNSHIELD_TAG);
    data.extend_from_slice(&proof.instruction_bytes);
    data.extend_from_slice(&proof.height_of(committee).to_le_bytes());

    data.push(path_len);
    for node in branch.path() {
        data.extend_from_slice(node);
    }
    data.push(is_left_len);
    data.extend(branch.is_left().iter().map(|is_left| u8::from(*is_left)));

    data.extend_from_slice(branch.root());
    data.extend_from_slice(proof.block_data_of(committee));

    data.push(indices_len);
    for &index in attestation.signer_indices() {
        if index > u64::from(u8::MAX) {
            warn!(index, "signer index does not fit in a byte, keeping its low byte");
        }
        data.push(index as u8);
    }
    data.push(signatures_len);
    for signature in attestation.signatures() {
        data.extend_from_slice(signature);
    }

    debug!(
        len = data.len(),
        height = proof.height_of(committee),
        signatures = attestation.len(),
        "encoded unshield"
    );
    Ok(Payload { data, accounts })
}

fn count(field: &'static str, len: usize) -> Result<u8, EncodingError> {
    u8::try_from(len).map_err(|_| EncodingError::CountOverflow { field, count: len })
}

/// Fetches the proof for `request.burn_reference` from `source`, decodes it
/// and encodes the unshield payload.
///
/// Nothing is sent for a request without accounts or without a burn
/// reference.
pub async fn build_unshield(
    source: &impl ProofSource,
    request: UnshieldRequest,
) -> Result<Payload, BuildError> {
    let UnshieldRequest {
        burn_reference,
        proof_method,
        notary_endpoint,
        accounts,
        decode,
    } = request;
    if accounts.is_empty() {
        return Err(ValidationError::EmptyAccounts.into());
    }

    let proof_request = ProofRequest::new(&notary_endpoint, proof_method, burn_reference)?;
    let body = source.fetch_proof(&proof_request).await?;
    let proof = burn_proof::decode_with(&body, decode)?;
    let payload = encode(proof, accounts)?;

    info!(
        burn_reference = %proof_request.burn_reference,
        len = payload.data.len(),
        "built unshield"
    );
    Ok(payload)
}
