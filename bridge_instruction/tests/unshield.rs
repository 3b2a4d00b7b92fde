mod common;

use assert2::{check, let_assert};
use bridge_instruction::{
    build_unshield, unshield, BridgeInstruction, BuildError, EncodingError, UnshieldRequest,
    ValidationError, BURN_INSTRUCTION_LEN,
};
use burn_proof::{
    testing::{error_body, Fixture},
    BurnProof, Committee, CommitteeAttestation, ConsistencyCheck, DecodeOptions, MerkleBranch,
    NetworkError, ProtocolError, Severity,
};
use common::{unshield_accounts, FakeSource, BURN_REFERENCE, ENDPOINT, METHOD};
use hex_literal::hex;

fn request() -> UnshieldRequest {
    UnshieldRequest {
        burn_reference: BURN_REFERENCE.into(),
        proof_method: METHOD.into(),
        notary_endpoint: ENDPOINT.into(),
        accounts: unshield_accounts(),
        decode: DecodeOptions::default(),
    }
}

/// The beacon half of the fixture, laid out by hand.
fn expected_data(fixture: &Fixture) -> Vec<u8> {
    let proof = &fixture.proof;
    let branch = proof.branch_of(Committee::Beacon);
    let attestation = proof.attestation_of(Committee::Beacon);

    let mut data = vec![0x01];
    data.extend_from_slice(&proof.instruction_bytes);
    // 8000
    data.extend_from_slice(&hex!("401f000000000000"));
    data.push(3);
    data.extend_from_slice(&[0xa1; 32]);
    data.extend_from_slice(&[0x00; 32]);
    data.extend_from_slice(&[0xa3; 32]);
    data.extend_from_slice(&[3, 1, 0, 0]);
    data.extend_from_slice(branch.root());
    data.extend_from_slice(&[0xbd; 32]);
    data.extend_from_slice(&[3, 0, 1, 3]);
    data.push(3);
    for signature in attestation.signatures() {
        data.extend_from_slice(signature);
    }
    data
}

#[test]
fn decoded_proof_encodes_to_the_documented_layout() {
    let fixture = Fixture::new();
    let proof = burn_proof::decode(&fixture.response_body()).unwrap();
    let payload = unshield::encode(proof, unshield_accounts()).unwrap();

    check!(payload.data == expected_data(&fixture));
    check!(payload.accounts == unshield_accounts());
}

#[test]
fn program_reads_back_the_beacon_branch() {
    let fixture = Fixture::new();
    let payload = unshield::encode(fixture.proof.clone(), unshield_accounts()).unwrap();

    let_assert!(Ok(BridgeInstruction::Unshield(unpacked)) = BridgeInstruction::unpack(&payload.data));
    let branch = fixture.proof.branch_of(Committee::Beacon);
    let attestation = fixture.proof.attestation_of(Committee::Beacon);
    check!(unpacked.instruction.as_slice() == fixture.proof.instruction_bytes.as_slice());
    check!(unpacked.height == 8000);
    check!(unpacked.path == branch.path());
    check!(unpacked.is_left == branch.is_left());
    check!(&unpacked.root == branch.root());
    check!(unpacked.block_data == [0xbd; 32]);
    check!(unpacked.signer_indices == [0, 1, 3]);
    check!(unpacked.signatures.len() == attestation.len());
    for (unpacked, signature) in unpacked.signatures.iter().zip(attestation.signatures()) {
        check!(unpacked.as_slice() == signature.as_slice());
    }
}

#[test]
fn bridge_branch_is_not_serialized() {
    let fixture = Fixture::new();
    let mut other = fixture.proof.clone();
    other.branch[Committee::Bridge.index()] =
        MerkleBranch::new([0x11; 32], vec![[0x22; 32]], vec![true]).unwrap();
    other.height[Committee::Bridge.index()] = 1;

    check!(
        unshield::encode(other, unshield_accounts()).unwrap().data
            == unshield::encode(fixture.proof, unshield_accounts()).unwrap().data
    );
}

fn with_beacon_attestation(indices: Vec<u64>, signatures: Vec<Vec<u8>>) -> BurnProof {
    let mut proof = Fixture::new().proof;
    proof.attestation[Committee::Beacon.index()] =
        CommitteeAttestation::new(indices, signatures).unwrap();
    proof
}

#[test]
fn more_than_255_signatures_is_a_count_overflow() {
    let proof = with_beacon_attestation(vec![0; 256], vec![vec![0; 65]; 256]);
    let_assert!(
        Err(err @ EncodingError::CountOverflow {
            field: "signer_indices",
            count: 256
        }) = unshield::encode(proof, unshield_accounts())
    );
    check!(err.to_string().starts_with("count overflow"));

    let proof = with_beacon_attestation(vec![0; 255], vec![vec![0; 65]; 255]);
    check!(unshield::encode(proof, unshield_accounts()).is_ok());
}

#[test]
fn more_than_255_path_nodes_is_a_count_overflow() {
    let mut proof = Fixture::new().proof;
    proof.branch[Committee::Beacon.index()] =
        MerkleBranch::new([0; 32], vec![[1; 32]; 256], vec![false; 256]).unwrap();
    let_assert!(
        Err(EncodingError::CountOverflow {
            field: "inst_path",
            count: 256
        }) = unshield::encode(proof, unshield_accounts())
    );
}

#[test]
fn signer_indices_keep_their_low_byte() {
    let proof = with_beacon_attestation(vec![0x0103, 7], vec![vec![0xaa; 65], vec![0xbb; 65]]);
    let payload = unshield::encode(proof, unshield_accounts()).unwrap();
    let_assert!(Ok(BridgeInstruction::Unshield(unpacked)) = BridgeInstruction::unpack(&payload.data));
    check!(unpacked.signer_indices == [0x03, 7]);
}

#[test]
fn empty_accounts_are_rejected() {
    check!(unshield::encode(Fixture::new().proof, vec![]) == Err(EncodingError::EmptyAccounts));
}

#[test]
fn unexpected_instruction_length_is_still_encoded() {
    let mut proof = Fixture::new().proof;
    proof.instruction_bytes.truncate(BURN_INSTRUCTION_LEN - 2);
    let payload = unshield::encode(proof, unshield_accounts()).unwrap();
    // which the program would misread
    check!(BridgeInstruction::unpack(&payload.data).is_err());
}

#[tokio::test]
async fn pipeline_fetches_decodes_and_encodes() {
    let fixture = Fixture::new();
    let source = FakeSource::serving(fixture.response_body());

    let payload = build_unshield(&source, request()).await.unwrap();
    check!(payload.data == expected_data(&fixture));
    check!(payload.accounts == unshield_accounts());

    let requests = source.requests();
    check!(requests.len() == 1);
    check!(requests[0].endpoint.as_str() == ENDPOINT);
    check!(requests[0].method == METHOD);
    check!(requests[0].burn_reference == BURN_REFERENCE);
}

#[tokio::test]
async fn pipeline_rejects_bad_requests_before_fetching() {
    let source = FakeSource::serving(Fixture::new().response_body());

    let mut no_accounts = request();
    no_accounts.accounts.clear();
    let_assert!(
        Err(BuildError::Validation(ValidationError::EmptyAccounts)) =
            build_unshield(&source, no_accounts).await
    );

    let mut no_reference = request();
    no_reference.burn_reference.clear();
    let_assert!(
        Err(BuildError::Network(NetworkError::EmptyBurnReference)) =
            build_unshield(&source, no_reference).await
    );

    check!(source.requests().is_empty());
}

#[tokio::test]
async fn pipeline_refuses_corrupted_block_data_when_strict() {
    let fixture = Fixture::new();
    let mut response = fixture.response_json();
    let mut block_data = *fixture.proof.block_data_of(Committee::Beacon);
    block_data[0] ^= 0x01;
    response["Result"]["BeaconBlkData"] = serde_json::json!(hex::encode(block_data));
    let source = FakeSource::serving(response.to_string().into_bytes());

    // warned about, then encoded as received
    let payload = build_unshield(&source, request()).await.unwrap();
    let_assert!(Ok(BridgeInstruction::Unshield(unpacked)) = BridgeInstruction::unpack(&payload.data));
    check!(unpacked.block_data == block_data);

    let mut strict = request();
    strict.decode = DecodeOptions {
        consistency: ConsistencyCheck::Strict,
        committee_keys: fixture.trusted_keys(),
    };
    let_assert!(Err(BuildError::Protocol(err)) = build_unshield(&source, strict).await);
    check!(err.severity() == Severity::Warning);
    check!(err.to_string().starts_with("Beacon"));
}

#[tokio::test]
async fn pipeline_surfaces_each_failure_kind() {
    let source = FakeSource::failing(|| NetworkError::Cancelled);
    let_assert!(
        Err(BuildError::Network(NetworkError::Cancelled)) =
            build_unshield(&source, request()).await
    );

    let source = FakeSource::serving(error_body(-1, "burn not found"));
    let_assert!(
        Err(BuildError::Protocol(ProtocolError::ProofNotFound { .. })) =
            build_unshield(&source, request()).await
    );

    let mut response = Fixture::new().response_json();
    response["Result"]["BeaconSigIdxs"] = serde_json::json!(vec![0; 256]);
    response["Result"]["BeaconSigs"] = serde_json::json!(vec!["00"; 256]);
    let source = FakeSource::serving(response.to_string().into_bytes());
    let_assert!(
        Err(BuildError::Encoding(EncodingError::CountOverflow { count: 256, .. })) =
            build_unshield(&source, request()).await
    );
}
