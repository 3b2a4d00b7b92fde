//! Parsing payloads back the way the receiving program reads them.
//!
//! The layouts mirror the encoders in this crate, except that the program
//! reads a burn instruction as exactly [`BURN_INSTRUCTION_LEN`] bytes and
//! every signature as exactly [`SIGNATURE_LEN`] bytes, where the encoder copies
//! whatever the notary returned. Unpacking an encoder's output therefore
//! checks it against what the program will actually see.
//!
//! Trailing bytes are an error.

use bridge_common::{HASH_LEN, IDENTITY_ADDRESS_LEN};
use burn_proof::{
    verify::{CommitteeKey, COMMITTEE_KEY_LEN, SIGNATURE_LEN},
    BURN_INSTRUCTION_LEN,
};
use solana_program::pubkey::Pubkey;
use winnow::{
    binary::{le_u64, length_repeat},
    combinator::{fail, trace},
    error::{ModalResult, StrContext},
    stream::Stream as _,
    token::{any, take},
    Parser as _,
};

use crate::{
    error::UnpackError,
    instruction::{InstructionTag, ProgramConstants},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeInstruction {
    Shield {
        amount: u64,
        identity_address: [u8; IDENTITY_ADDRESS_LEN],
    },
    WithdrawRequest {
        amount: u64,
        identity_address: [u8; IDENTITY_ADDRESS_LEN],
    },
    Unshield(UnshieldInstruction),
    InitBeacon {
        vault: Pubkey,
        bump_seed: u8,
        beacons: Vec<CommitteeKey>,
    },
}

/// The beacon committee's half of a burn proof, as carried by an unshield.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnshieldInstruction {
    pub instruction: [u8; BURN_INSTRUCTION_LEN],
    pub height: u64,
    pub path: Vec<[u8; HASH_LEN]>,
    pub is_left: Vec<bool>,
    pub root: [u8; HASH_LEN],
    pub block_data: [u8; HASH_LEN],
    pub signer_indices: Vec<u8>,
    pub signatures: Vec<[u8; SIGNATURE_LEN]>,
}

impl BridgeInstruction {
    pub fn unpack(input: &[u8]) -> Result<Self, UnpackError> {
        Self::unpack_with(input, &ProgramConstants::default())
    }

    pub fn unpack_with(input: &[u8], constants: &ProgramConstants) -> Result<Self, UnpackError> {
        match (|input: &mut &[u8]| bridge_instruction(input, constants)).parse(input) {
            Ok(it) => Ok(it),
            Err(e) => Err(UnpackError {
                offset: e.offset(),
                reason: e.inner().to_string(),
            }),
        }
    }

    pub fn tag(&self) -> InstructionTag {
        match self {
            BridgeInstruction::Shield { .. } => InstructionTag::Deposit,
            BridgeInstruction::WithdrawRequest { .. } => InstructionTag::WithdrawRequest,
            BridgeInstruction::Unshield(_) => InstructionTag::Unshield,
            BridgeInstruction::InitBeacon { .. } => InstructionTag::InitBeacon,
        }
    }
}

fn bridge_instruction(
    input: &mut &[u8],
    constants: &ProgramConstants,
) -> ModalResult<BridgeInstruction> {
    let start = input.checkpoint();
    let tag = byte(input)?;
    match constants.tag_of(tag) {
        Some(InstructionTag::Deposit) => trace(
            "shield",
            (word, array).map(|(amount, identity_address)| BridgeInstruction::Shield {
                amount,
                identity_address,
            }),
        )
        .parse_next(input),
        Some(InstructionTag::WithdrawRequest) => trace(
            "withdraw_request",
            (word, array).map(|(amount, identity_address)| {
                BridgeInstruction::WithdrawRequest {
                    amount,
                    identity_address,
                }
            }),
        )
        .parse_next(input),
        Some(InstructionTag::Unshield) => {
            trace("unshield", unshield.map(BridgeInstruction::Unshield)).parse_next(input)
        }
        Some(InstructionTag::InitBeacon) => trace("init_beacon", init_beacon).parse_next(input),
        None => {
            input.reset(&start);
            fail.context(StrContext::Label("unrecognised instruction tag"))
                .parse_next(input)
        }
    }
}

fn unshield(input: &mut &[u8]) -> ModalResult<UnshieldInstruction> {
    let instruction = trace("instruction", array).parse_next(input)?;
    let height = trace("height", word).parse_next(input)?;
    let path: Vec<[u8; HASH_LEN]> =
        trace("inst_path", length_repeat(byte, array)).parse_next(input)?;
    let is_left: Vec<bool> =
        trace("inst_path_is_left", length_repeat(byte, flag)).parse_next(input)?;
    let root = trace("inst_root", array).parse_next(input)?;
    let block_data = trace("blk_data", array).parse_next(input)?;
    let signer_indices: Vec<u8> =
        trace("signer_indices", length_repeat(byte, byte)).parse_next(input)?;
    let signatures: Vec<[u8; SIGNATURE_LEN]> =
        trace("signatures", length_repeat(byte, array)).parse_next(input)?;
    Ok(UnshieldInstruction {
        instruction,
        height,
        path,
        is_left,
        root,
        block_data,
        signer_indices,
        signatures,
    })
}

fn init_beacon(input: &mut &[u8]) -> ModalResult<BridgeInstruction> {
    let vault = trace("vault", array.map(Pubkey::new_from_array)).parse_next(input)?;
    let bump_seed = trace("bump_seed", byte).parse_next(input)?;
    let beacons: Vec<[u8; COMMITTEE_KEY_LEN]> =
        trace("beacons", length_repeat(byte, array)).parse_next(input)?;
    Ok(BridgeInstruction::InitBeacon {
        vault,
        bump_seed,
        beacons,
    })
}

fn byte(input: &mut &[u8]) -> ModalResult<u8> {
    any.parse_next(input)
}

fn word(input: &mut &[u8]) -> ModalResult<u64> {
    le_u64.parse_next(input)
}

fn flag(input: &mut &[u8]) -> ModalResult<bool> {
    any.verify_map(|b: u8| match b {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    })
    .context(StrContext::Label("boolean"))
    .parse_next(input)
}

fn array<const N: usize>(input: &mut &[u8]) -> ModalResult<[u8; N]> {
    take(N).try_map(<[u8; N]>::try_from).parse_next(input)
}
