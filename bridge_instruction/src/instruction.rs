use serde::{Deserialize, Serialize};
use solana_program::{instruction::Instruction, pubkey::Pubkey};

use crate::account::AccountRole;

pub const DEPOSIT_TAG: u8 = 0x00;
pub const UNSHIELD_TAG: u8 = 0x01;
pub const INIT_BEACON_TAG: u8 = 0x02;
pub const DEFAULT_WITHDRAW_REQUEST_TAG: u8 = 0x05;

/// The leading byte of every payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionTag {
    Deposit,
    Unshield,
    InitBeacon,
    WithdrawRequest,
}

/// Constants baked into the receiving program's build.
///
/// Deployed builds have disagreed on the withdraw-request tag, so it is read
/// from configuration rather than assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProgramConstants {
    pub withdraw_request_tag: u8,
}

impl Default for ProgramConstants {
    fn default() -> Self {
        Self {
            withdraw_request_tag: DEFAULT_WITHDRAW_REQUEST_TAG,
        }
    }
}

impl ProgramConstants {
    pub fn byte_of(&self, tag: InstructionTag) -> u8 {
        match tag {
            InstructionTag::Deposit => DEPOSIT_TAG,
            InstructionTag::Unshield => UNSHIELD_TAG,
            InstructionTag::InitBeacon => INIT_BEACON_TAG,
            InstructionTag::WithdrawRequest => self.withdraw_request_tag,
        }
    }

    pub fn tag_of(&self, byte: u8) -> Option<InstructionTag> {
        match byte {
            DEPOSIT_TAG => Some(InstructionTag::Deposit),
            UNSHIELD_TAG => Some(InstructionTag::Unshield),
            INIT_BEACON_TAG => Some(InstructionTag::InitBeacon),
            b if b == self.withdraw_request_tag => Some(InstructionTag::WithdrawRequest),
            _ => None,
        }
    }
}

/// An encoded instruction: opaque data plus the accounts it was built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub data: Vec<u8>,
    pub accounts: Vec<AccountRole>,
}

impl Payload {
    pub fn into_instruction(self, program_id: Pubkey) -> Instruction {
        Instruction {
            program_id,
            accounts: self.accounts.into_iter().map(Into::into).collect(),
            data: self.data,
        }
    }
}
