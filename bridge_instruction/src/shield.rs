use bridge_common::IDENTITY_ADDRESS_LEN;
use tracing::debug;

use crate::{
    account::AccountRole,
    error::ValidationError,
    instruction::{InstructionTag, Payload, ProgramConstants},
};

/// Moves `amount` into the vault, to be credited to `identity_address` on the
/// other chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShieldRequest {
    /// Destination identity, exactly [`IDENTITY_ADDRESS_LEN`] printable ASCII
    /// characters.
    pub identity_address: String,
    pub amount: u64,
    /// [`InstructionTag::Deposit`] or [`InstructionTag::WithdrawRequest`].
    pub tag: InstructionTag,
    pub accounts: Vec<AccountRole>,
}

/// Encodes with the default [`ProgramConstants`].
pub fn encode(request: ShieldRequest) -> Result<Payload, ValidationError> {
    encode_with(request, &ProgramConstants::default())
}

/// `tag || amount (u64 LE) || identity_address`, the address written raw
/// without a length prefix.
pub fn encode_with(
    request: ShieldRequest,
    constants: &ProgramConstants,
) -> Result<Payload, ValidationError> {
    let ShieldRequest {
        identity_address,
        amount,
        tag,
        accounts,
    } = request;

    if !matches!(
        tag,
        InstructionTag::Deposit | InstructionTag::WithdrawRequest
    ) {
        return Err(ValidationError::NotAShield(tag));
    }
    let identity = check_identity(&identity_address)?;
    if accounts.is_empty() {
        return Err(ValidationError::EmptyAccounts);
    }

    let mut data = Vec::with_capacity(1 + 8 + IDENTITY_ADDRESS_LEN);
    data.push(constants.byte_of(tag));
    data.extend_from_slice(&amount.to_le_bytes());
    data.extend_from_slice(identity);

    debug!(?tag, amount, accounts = accounts.len(), "encoded shield");
    Ok(Payload { data, accounts })
}

fn check_identity(identity: &str) -> Result<&[u8], ValidationError> {
    let bytes = identity.as_bytes();
    if bytes.len() != IDENTITY_ADDRESS_LEN {
        return Err(ValidationError::IdentityLength {
            expected: IDENTITY_ADDRESS_LEN,
            actual: bytes.len(),
        });
    }
    match bytes.iter().position(|b| !(b' '..=b'~').contains(b)) {
        Some(position) => Err(ValidationError::IdentityNotPrintable {
            position,
            byte: bytes[position],
        }),
        None => Ok(bytes),
    }
}
