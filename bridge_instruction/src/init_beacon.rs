use burn_proof::verify::CommitteeKey;
use solana_program::pubkey::Pubkey;
use tracing::debug;

use crate::{
    account::AccountRole,
    error::ValidationError,
    instruction::{Payload, INIT_BEACON_TAG},
};

/// Capacity of the proxy account's beacon list.
pub const MAX_BEACON_ADDRESSES: usize = 20;

/// Initialises the proxy account with the beacon committee that attests to
/// burns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitBeaconRequest {
    pub vault: Pubkey,
    /// Bump seed of the vault authority address.
    pub bump_seed: u8,
    pub beacons: Vec<CommitteeKey>,
    pub accounts: Vec<AccountRole>,
}

/// `tag || vault (32) || bump_seed || count || beacons (64 each)`.
pub fn encode(request: InitBeaconRequest) -> Result<Payload, ValidationError> {
    let InitBeaconRequest {
        vault,
        bump_seed,
        beacons,
        accounts,
    } = request;

    // also keeps the count within a byte
    if beacons.is_empty() || beacons.len() > MAX_BEACON_ADDRESSES {
        return Err(ValidationError::BeaconCount {
            count: beacons.len(),
            max: MAX_BEACON_ADDRESSES,
        });
    }
    if accounts.is_empty() {
        return Err(ValidationError::EmptyAccounts);
    }

    let mut data = Vec::with_capacity(1 + 32 + 2 + beacons.len() * 64);
    data.push(INIT_BEACON_TAG);
    data.extend_from_slice(vault.as_ref());
    data.push(bump_seed);
    data.push(beacons.len() as u8);
    for beacon in &beacons {
        data.extend_from_slice(beacon);
    }

    debug!(%vault, beacons = beacons.len(), "encoded init beacon");
    Ok(Payload { data, accounts })
}

#[cfg(test)]
mod test {
    use super::*;

    fn request(beacons: usize) -> InitBeaconRequest {
        InitBeaconRequest {
            vault: Pubkey::new_from_array([0xaa; 32]),
            bump_seed: 255,
            beacons: vec![[0x04; 64]; beacons],
            accounts: vec![AccountRole::readonly(Pubkey::new_from_array([1; 32]))],
        }
    }

    #[test]
    fn layout() {
        let payload = encode(request(2)).unwrap();
        assert_eq!(payload.data.len(), 1 + 32 + 1 + 1 + 2 * 64);
        assert_eq!(payload.data[0], INIT_BEACON_TAG);
        assert_eq!(&payload.data[1..33], &[0xaa; 32]);
        assert_eq!(payload.data[33..35], [255, 2]);
    }

    #[test]
    fn beacon_list_is_bounded() {
        assert_eq!(
            encode(request(MAX_BEACON_ADDRESSES + 1)),
            Err(ValidationError::BeaconCount {
                count: MAX_BEACON_ADDRESSES + 1,
                max: MAX_BEACON_ADDRESSES
            })
        );
        assert!(matches!(
            encode(request(0)),
            Err(ValidationError::BeaconCount { count: 0, .. })
        ));
        assert!(encode(request(MAX_BEACON_ADDRESSES)).is_ok());
    }
}
