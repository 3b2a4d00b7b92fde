#![allow(dead_code)]

use std::sync::Mutex;

use bridge_common::IDENTITY_ADDRESS_LEN;
use bridge_instruction::{account::UnshieldAccounts, AccountRole};
use burn_proof::{NetworkError, ProofRequest, ProofSource};
use bytes::Bytes;
use solana_program::pubkey::Pubkey;

pub const ENDPOINT: &str = "http://127.0.0.1:9334/";
pub const METHOD: &str = "getsolburnproof";
pub const BURN_REFERENCE: &str = "c0ffee";

pub fn key(n: u8) -> Pubkey {
    Pubkey::new_from_array([n; 32])
}

/// A printable identity of the right length.
pub fn identity() -> String {
    "12svfkP6w5UDJDSCwqH978PvqiqBxKmUnA9em9yAYWYJVRv7wuXY1qhhYpPAm4BDz2mLbFrRmdK3yRhnTqJCZXKHUmoi7NV83HCH2YFpctHNaDdkSiQshsjw2UFUuwdEvcidgaKmF3VJpY5f8RdN"
        .to_owned()
}

pub fn unshield_accounts() -> Vec<AccountRole> {
    UnshieldAccounts {
        vault_token_account: key(1),
        receiver: key(2),
        vault_authority: key(3),
        vault: key(4),
        proxy: key(5),
        token_program: key(6),
        receiver_token_account: key(7),
    }
    .roles()
}

/// Serves canned responses and records what it was asked for.
pub struct FakeSource {
    response: Result<Vec<u8>, fn() -> NetworkError>,
    pub requests: Mutex<Vec<ProofRequest>>,
}

impl FakeSource {
    pub fn serving(body: Vec<u8>) -> Self {
        Self {
            response: Ok(body),
            requests: Mutex::default(),
        }
    }

    pub fn failing(err: fn() -> NetworkError) -> Self {
        Self {
            response: Err(err),
            requests: Mutex::default(),
        }
    }

    pub fn requests(&self) -> Vec<ProofRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ProofSource for FakeSource {
    async fn fetch_proof(&self, request: &ProofRequest) -> Result<Bytes, NetworkError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.response {
            Ok(body) => Ok(Bytes::from(body.clone())),
            Err(err) => Err(err()),
        }
    }
}

#[test]
fn identity_has_the_expected_length() {
    assert_eq!(identity().len(), IDENTITY_ADDRESS_LEN);
}
