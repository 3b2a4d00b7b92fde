//! Account roles and the positional schema of each instruction.
//!
//! The receiving program addresses accounts by position, so the order of the
//! lists built here is part of the wire format: reordering is a breaking
//! change for deployed programs.

use solana_program::{instruction::AccountMeta, pubkey::Pubkey, sysvar};

/// One account slot: which account, and how the instruction may use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountRole {
    pub pubkey: Pubkey,
    pub writable: bool,
    pub signer: bool,
}

impl AccountRole {
    pub const fn writable(pubkey: Pubkey) -> Self {
        Self {
            pubkey,
            writable: true,
            signer: false,
        }
    }

    pub const fn readonly(pubkey: Pubkey) -> Self {
        Self {
            pubkey,
            writable: false,
            signer: false,
        }
    }

    pub const fn readonly_signer(pubkey: Pubkey) -> Self {
        Self {
            pubkey,
            writable: false,
            signer: true,
        }
    }
}

impl From<AccountRole> for AccountMeta {
    fn from(role: AccountRole) -> Self {
        AccountMeta {
            pubkey: role.pubkey,
            is_signer: role.signer,
            is_writable: role.writable,
        }
    }
}

/// Accounts of a deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShieldAccounts {
    pub depositor_token_account: Pubkey,
    pub vault_token_account: Pubkey,
    /// Stores the beacon list and the vault's bump seed.
    pub proxy: Pubkey,
    pub depositor: Pubkey,
    pub token_program: Pubkey,
}

impl ShieldAccounts {
    pub fn roles(&self) -> Vec<AccountRole> {
        vec![
            AccountRole::writable(self.depositor_token_account),
            AccountRole::writable(self.vault_token_account),
            AccountRole::readonly(self.proxy),
            AccountRole::readonly_signer(self.depositor),
            AccountRole::readonly(self.token_program),
        ]
    }
}

/// Accounts of a withdraw request, which re-shields tokens held by a signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawRequestAccounts {
    pub signer_token_account: Pubkey,
    pub vault_token_account: Pubkey,
    pub proxy: Pubkey,
    pub signer: Pubkey,
    /// Derived from the signer account.
    pub signer_authority: Pubkey,
    pub token_program: Pubkey,
}

impl WithdrawRequestAccounts {
    pub fn roles(&self) -> Vec<AccountRole> {
        vec![
            AccountRole::writable(self.signer_token_account),
            AccountRole::writable(self.vault_token_account),
            AccountRole::readonly(self.proxy),
            AccountRole::readonly_signer(self.signer),
            AccountRole::readonly(self.signer_authority),
            AccountRole::readonly(self.token_program),
        ]
    }
}

/// Accounts of an unshield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnshieldAccounts {
    pub vault_token_account: Pubkey,
    pub receiver: Pubkey,
    /// Derived from the proxy account.
    pub vault_authority: Pubkey,
    /// Records spent burn ids.
    pub vault: Pubkey,
    pub proxy: Pubkey,
    pub token_program: Pubkey,
    pub receiver_token_account: Pubkey,
}

impl UnshieldAccounts {
    pub fn roles(&self) -> Vec<AccountRole> {
        vec![
            AccountRole::writable(self.vault_token_account),
            AccountRole::readonly(self.receiver),
            AccountRole::readonly(self.vault_authority),
            AccountRole::writable(self.vault),
            AccountRole::readonly(self.proxy),
            AccountRole::readonly(self.token_program),
            AccountRole::writable(self.receiver_token_account),
        ]
    }
}

/// Accounts of a proxy initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitBeaconAccounts {
    pub proxy: Pubkey,
    pub vault: Pubkey,
}

impl InitBeaconAccounts {
    pub fn roles(&self) -> Vec<AccountRole> {
        vec![
            AccountRole::readonly(sysvar::rent::ID),
            AccountRole::writable(self.proxy),
            AccountRole::writable(self.vault),
        ]
    }
}
