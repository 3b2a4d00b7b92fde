//! Fetches a burn proof from a notary node and prints the unshield
//! instruction built from it.

use anyhow::{Context as _, Result};
use bridge_common::env::load_dotenv_if_present;
use bridge_instruction::{account::UnshieldAccounts, build_unshield, UnshieldRequest};
use burn_proof::{
    notary::cli::CliNotaryConfig, ConsistencyCheck, DecodeOptions, NotaryClient, NotaryConfig,
};
use clap::{Args, Parser, ValueHint};
use solana_program::pubkey::Pubkey;
use tracing::info;

const ACCOUNTS_HEADING: &str = "Unshield accounts";

fn pubkey(s: &str) -> Result<Pubkey, String> {
    s.parse().map_err(|e| format!("{e}"))
}

#[derive(Args, Debug)]
struct CliUnshieldAccounts {
    #[arg(long, value_parser = pubkey, help_heading = ACCOUNTS_HEADING)]
    vault_token_account: Pubkey,
    #[arg(long, value_parser = pubkey, help_heading = ACCOUNTS_HEADING)]
    receiver: Pubkey,
    #[arg(long, value_parser = pubkey, help_heading = ACCOUNTS_HEADING)]
    vault_authority: Pubkey,
    #[arg(long, value_parser = pubkey, help_heading = ACCOUNTS_HEADING)]
    vault: Pubkey,
    #[arg(long, value_parser = pubkey, env = "BRIDGE_PROXY", help_heading = ACCOUNTS_HEADING)]
    proxy: Pubkey,
    #[arg(long, value_parser = pubkey, help_heading = ACCOUNTS_HEADING)]
    token_program: Pubkey,
    #[arg(long, value_parser = pubkey, help_heading = ACCOUNTS_HEADING)]
    receiver_token_account: Pubkey,
}

impl From<CliUnshieldAccounts> for UnshieldAccounts {
    fn from(cli: CliUnshieldAccounts) -> Self {
        Self {
            vault_token_account: cli.vault_token_account,
            receiver: cli.receiver,
            vault_authority: cli.vault_authority,
            vault: cli.vault,
            proxy: cli.proxy,
            token_program: cli.token_program,
            receiver_token_account: cli.receiver_token_account,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// The notary's JSON-RPC endpoint.
    #[arg(short, long, env = "BRIDGE_NOTARY_URL", value_hint = ValueHint::Url)]
    endpoint: String,
    /// The RPC method returning the burn proof.
    #[arg(long, default_value = "getsolburnproof")]
    method: String,
    /// The burn on the other chain, as the notary knows it.
    #[arg(short, long)]
    burn_reference: String,
    /// The vault bridge program.
    #[arg(long, value_parser = pubkey, env = "BRIDGE_PROGRAM_ID")]
    program_id: Pubkey,
    /// Refuse proofs whose roots do not recompute instead of warning.
    #[arg(long)]
    strict: bool,
    #[command(flatten)]
    accounts: CliUnshieldAccounts,
    #[command(flatten)]
    notary: CliNotaryConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv_if_present();
    bridge_common::tracing::init();

    let cli = Cli::parse();
    let client = NotaryClient::new(NotaryConfig::from(cli.notary))?;
    let consistency = match cli.strict {
        true => ConsistencyCheck::Strict,
        false => ConsistencyCheck::Warn,
    };
    let request = UnshieldRequest {
        burn_reference: cli.burn_reference,
        proof_method: cli.method,
        notary_endpoint: cli.endpoint,
        accounts: UnshieldAccounts::from(cli.accounts).roles(),
        decode: DecodeOptions::from(consistency),
    };

    let instruction = build_unshield(&client, request)
        .await
        .context("building unshield instruction")?
        .into_instruction(cli.program_id);
    info!(len = instruction.data.len(), "unshield instruction ready");

    println!("{}", hex::encode(&instruction.data));
    for account in &instruction.accounts {
        println!(
            "{} signer={} writable={}",
            account.pubkey, account.is_signer, account.is_writable
        );
    }
    Ok(())
}
