use std::time::Duration;

use bridge_common::env::load_dotenv_if_present;
use clap::{Args, Parser};

use super::NotaryConfig;

const HELP_HEADING: &str = "Notary options";

/// Command-line and environment configuration for a [`super::NotaryClient`].
#[derive(Args, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct CliNotaryConfig {
    /// Timeout for a single notary request, in milliseconds.
    #[arg(long, env = "BRIDGE_NOTARY_TIMEOUT_MS", help_heading = HELP_HEADING, default_value_t = 30_000)]
    notary_timeout: u64,
    /// Pause between retries, in milliseconds.
    #[arg(long, env = "BRIDGE_NOTARY_BACKOFF_MS", help_heading = HELP_HEADING, default_value_t = 0)]
    notary_backoff: u64,
    /// How many times a transient failure is retried.
    #[arg(long, env = "BRIDGE_NOTARY_MAX_RETRIES", help_heading = HELP_HEADING, default_value_t = 0)]
    notary_max_retries: u32,
}

impl From<CliNotaryConfig> for NotaryConfig {
    fn from(cli: CliNotaryConfig) -> Self {
        Self {
            timeout: Duration::from_millis(cli.notary_timeout),
            backoff: Duration::from_millis(cli.notary_backoff),
            max_retries: cli.notary_max_retries,
        }
    }
}

#[derive(Parser)]
struct EnvOnly {
    #[command(flatten)]
    notary: CliNotaryConfig,
}

impl NotaryConfig {
    /// Reads the `BRIDGE_NOTARY_*` variables, after loading a local `.env`.
    /// Unset variables take the same defaults as the command line.
    pub fn from_env() -> Result<Self, clap::Error> {
        load_dotenv_if_present();
        Ok(EnvOnly::try_parse_from(["burn_proof"])?.notary.into())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn flags_map_onto_the_client_config() {
        let cli = EnvOnly::parse_from([
            "bridge",
            "--notary-timeout",
            "1500",
            "--notary-backoff",
            "250",
            "--notary-max-retries",
            "3",
        ]);
        assert_eq!(
            NotaryConfig::from(cli.notary),
            NotaryConfig {
                timeout: Duration::from_millis(1500),
                backoff: Duration::from_millis(250),
                max_retries: 3,
            }
        );
    }
}
