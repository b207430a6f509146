use std::{
    path::PathBuf,
    time::Duration,
};

use clap::{
    command,
    Parser,
};
use client::{
    scenario::{
        ScenarioConfig,
        DEFAULT_INITIAL_BALANCE,
        DEFAULT_PRICE,
        DEFAULT_WHITELIST_AMOUNT,
        SALE_MINT_DECIMALS,
    },
    transactions::ConfirmationConfig,
    workflow::FailurePolicy,
};
use presale_interface::program::ProgramIds;
use solana_address::Address;
use solana_sdk::signature::Keypair;

use crate::load_env::{
    load_keypair,
    load_pubkey,
};

#[derive(Parser)]
#[command(name = "presale-runner")]
pub struct CliArgs {
    /// The validator's RPC endpoint.
    #[arg(long, env = "CONNECTION_URI", default_value = "http://localhost:8899")]
    pub url: String,

    /// The metadata uri attached to the minted NFT.
    #[arg(long, env = "METADATA_URI", default_value = "")]
    pub metadata_uri: String,

    /// Directory holding `<name>.json` keypairs and `<name>_pub.json` public keys.
    #[arg(long, default_value = "keys")]
    pub keys_dir: PathBuf,

    /// Overrides the presale program id read from `<keys-dir>/program_pub.json`.
    #[arg(long)]
    pub program_id: Option<Address>,

    /// Overrides the token metadata program id read from `<keys-dir>/metadata_program_pub.json`.
    #[arg(long)]
    pub metadata_program_id: Option<Address>,

    /// The NFT's listing price in raw sale token units.
    #[arg(long, default_value_t = DEFAULT_PRICE)]
    pub price: u64,

    #[arg(long, default_value_t = DEFAULT_WHITELIST_AMOUNT)]
    pub whitelist_amount: u64,

    /// Raw sale tokens minted to each actor before the run.
    #[arg(long, default_value_t = DEFAULT_INITIAL_BALANCE)]
    pub initial_balance: u64,

    /// Skip every step after the first failed one.
    #[arg(long)]
    pub abort_on_failure: bool,

    /// Don't airdrop lamports to the actors.
    #[arg(long)]
    pub skip_airdrop: bool,

    /// Seconds to wait for each transaction to confirm.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

/// Everything the runner needs, resolved from the CLI args, the environment and the keys dir.
pub struct RunnerContext {
    pub url: String,
    pub ids: ProgramIds,
    pub creator: Keypair,
    pub bidder: Keypair,
    pub scenario: ScenarioConfig,
    pub policy: FailurePolicy,
    pub confirmation: ConfirmationConfig,
}

impl CliArgs {
    pub fn into_context(self) -> anyhow::Result<RunnerContext> {
        let defaults = ProgramIds::default();
        let presale = match self.program_id {
            Some(id) => id,
            None => load_pubkey(&self.keys_dir, "program")?.unwrap_or(defaults.presale),
        };
        let token_metadata = match self.metadata_program_id {
            Some(id) => id,
            None => load_pubkey(&self.keys_dir, "metadata_program")?
                .unwrap_or(defaults.token_metadata),
        };

        let creator = load_keypair(&self.keys_dir, "creator")?;
        let bidder = load_keypair(&self.keys_dir, "bidder")?;

        Ok(RunnerContext {
            url: self.url,
            ids: ProgramIds::new(presale, token_metadata),
            creator,
            bidder,
            scenario: ScenarioConfig {
                price: self.price,
                whitelist_amount: self.whitelist_amount,
                initial_balance: self.initial_balance,
                sale_decimals: SALE_MINT_DECIMALS,
                metadata_uri: self.metadata_uri,
                fund_actors: !self.skip_airdrop,
            },
            policy: if self.abort_on_failure {
                FailurePolicy::Abort
            } else {
                FailurePolicy::Continue
            },
            confirmation: ConfirmationConfig {
                timeout: Duration::from_secs(self.timeout_secs),
                ..Default::default()
            },
        })
    }
}

/// Loads the runner context from passed CLI arguments. See [`crate::load_env`] for how keys are
/// resolved.
pub fn initialize_context_from_cli() -> anyhow::Result<RunnerContext> {
    CliArgs::parse().into_context()
}
