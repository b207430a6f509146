use presale_interface::program::ProgramIds;
use solana_address::Address;
use solana_sdk::signature::{
    Keypair,
    Signer,
};

use crate::{
    ledger::Ledger,
    logs::log_info,
    scenario::{
        run_sale_scenario,
        ScenarioConfig,
        ScenarioOutcome,
    },
    transactions::{
        CustomRpcClient,
        SendTransactionConfig,
    },
    workflow::FailurePolicy,
};

/// Convenience harness for running the sale scenario against a live or local validator.
///
/// Upon running it:
/// - Airdrops [`crate::transactions::DEFAULT_FUND_AMOUNT`] lamports to each actor that doesn't
///   exist on the cluster yet, so reruns against the same cluster don't hit airdrop limits.
/// - Runs [`run_sale_scenario`] with the harness's program ids.
pub struct E2e {
    pub rpc: CustomRpcClient,
    pub ids: ProgramIds,
}

impl E2e {
    pub fn new(url: &str, ids: ProgramIds, config: SendTransactionConfig) -> Self {
        let config = SendTransactionConfig {
            presale_program: ids.presale,
            ..config
        };
        Self {
            rpc: CustomRpcClient::new_from_url(url, config),
            ids,
        }
    }

    pub async fn fund_if_missing(&self, address: &Address) -> anyhow::Result<()> {
        if self.rpc.account_exists(address).await? {
            log_info("fund", format!("{address} already exists, skipping airdrop"));
            return Ok(());
        }
        self.rpc.fund_account(address).await
    }

    pub async fn run_sale_scenario(
        &self,
        creator: &Keypair,
        bidder: &Keypair,
        config: &ScenarioConfig,
        policy: FailurePolicy,
    ) -> anyhow::Result<ScenarioOutcome> {
        if config.fund_actors {
            self.fund_if_missing(&creator.pubkey()).await?;
            self.fund_if_missing(&bidder.pubkey()).await?;
        }
        let config = ScenarioConfig {
            fund_actors: false,
            ..config.clone()
        };
        run_sale_scenario(&self.rpc, self.ids, creator, bidder, &config, policy).await
    }
}
