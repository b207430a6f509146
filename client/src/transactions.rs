//! Lightweight, nonblocking RPC client utilities for funding accounts and sending transactions,
//! with bounded confirmation polling in place of fixed sleeps.

use std::time::Duration;

use anyhow::Context;
use colored::Colorize;
use itertools::Itertools;
use presale_interface::program::DEFAULT_PRESALE_PROGRAM_ID;
use solana_address::Address;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_commitment_config::CommitmentConfig;
use solana_compute_budget_interface::ComputeBudgetInstruction;
use solana_sdk::{
    message::{
        Instruction,
        Message,
    },
    program_pack::Pack,
    signature::{
        Keypair,
        Signature,
        Signer,
    },
    transaction::Transaction,
};
use spl_token_interface::state::{
    Account,
    Mint,
};
use tokio::time::{
    sleep,
    Instant,
};

use crate::{
    error::{
        classify_client_error,
        classify_transaction_error,
        StepError,
    },
    ledger::Ledger,
    logs::log_error,
    print_kv,
    token_instructions::{
        create_and_initialize_mint_instructions,
        create_token_account_instruction,
        mint_to_instruction,
    },
    LogColor,
};

pub struct CustomRpcClient {
    pub client: RpcClient,
    pub config: SendTransactionConfig,
}

impl Default for CustomRpcClient {
    fn default() -> Self {
        CustomRpcClient {
            client: RpcClient::new_with_commitment(
                "http://localhost:8899".into(),
                CommitmentConfig::confirmed(),
            ),
            config: Default::default(),
        }
    }
}

impl CustomRpcClient {
    pub fn new(client: Option<RpcClient>, config: Option<SendTransactionConfig>) -> Self {
        match (client, config) {
            (Some(client), Some(config)) => Self { client, config },
            (client, config) => {
                let CustomRpcClient {
                    client: default_client,
                    config: default_config,
                } = Default::default();
                Self {
                    client: client.unwrap_or(default_client),
                    config: config.unwrap_or(default_config),
                }
            }
        }
    }

    pub fn new_from_url(url: &str, config: SendTransactionConfig) -> Self {
        CustomRpcClient {
            client: RpcClient::new_with_commitment(url.into(), CommitmentConfig::confirmed()),
            config,
        }
    }

    pub async fn fund_account(&self, address: &Address) -> anyhow::Result<()> {
        fund(&self.client, address, &self.config)
            .await
            .context("Failed to fund account")
    }

    pub async fn fund_new_account(&self) -> anyhow::Result<Keypair> {
        let kp = Keypair::new();
        self.fund_account(&kp.pubkey()).await?;

        Ok(kp)
    }

    /// Sends and confirms a transaction with the signer passed in as the payer and sole signer.
    pub async fn send_single_signer(
        &self,
        signer: &Keypair,
        instructions: impl AsRef<[Instruction]>,
    ) -> Result<Signature, StepError> {
        self.send_and_confirm_txn(signer, &[], instructions.as_ref())
            .await
    }

    pub async fn send_and_confirm_txn(
        &self,
        payer: &Keypair,
        signers: &[&Keypair],
        instructions: &[Instruction],
    ) -> Result<Signature, StepError> {
        send_transaction_with_config(&self.client, payer, signers, instructions, &self.config).await
    }
}

pub const DEFAULT_FUND_AMOUNT: u64 = 10_000_000_000;

/// Bounds how long a submitted transaction or airdrop is polled for before giving up.
#[derive(Clone, Debug)]
pub struct ConfirmationConfig {
    /// Total time allowed for a signature to reach `confirmed`.
    pub timeout: Duration,
    /// Delay between status polls while the signature is still pending.
    pub poll_interval: Duration,
    /// Upper bound on the backoff applied after transient RPC errors while polling.
    pub max_backoff: Duration,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        ConfirmationConfig {
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(500),
            max_backoff: Duration::from_secs(4),
        }
    }
}

#[derive(Clone)]
pub struct SendTransactionConfig {
    pub compute_budget: Option<u32>,
    pub debug_logs: Option<bool>,
    /// Custom error codes from instructions targeting this program are read as presale errors.
    pub presale_program: Address,
    pub confirmation: ConfirmationConfig,
}

impl Default for SendTransactionConfig {
    fn default() -> Self {
        SendTransactionConfig {
            compute_budget: Default::default(),
            debug_logs: Some(true),
            presale_program: DEFAULT_PRESALE_PROGRAM_ID,
            confirmation: Default::default(),
        }
    }
}

async fn fund(
    rpc: &RpcClient,
    address: &Address,
    config: &SendTransactionConfig,
) -> Result<(), StepError> {
    let airdrop_signature = rpc
        .request_airdrop(address, DEFAULT_FUND_AMOUNT)
        .await
        .map_err(|e| classify_client_error(&e, &[], &config.presale_program))?;

    confirm_signature(rpc, &airdrop_signature, &[], config).await
}

async fn send_transaction_with_config(
    rpc: &RpcClient,
    payer: &Keypair,
    signers: &[&Keypair],
    instructions: &[Instruction],
    config: &SendTransactionConfig,
) -> Result<Signature, StepError> {
    let bh = rpc
        .get_latest_blockhash()
        .await
        .map_err(|e| classify_client_error(&e, instructions, &config.presale_program))?;

    let final_instructions: &[Instruction] = &[
        config.compute_budget.map_or(vec![], |budget| {
            vec![
                ComputeBudgetInstruction::set_compute_unit_limit(budget),
                ComputeBudgetInstruction::set_compute_unit_price(1),
            ]
        }),
        instructions.to_vec(),
    ]
    .concat();

    let msg = Message::new(final_instructions, Some(&payer.pubkey()));

    let mut tx = Transaction::new_unsigned(msg);
    let all_signers = std::iter::once(payer)
        .chain(signers.iter().copied())
        .unique_by(|kp| kp.pubkey())
        .collect::<Vec<_>>();
    tx.try_sign(&all_signers, bh)
        .map_err(|e| StepError::Authorization(e.to_string()))?;

    let res = rpc.send_transaction(&tx).await;
    let signature = match res {
        Ok(signature) => signature,
        Err(error) => {
            let step_error =
                classify_client_error(&error, final_instructions, &config.presale_program);
            if matches!(config.debug_logs, Some(true)) {
                log_error("Failed transaction submission", &step_error);
                print_kv!("Payer", payer.pubkey(), LogColor::Error);
            }
            return Err(step_error);
        }
    };

    confirm_signature(rpc, &signature, final_instructions, config).await?;

    if matches!(config.debug_logs, Some(true)) {
        print_kv!("Signature", signature, LogColor::Info);
    }

    Ok(signature)
}

/// Polls the signature's status until it's confirmed, fails on-chain, or the configured timeout
/// elapses. Transient RPC errors back off exponentially up to `max_backoff`; any other RPC error
/// ends polling immediately.
async fn confirm_signature(
    rpc: &RpcClient,
    signature: &Signature,
    instructions: &[Instruction],
    config: &SendTransactionConfig,
) -> Result<(), StepError> {
    let ConfirmationConfig {
        timeout,
        poll_interval,
        max_backoff,
    } = config.confirmation;
    let deadline = Instant::now() + timeout;
    let mut delay = poll_interval;

    loop {
        match rpc
            .get_signature_status_with_commitment(signature, CommitmentConfig::confirmed())
            .await
        {
            Ok(Some(Ok(()))) => return Ok(()),
            Ok(Some(Err(transaction_error))) => {
                return Err(classify_transaction_error(
                    transaction_error,
                    instructions,
                    &config.presale_program,
                ))
            }
            Ok(None) => delay = poll_interval,
            Err(error) => {
                let step_error =
                    classify_client_error(&error, instructions, &config.presale_program);
                if !step_error.is_retryable() {
                    return Err(step_error);
                }
                delay = (delay * 2).min(max_backoff);
            }
        }

        if Instant::now() + delay > deadline {
            return Err(StepError::Transient(format!(
                "{signature} wasn't confirmed within {timeout:?}"
            )));
        }
        sleep(delay).await;
    }
}

impl Ledger for CustomRpcClient {
    async fn submit(
        &self,
        payer: &Keypair,
        signers: &[&Keypair],
        instructions: &[Instruction],
    ) -> Result<Signature, StepError> {
        self.send_and_confirm_txn(payer, signers, instructions)
            .await
    }

    async fn fetch_account_data(&self, address: &Address) -> Result<Option<Vec<u8>>, StepError> {
        let response = self
            .client
            .get_account_with_commitment(address, CommitmentConfig::confirmed())
            .await
            .map_err(|e| classify_client_error(&e, &[], &self.config.presale_program))?;
        Ok(response.value.map(|account| account.data))
    }

    async fn token_balance(&self, token_account: &Address) -> Result<u64, StepError> {
        let data = self
            .fetch_account_data(token_account)
            .await?
            .ok_or_else(|| StepError::Resolution(format!("token account {token_account}")))?;
        let account = Account::unpack(&data)
            .map_err(|e| StepError::Resolution(format!("token account {token_account}: {e}")))?;
        Ok(account.amount)
    }

    async fn fund(&self, address: &Address) -> Result<(), StepError> {
        fund(&self.client, address, &self.config).await
    }

    async fn create_mint(&self, authority: &Keypair, decimals: u8) -> Result<Address, StepError> {
        let mint = Keypair::new();
        let mint_rent = self
            .client
            .get_minimum_balance_for_rent_exemption(Mint::LEN)
            .await
            .map_err(|e| classify_client_error(&e, &[], &self.config.presale_program))?;
        let (create_mint_account, initialize_mint) = create_and_initialize_mint_instructions(
            &authority.pubkey(),
            &mint.pubkey(),
            mint_rent,
            decimals,
        )?;

        self.send_and_confirm_txn(
            authority,
            &[&mint],
            &[create_mint_account, initialize_mint],
        )
        .await?;

        Ok(mint.pubkey())
    }

    async fn create_token_account(
        &self,
        payer: &Keypair,
        mint: &Address,
        owner: &Address,
    ) -> Result<Address, StepError> {
        let (instruction, token_account) =
            create_token_account_instruction(&payer.pubkey(), owner, mint);
        self.send_single_signer(payer, [instruction]).await?;
        Ok(token_account)
    }

    async fn mint_to(
        &self,
        authority: &Keypair,
        mint: &Address,
        destination: &Address,
        amount: u64,
    ) -> Result<(), StepError> {
        let instruction = mint_to_instruction(mint, destination, &authority.pubkey(), amount)?;
        self.send_single_signer(authority, [instruction]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use presale_interface::error::PoolError;
    use serde_json::json;
    use solana_client::rpc_request::RpcRequest;

    use super::*;

    fn presale_instruction(program_id: Address) -> Instruction {
        Instruction {
            program_id,
            accounts: vec![],
            data: vec![1, 2, 3],
        }
    }

    fn quick_confirmation() -> SendTransactionConfig {
        SendTransactionConfig {
            confirmation: ConfirmationConfig {
                timeout: Duration::from_millis(300),
                poll_interval: Duration::from_millis(20),
                max_backoff: Duration::from_millis(80),
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn unconfirmed_signature_times_out_within_the_budget() {
        // The mock sender reports every signature as unknown for this url.
        let rpc = RpcClient::new_mock_with_mocks("sig_not_found".into(), HashMap::new());
        let config = quick_confirmation();
        let payer = Keypair::new();

        let started = std::time::Instant::now();
        let error = send_transaction_with_config(
            &rpc,
            &payer,
            &[],
            &[presale_instruction(config.presale_program)],
            &config,
        )
        .await
        .unwrap_err();

        assert!(matches!(error, StepError::Transient(_)), "{error:?}");
        assert!(error.is_retryable());
        assert!(started.elapsed() < config.confirmation.timeout + Duration::from_millis(500));
    }

    #[tokio::test]
    async fn on_chain_failure_ends_polling_with_the_program_error() {
        let failed = json!({ "InstructionError": [0, { "Custom": PoolError::PresaleLive.code() }] });
        let statuses = json!({
            "context": { "slot": 1, "apiVersion": null },
            "value": [{
                "slot": 1,
                "confirmations": null,
                "status": { "Err": failed },
                "err": failed,
                "confirmationStatus": "finalized",
            }],
        });
        // Mocked responses are served once, later status polls would report success.
        let rpc = RpcClient::new_mock_with_mocks(
            "succeeds".into(),
            HashMap::from([(RpcRequest::GetSignatureStatuses, statuses)]),
        );
        let config = quick_confirmation();

        let error = send_transaction_with_config(
            &rpc,
            &Keypair::new(),
            &[],
            &[presale_instruction(config.presale_program)],
            &config,
        )
        .await
        .unwrap_err();

        assert_eq!(error.pool_error(), Some(PoolError::PresaleLive));
        assert!(!error.is_retryable());
    }

    #[tokio::test]
    async fn confirmed_signature_is_returned() {
        let rpc = RpcClient::new_mock_with_mocks("succeeds".into(), HashMap::new());
        let config = quick_confirmation();
        let payer = Keypair::new();

        let signature = send_transaction_with_config(
            &rpc,
            &payer,
            &[],
            &[presale_instruction(config.presale_program)],
            &config,
        )
        .await
        .unwrap();
        assert_ne!(signature, Signature::default());
    }
}
