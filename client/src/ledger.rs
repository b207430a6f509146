//! The seam between the workflow and whatever executes its transactions.
//!
//! [`crate::transactions::CustomRpcClient`] implements it against a validator over JSON-RPC and
//! [`crate::local_ledger::LocalLedger`] implements it in-process for tests.

use solana_address::Address;
use solana_instruction::Instruction;
use solana_sdk::signature::{
    Keypair,
    Signature,
};

use crate::error::StepError;

/// Calls are awaited one at a time by a single task, so implementations aren't required to be
/// `Send` or `Sync`.
#[allow(async_fn_in_trait)]
pub trait Ledger {
    /// Signs `instructions` with the payer plus `signers`, submits them as one transaction, and
    /// returns once the transaction is confirmed or has definitively failed.
    async fn submit(
        &self,
        payer: &Keypair,
        signers: &[&Keypair],
        instructions: &[Instruction],
    ) -> Result<Signature, StepError>;

    /// Returns the raw data of an account, or `None` if the account doesn't exist.
    async fn fetch_account_data(&self, address: &Address) -> Result<Option<Vec<u8>>, StepError>;

    /// Returns the token amount held by an SPL token account.
    async fn token_balance(&self, token_account: &Address) -> Result<u64, StepError>;

    /// Funds an address with enough lamports to pay for transactions and rent.
    async fn fund(&self, address: &Address) -> Result<(), StepError>;

    /// Creates a new SPL token mint with `authority` as its mint authority and payer.
    async fn create_mint(&self, authority: &Keypair, decimals: u8) -> Result<Address, StepError>;

    /// Creates the associated token account of `owner` for `mint`. The owner may be a PDA.
    async fn create_token_account(
        &self,
        payer: &Keypair,
        mint: &Address,
        owner: &Address,
    ) -> Result<Address, StepError>;

    async fn mint_to(
        &self,
        authority: &Keypair,
        mint: &Address,
        destination: &Address,
        amount: u64,
    ) -> Result<(), StepError>;

    async fn account_exists(&self, address: &Address) -> Result<bool, StepError> {
        Ok(self.fetch_account_data(address).await?.is_some())
    }
}
