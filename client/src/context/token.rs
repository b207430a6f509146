//! Token-level context for creating mints and token accounts and minting to them, for sale setup
//! in scenarios and tests.

use solana_address::Address;
use solana_sdk::signature::Keypair;
use spl_associated_token_account_interface::address::get_associated_token_address;

use crate::{
    error::StepError,
    ledger::Ledger,
};

pub struct TokenContext {
    /// If the mint authority is provided, [`TokenContext`] enables minting tokens directly
    /// to recipients, mostly for testing purposes.
    mint_authority: Option<Keypair>,
    pub mint_address: Address,
    pub mint_decimals: u8,
}

impl TokenContext {
    /// Wraps an existing mint. Without a mint authority the context can only derive accounts.
    pub fn new_from_existing(
        mint_address: Address,
        mint_decimals: u8,
        mint_authority: Option<Keypair>,
    ) -> Self {
        Self {
            mint_authority,
            mint_address,
            mint_decimals,
        }
    }

    /// Creates a new, random token mint with `mint_authority` as its authority and payer.
    pub async fn create_new<L: Ledger>(
        ledger: &L,
        mint_authority: Keypair,
        decimals: u8,
    ) -> Result<Self, StepError> {
        let mint_address = ledger.create_mint(&mint_authority, decimals).await?;

        Ok(Self {
            mint_authority: Some(mint_authority),
            mint_address,
            mint_decimals: decimals,
        })
    }

    pub fn mint_authority(&self) -> Result<&Keypair, StepError> {
        self.mint_authority.as_ref().ok_or_else(|| {
            StepError::Authorization("mint authority wasn't passed to the token context".into())
        })
    }

    /// Creates the owner's token account for this mint, paid for by `payer`.
    pub async fn create_account_for<L: Ledger>(
        &self,
        ledger: &L,
        payer: &Keypair,
        owner: &Address,
    ) -> Result<Address, StepError> {
        ledger
            .create_token_account(payer, &self.mint_address, owner)
            .await
    }

    pub fn get_account_for(&self, owner: &Address) -> Address {
        get_associated_token_address(owner, &self.mint_address)
    }

    /// If the mint authority was passed to the token context upon creation, this mints tokens
    /// directly to the owner's token account. Otherwise, it fails immediately.
    pub async fn mint_to<L: Ledger>(
        &self,
        ledger: &L,
        owner: &Address,
        amount: u64,
    ) -> Result<(), StepError> {
        let mint_authority = self.mint_authority()?;
        ledger
            .mint_to(
                mint_authority,
                &self.mint_address,
                &self.get_account_for(owner),
                amount,
            )
            .await
    }

    pub async fn get_balance_for<L: Ledger>(
        &self,
        ledger: &L,
        owner: &Address,
    ) -> Result<u64, StepError> {
        ledger.token_balance(&self.get_account_for(owner)).await
    }
}
