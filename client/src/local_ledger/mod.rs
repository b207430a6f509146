//! An in-process [`Ledger`] that emulates the presale program, the SPL token program and the parts
//! of the token metadata program the presale program invokes.
//!
//! Transactions are applied atomically: every instruction runs against a copy of the ledger state,
//! and the copy only replaces the live state once all of them succeed. Failures are reported as the
//! same instruction errors the cluster would return and classified exactly like RPC failures.

use std::{
    cell::{
        Cell,
        RefCell,
    },
    collections::{
        HashMap,
        HashSet,
    },
};

use borsh::{
    BorshDeserialize,
    BorshSerialize,
};
use presale_interface::{
    program::ProgramIds,
    state::NftMetadata,
};
use solana_address::Address;
use solana_instruction::Instruction;
use solana_sdk::{
    program_pack::Pack,
    signature::{
        Keypair,
        Signature,
        Signer,
    },
};
use solana_transaction_error::TransactionError;
use spl_associated_token_account_interface::address::get_associated_token_address;
use spl_token_interface::state::{
    Account,
    AccountState,
    Mint,
};

use crate::{
    error::{
        classify_instruction_error,
        classify_transaction_error,
        StepError,
    },
    ledger::Ledger,
    pda::find_metadata_address,
    transactions::DEFAULT_FUND_AMOUNT,
};

mod program;
mod token;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MintState {
    /// `None` once the authority has been handed to a master edition.
    pub authority: Option<Address>,
    pub decimals: u8,
    pub supply: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenAccountState {
    pub mint: Address,
    pub owner: Address,
    pub amount: u64,
}

/// The fields of a token metadata account the presale program reads or changes. Fetching one
/// returns this record Borsh-encoded, not the token metadata program's own layout.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct MetadataState {
    pub mint: Address,
    pub update_authority: Address,
    pub data: NftMetadata,
    pub primary_sale_happened: bool,
}

#[derive(Clone, Debug, Default)]
struct LedgerState {
    lamports: HashMap<Address, u64>,
    mints: HashMap<Address, MintState>,
    token_accounts: HashMap<Address, TokenAccountState>,
    metadata: HashMap<Address, MetadataState>,
    master_editions: HashSet<Address>,
    /// Presale program accounts, stored exactly as the program lays them out.
    records: HashMap<Address, Vec<u8>>,
}

impl LedgerState {
    fn is_allocated(&self, address: &Address) -> bool {
        self.records.contains_key(address)
            || self.mints.contains_key(address)
            || self.token_accounts.contains_key(address)
            || self.metadata.contains_key(address)
            || self.master_editions.contains(address)
    }
}

pub struct LocalLedger {
    ids: ProgramIds,
    state: RefCell<LedgerState>,
    transaction_count: Cell<u64>,
}

impl Default for LocalLedger {
    fn default() -> Self {
        Self::new(ProgramIds::default())
    }
}

impl LocalLedger {
    pub fn new(ids: ProgramIds) -> Self {
        Self {
            ids,
            state: RefCell::new(LedgerState::default()),
            transaction_count: Cell::new(0),
        }
    }

    pub fn ids(&self) -> ProgramIds {
        self.ids
    }

    pub fn mint(&self, address: &Address) -> Option<MintState> {
        self.state.borrow().mints.get(address).copied()
    }

    pub fn token_account(&self, address: &Address) -> Option<TokenAccountState> {
        self.state.borrow().token_accounts.get(address).copied()
    }

    /// The emulated token metadata of `mint`, if it has been created.
    pub fn metadata_for(&self, mint: &Address) -> Option<MetadataState> {
        let (metadata, _) = find_metadata_address(&self.ids, mint);
        self.state.borrow().metadata.get(&metadata).cloned()
    }

    pub fn transaction_count(&self) -> u64 {
        self.transaction_count.get()
    }

    fn next_signature(&self) -> Signature {
        let count = self.transaction_count.get() + 1;
        self.transaction_count.set(count);
        let mut bytes = [0u8; 64];
        bytes[..8].copy_from_slice(&count.to_le_bytes());
        bytes[8..40].copy_from_slice(self.ids.presale.as_ref());
        Signature::from(bytes)
    }

    fn require_funded(&self, payer: &Address) -> Result<(), StepError> {
        match self.state.borrow().lamports.get(payer) {
            Some(lamports) if *lamports > 0 => Ok(()),
            _ => Err(StepError::Rejected {
                code: None,
                reason: TransactionError::AccountNotFound.to_string(),
                from_presale: false,
            }),
        }
    }

    /// Runs a setup operation against a copy of the state and commits it on success.
    fn apply_setup<T>(
        &self,
        payer: &Address,
        operation: impl FnOnce(&mut LedgerState) -> Result<T, StepError>,
    ) -> Result<T, StepError> {
        self.require_funded(payer)?;
        let mut working = self.state.borrow().clone();
        let value = operation(&mut working)?;
        *self.state.borrow_mut() = working;
        self.next_signature();
        Ok(value)
    }
}

impl Ledger for LocalLedger {
    async fn submit(
        &self,
        payer: &Keypair,
        signers: &[&Keypair],
        instructions: &[Instruction],
    ) -> Result<Signature, StepError> {
        let signed = std::iter::once(payer)
            .chain(signers.iter().copied())
            .map(|kp| kp.pubkey())
            .collect::<HashSet<_>>();
        if let Some(missing) = instructions
            .iter()
            .flat_map(|ix| ix.accounts.iter())
            .find(|meta| meta.is_signer && !signed.contains(&meta.pubkey))
        {
            return Err(StepError::Authorization(format!(
                "{}: {}",
                TransactionError::SignatureFailure,
                missing.pubkey
            )));
        }
        self.require_funded(&payer.pubkey())?;

        let mut working = self.state.borrow().clone();
        for (index, ix) in instructions.iter().enumerate() {
            program::process_instruction(&mut working, &self.ids, ix).map_err(|error| {
                classify_transaction_error(
                    TransactionError::InstructionError(index as u8, error),
                    instructions,
                    &self.ids.presale,
                )
            })?;
        }
        *self.state.borrow_mut() = working;

        Ok(self.next_signature())
    }

    async fn fetch_account_data(&self, address: &Address) -> Result<Option<Vec<u8>>, StepError> {
        let state = self.state.borrow();
        if let Some(data) = state.records.get(address) {
            return Ok(Some(data.clone()));
        }
        if let Some(account) = state.token_accounts.get(address) {
            let mut data = vec![0; Account::LEN];
            let packed = Account {
                mint: account.mint,
                owner: account.owner,
                amount: account.amount,
                state: AccountState::Initialized,
                ..Account::default()
            };
            Account::pack(packed, &mut data)
                .map_err(|e| StepError::Resolution(format!("token account {address}: {e}")))?;
            return Ok(Some(data));
        }
        if let Some(mint) = state.mints.get(address) {
            let mut data = vec![0; Mint::LEN];
            let packed = Mint {
                mint_authority: mint.authority.into(),
                supply: mint.supply,
                decimals: mint.decimals,
                is_initialized: true,
                ..Mint::default()
            };
            Mint::pack(packed, &mut data)
                .map_err(|e| StepError::Resolution(format!("mint {address}: {e}")))?;
            return Ok(Some(data));
        }
        if let Some(metadata) = state.metadata.get(address) {
            return borsh::to_vec(metadata)
                .map(Some)
                .map_err(|e| StepError::Resolution(format!("metadata {address}: {e}")));
        }
        if state.master_editions.contains(address) {
            return Ok(Some(vec![]));
        }
        Ok(None)
    }

    async fn token_balance(&self, token_account: &Address) -> Result<u64, StepError> {
        self.token_account(token_account)
            .map(|account| account.amount)
            .ok_or_else(|| StepError::Resolution(format!("token account {token_account}")))
    }

    async fn fund(&self, address: &Address) -> Result<(), StepError> {
        let mut state = self.state.borrow_mut();
        let lamports = state.lamports.entry(*address).or_default();
        *lamports = lamports.saturating_add(DEFAULT_FUND_AMOUNT);
        Ok(())
    }

    async fn create_mint(&self, authority: &Keypair, decimals: u8) -> Result<Address, StepError> {
        let mint = Keypair::new().pubkey();
        self.apply_setup(&authority.pubkey(), |state| {
            state
                .create_mint(mint, authority.pubkey(), decimals)
                .map_err(|e| StepError::Rejected {
                    code: None,
                    reason: format!("create mint: {e}"),
                    from_presale: false,
                })
        })?;
        Ok(mint)
    }

    async fn create_token_account(
        &self,
        payer: &Keypair,
        mint: &Address,
        owner: &Address,
    ) -> Result<Address, StepError> {
        let address = get_associated_token_address(owner, mint);
        self.apply_setup(&payer.pubkey(), |state| {
            state
                .create_token_account(address, *mint, *owner)
                .map_err(|e| StepError::Rejected {
                    code: None,
                    reason: format!("create token account: {e}"),
                    from_presale: false,
                })
        })?;
        Ok(address)
    }

    async fn mint_to(
        &self,
        authority: &Keypair,
        mint: &Address,
        destination: &Address,
        amount: u64,
    ) -> Result<(), StepError> {
        self.apply_setup(&authority.pubkey(), |state| {
            state
                .mint_to(mint, destination, &authority.pubkey(), amount)
                .map_err(|e| classify_instruction_error(e, false))
        })
    }
}
