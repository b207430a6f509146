//! SPL token and token metadata behavior the presale program relies on through CPI.

use presale_interface::{
    program::ProgramIds,
    state::NftMetadata,
};
use solana_address::Address;
use solana_instruction_error::InstructionError;

use super::{
    LedgerState,
    MetadataState,
    MintState,
    TokenAccountState,
};
use crate::pda::{
    find_master_edition_address,
    find_metadata_address,
};

/// `spl_token::error::TokenError` codes.
pub(super) mod token_error {
    pub const INSUFFICIENT_FUNDS: u32 = 1;
    pub const MINT_MISMATCH: u32 = 3;
    pub const OWNER_MISMATCH: u32 = 4;
    pub const FIXED_SUPPLY: u32 = 5;
    pub const OVERFLOW: u32 = 14;
}

/// The token metadata program's `UpdateAuthorityIncorrect`.
pub(super) const UPDATE_AUTHORITY_INCORRECT: u32 = 7;

impl LedgerState {
    pub(super) fn create_mint(
        &mut self,
        address: Address,
        authority: Address,
        decimals: u8,
    ) -> Result<(), InstructionError> {
        if self.is_allocated(&address) {
            return Err(InstructionError::AccountAlreadyInitialized);
        }
        self.mints.insert(
            address,
            MintState {
                authority: Some(authority),
                decimals,
                supply: 0,
            },
        );
        Ok(())
    }

    /// Creating an account that already exists for the same mint and owner is a no-op.
    pub(super) fn create_token_account(
        &mut self,
        address: Address,
        mint: Address,
        owner: Address,
    ) -> Result<(), InstructionError> {
        if !self.mints.contains_key(&mint) {
            return Err(InstructionError::InvalidAccountData);
        }
        match self.token_accounts.get(&address) {
            Some(existing) if existing.mint == mint && existing.owner == owner => Ok(()),
            Some(_) => Err(InstructionError::AccountAlreadyInitialized),
            None => {
                self.token_accounts.insert(
                    address,
                    TokenAccountState {
                        mint,
                        owner,
                        amount: 0,
                    },
                );
                Ok(())
            }
        }
    }

    pub(super) fn token_account(
        &self,
        address: &Address,
    ) -> Result<TokenAccountState, InstructionError> {
        self.token_accounts
            .get(address)
            .copied()
            .ok_or(InstructionError::UninitializedAccount)
    }

    pub(super) fn mint_state(&self, address: &Address) -> Result<MintState, InstructionError> {
        self.mints
            .get(address)
            .copied()
            .ok_or(InstructionError::UninitializedAccount)
    }

    pub(super) fn mint_to(
        &mut self,
        mint: &Address,
        destination: &Address,
        authority: &Address,
        amount: u64,
    ) -> Result<(), InstructionError> {
        let mut mint_state = self.mint_state(mint)?;
        let mut account = self.token_account(destination)?;
        if account.mint != *mint {
            return Err(InstructionError::Custom(token_error::MINT_MISMATCH));
        }
        match mint_state.authority {
            None => return Err(InstructionError::Custom(token_error::FIXED_SUPPLY)),
            Some(expected) if expected != *authority => {
                return Err(InstructionError::Custom(token_error::OWNER_MISMATCH))
            }
            Some(_) => (),
        }
        mint_state.supply = mint_state
            .supply
            .checked_add(amount)
            .ok_or(InstructionError::Custom(token_error::OVERFLOW))?;
        account.amount = account
            .amount
            .checked_add(amount)
            .ok_or(InstructionError::Custom(token_error::OVERFLOW))?;

        self.mints.insert(*mint, mint_state);
        self.token_accounts.insert(*destination, account);
        Ok(())
    }

    pub(super) fn transfer(
        &mut self,
        source: &Address,
        destination: &Address,
        authority: &Address,
        amount: u64,
    ) -> Result<(), InstructionError> {
        let mut from = self.token_account(source)?;
        let mut to = self.token_account(destination)?;
        if from.mint != to.mint {
            return Err(InstructionError::Custom(token_error::MINT_MISMATCH));
        }
        if from.owner != *authority {
            return Err(InstructionError::Custom(token_error::OWNER_MISMATCH));
        }
        if from.amount < amount {
            return Err(InstructionError::Custom(token_error::INSUFFICIENT_FUNDS));
        }
        if source == destination {
            return Ok(());
        }
        from.amount -= amount;
        to.amount = to
            .amount
            .checked_add(amount)
            .ok_or(InstructionError::Custom(token_error::OVERFLOW))?;

        self.token_accounts.insert(*source, from);
        self.token_accounts.insert(*destination, to);
        Ok(())
    }

    /// Creates the metadata account of `mint`. The mint authority signs as the update authority.
    pub(super) fn create_metadata(
        &mut self,
        ids: &ProgramIds,
        metadata: &Address,
        mint: &Address,
        mint_authority: &Address,
        data: NftMetadata,
    ) -> Result<(), InstructionError> {
        if find_metadata_address(ids, mint).0 != *metadata {
            return Err(InstructionError::InvalidSeeds);
        }
        if self.is_allocated(metadata) {
            return Err(InstructionError::AccountAlreadyInitialized);
        }
        if self.mint_state(mint)?.authority != Some(*mint_authority) {
            return Err(InstructionError::IncorrectAuthority);
        }
        self.metadata.insert(
            *metadata,
            MetadataState {
                mint: *mint,
                update_authority: *mint_authority,
                data,
                primary_sale_happened: false,
            },
        );
        Ok(())
    }

    /// Creates the master edition of a single-supply mint and hands the mint authority to it.
    pub(super) fn create_master_edition(
        &mut self,
        ids: &ProgramIds,
        edition: &Address,
        mint: &Address,
        update_authority: &Address,
    ) -> Result<(), InstructionError> {
        if find_master_edition_address(ids, mint).0 != *edition {
            return Err(InstructionError::InvalidSeeds);
        }
        if self.is_allocated(edition) {
            return Err(InstructionError::AccountAlreadyInitialized);
        }
        let metadata = self.metadata_state(&find_metadata_address(ids, mint).0)?;
        if metadata.update_authority != *update_authority {
            return Err(InstructionError::Custom(UPDATE_AUTHORITY_INCORRECT));
        }
        let mut mint_state = self.mint_state(mint)?;
        if mint_state.supply != 1 {
            return Err(InstructionError::InvalidAccountData);
        }
        mint_state.authority = None;

        self.mints.insert(*mint, mint_state);
        self.master_editions.insert(*edition);
        Ok(())
    }

    pub(super) fn metadata_state(
        &self,
        metadata: &Address,
    ) -> Result<MetadataState, InstructionError> {
        self.metadata
            .get(metadata)
            .cloned()
            .ok_or(InstructionError::UninitializedAccount)
    }

    pub(super) fn set_update_authority(
        &mut self,
        metadata: &Address,
        current: &Address,
        new: &Address,
    ) -> Result<(), InstructionError> {
        let mut state = self.metadata_state(metadata)?;
        if state.update_authority != *current {
            return Err(InstructionError::Custom(UPDATE_AUTHORITY_INCORRECT));
        }
        state.update_authority = *new;
        self.metadata.insert(*metadata, state);
        Ok(())
    }

    /// Flags the primary sale as done. `owner` must hold the NFT in `token_account`.
    pub(super) fn mark_primary_sale(
        &mut self,
        metadata: &Address,
        owner: &Address,
        token_account: &Address,
    ) -> Result<(), InstructionError> {
        let mut state = self.metadata_state(metadata)?;
        let holder = self.token_account(token_account)?;
        if holder.mint != state.mint || holder.owner != *owner || holder.amount != 1 {
            return Err(InstructionError::InvalidAccountData);
        }
        state.primary_sale_happened = true;
        self.metadata.insert(*metadata, state);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(byte: u8) -> Address {
        Address::new_from_array([byte; 32])
    }

    fn state_with_accounts() -> LedgerState {
        let mut state = LedgerState::default();
        state.create_mint(address(1), address(9), 0).unwrap();
        state.create_token_account(address(2), address(1), address(3)).unwrap();
        state.create_token_account(address(4), address(1), address(5)).unwrap();
        state
    }

    #[test]
    fn transfer_checks_owner_and_balance() {
        let mut state = state_with_accounts();
        state.mint_to(&address(1), &address(2), &address(9), 3).unwrap();

        assert_eq!(
            state.transfer(&address(2), &address(4), &address(5), 1),
            Err(InstructionError::Custom(token_error::OWNER_MISMATCH))
        );
        assert_eq!(
            state.transfer(&address(2), &address(4), &address(3), 4),
            Err(InstructionError::Custom(token_error::INSUFFICIENT_FUNDS))
        );
        state.transfer(&address(2), &address(4), &address(3), 2).unwrap();
        assert_eq!(state.token_accounts[&address(2)].amount, 1);
        assert_eq!(state.token_accounts[&address(4)].amount, 2);
    }

    #[test]
    fn mint_to_requires_the_mint_authority() {
        let mut state = state_with_accounts();
        assert_eq!(
            state.mint_to(&address(1), &address(2), &address(3), 1),
            Err(InstructionError::Custom(token_error::OWNER_MISMATCH))
        );
        assert_eq!(state.mints[&address(1)].supply, 0);
    }

    #[test]
    fn master_edition_freezes_supply() {
        let ids = ProgramIds::default();
        let mut state = state_with_accounts();
        let mint = address(1);
        let metadata = find_metadata_address(&ids, &mint).0;
        let edition = find_master_edition_address(&ids, &mint).0;

        state.mint_to(&mint, &address(2), &address(9), 1).unwrap();
        state
            .create_metadata(&ids, &metadata, &mint, &address(9), NftMetadata::default())
            .unwrap();
        state
            .create_master_edition(&ids, &edition, &mint, &address(9))
            .unwrap();

        assert_eq!(state.mints[&mint].authority, None);
        assert_eq!(
            state.mint_to(&mint, &address(2), &address(9), 1),
            Err(InstructionError::Custom(token_error::FIXED_SUPPLY))
        );
    }
}
