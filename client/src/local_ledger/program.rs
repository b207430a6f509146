//! Emulation of the presale program's instruction handlers and account constraints.
//!
//! Account constraints are checked before handler logic, in declaration order, so a transaction
//! fails with the same error the deployed program reports first.

use presale_interface::{
    error::{
        AnchorFrameworkError,
        PoolError,
    },
    instructions::*,
    program::{
        ProgramIds,
        SYSTEM_PROGRAM_ID,
        TOKEN_PROGRAM_ID,
    },
    state::{
        AccountDecodeError,
        AccountRecord,
        Creator,
        MetadataExtended,
        Pool,
        SaleManager,
        SalePot,
        SaleState,
        WhitelistEntry,
    },
};
use solana_address::Address;
use solana_instruction::Instruction;
use solana_instruction_error::InstructionError;

use super::LedgerState;
use crate::pda::{
    find_metadata_extended_address,
    find_sale_manager_address,
    find_whitelist_address,
};

type ProcessResult = Result<(), InstructionError>;

/// `AccountAlreadyInUse` from the system program, which `init` surfaces unchanged.
const ACCOUNT_ALREADY_IN_USE: u32 = 0;

const BASIS_POINTS: u128 = 10_000;
const PERCENT: u128 = 100;

fn pool_error(error: PoolError) -> InstructionError {
    InstructionError::Custom(error.code())
}

fn framework_error(error: AnchorFrameworkError) -> InstructionError {
    InstructionError::Custom(error.code())
}

pub(super) fn process_instruction(
    state: &mut LedgerState,
    ids: &ProgramIds,
    ix: &Instruction,
) -> ProcessResult {
    if ix.program_id != ids.presale {
        return Err(InstructionError::IncorrectProgramId);
    }
    let instruction = PresaleInstruction::from_instruction_data(&ix.data)
        .ok_or(InstructionError::InvalidInstructionData)?;

    let mut processor = Processor { state, ids, ix };
    match instruction {
        PresaleInstruction::InitPool => processor.init_pool(),
        PresaleInstruction::SetAuthority => processor.set_authority(),
        PresaleInstruction::SetWhitelist => processor.set_whitelist(),
        PresaleInstruction::UpdateWhitelist => processor.update_whitelist(),
        PresaleInstruction::ControlPresaleLive => processor.control_presale_live(),
        PresaleInstruction::MintNft => processor.mint_nft(),
        PresaleInstruction::SetMaxPrice => processor.set_max_price(),
        PresaleInstruction::InitSaleManager => processor.init_sale_manager(),
        PresaleInstruction::SellNft => processor.sell_nft(),
        PresaleInstruction::BuyNft => processor.buy_nft(),
        PresaleInstruction::RedeemNft => processor.redeem_nft(),
        PresaleInstruction::WithdrawFund => processor.withdraw_fund(),
    }
}

struct Processor<'a> {
    state: &'a mut LedgerState,
    ids: &'a ProgramIds,
    ix: &'a Instruction,
}

impl Processor<'_> {
    fn args<T: InstructionData>(&self) -> Result<T, InstructionError> {
        T::unpack(&self.ix.data).map_err(|_| InstructionError::InvalidInstructionData)
    }

    fn require_signer(&self, address: &Address) -> ProcessResult {
        let signed = self
            .ix
            .accounts
            .iter()
            .any(|meta| meta.pubkey == *address && meta.is_signer);
        if !signed {
            return Err(framework_error(AnchorFrameworkError::ConstraintSigner));
        }
        Ok(())
    }

    fn require_address(&self, actual: &Address, expected: &Address) -> ProcessResult {
        if actual != expected {
            return Err(framework_error(AnchorFrameworkError::ConstraintAddress));
        }
        Ok(())
    }

    fn require_seeds(&self, actual: &Address, bump: u8, derived: (Address, u8)) -> ProcessResult {
        if (*actual, bump) != derived {
            return Err(framework_error(AnchorFrameworkError::ConstraintSeeds));
        }
        Ok(())
    }

    fn require_owner(&self, recorded: &Address, signer: &Address) -> ProcessResult {
        if recorded != signer {
            return Err(framework_error(AnchorFrameworkError::ConstraintHasOne));
        }
        Ok(())
    }

    /// Token accounts and mints must be owned by the token program.
    fn require_token_account(&self, address: &Address) -> ProcessResult {
        if !self.state.token_accounts.contains_key(address) {
            return Err(framework_error(AnchorFrameworkError::ConstraintOwner));
        }
        Ok(())
    }

    fn require_mint(&self, address: &Address) -> ProcessResult {
        if !self.state.mints.contains_key(address) {
            return Err(framework_error(AnchorFrameworkError::ConstraintOwner));
        }
        Ok(())
    }

    fn require_uninitialized(&self, address: &Address) -> ProcessResult {
        if self.state.is_allocated(address) {
            return Err(InstructionError::Custom(ACCOUNT_ALREADY_IN_USE));
        }
        Ok(())
    }

    fn load<T: AccountRecord>(&self, address: &Address) -> Result<T, InstructionError> {
        let data = self
            .state
            .records
            .get(address)
            .ok_or(framework_error(AnchorFrameworkError::AccountDiscriminatorNotFound))?;
        T::try_from_account_data(data).map_err(|e| match e {
            AccountDecodeError::TooShort { .. } => {
                framework_error(AnchorFrameworkError::AccountDiscriminatorNotFound)
            }
            AccountDecodeError::DiscriminatorMismatch { .. } => {
                framework_error(AnchorFrameworkError::AccountDiscriminatorMismatch)
            }
            AccountDecodeError::InvalidData(_) => InstructionError::InvalidAccountData,
        })
    }

    fn store<T: AccountRecord>(&mut self, address: Address, record: &T) {
        self.state.records.insert(address, record.to_account_data());
    }

    fn init_pool(&mut self) -> ProcessResult {
        let accounts = InitPool::try_from_account_metas(&self.ix.accounts)
            .ok_or(InstructionError::NotEnoughAccountKeys)?;
        let InitPoolInstructionData {} = self.args()?;
        self.require_signer(&accounts.pool)?;
        self.require_signer(&accounts.owner)?;
        self.require_uninitialized(&accounts.pool)?;
        self.require_address(&accounts.system_program, &SYSTEM_PROGRAM_ID)?;
        self.state.mint_state(&accounts.sale_mint)?;

        self.store(
            accounts.pool,
            &Pool {
                owner: accounts.owner,
                presale_live: false,
                sale_mint: accounts.sale_mint,
            },
        );
        Ok(())
    }

    fn set_authority(&mut self) -> ProcessResult {
        let accounts = SetAuthority::try_from_account_metas(&self.ix.accounts)
            .ok_or(InstructionError::NotEnoughAccountKeys)?;
        let SetAuthorityInstructionData {} = self.args()?;
        let mut pool: Pool = self.load(&accounts.pool)?;
        self.require_owner(&pool.owner, &accounts.owner)?;
        self.require_signer(&accounts.owner)?;

        pool.owner = accounts.new_owner;
        self.store(accounts.pool, &pool);
        Ok(())
    }

    fn set_whitelist(&mut self) -> ProcessResult {
        let accounts = SetWhitelist::try_from_account_metas(&self.ix.accounts)
            .ok_or(InstructionError::NotEnoughAccountKeys)?;
        let args: SetWhitelistInstructionData = self.args()?;
        self.require_seeds(
            &accounts.whitelist_entry,
            args.bump,
            find_whitelist_address(self.ids, &accounts.pool, &accounts.bidder),
        )?;
        self.require_uninitialized(&accounts.whitelist_entry)?;
        let pool: Pool = self.load(&accounts.pool)?;
        self.require_owner(&pool.owner, &accounts.owner)?;
        self.require_signer(&accounts.owner)?;
        self.require_address(&accounts.system_program, &SYSTEM_PROGRAM_ID)?;

        if pool.presale_live {
            return Err(pool_error(PoolError::PresaleLive));
        }
        self.store(
            accounts.whitelist_entry,
            &WhitelistEntry {
                owner: accounts.bidder,
                pool: accounts.pool,
                amount: args.amount,
                whitelisted: args.whitelisted,
                bump: args.bump,
            },
        );
        Ok(())
    }

    fn update_whitelist(&mut self) -> ProcessResult {
        let accounts = UpdateWhitelist::try_from_account_metas(&self.ix.accounts)
            .ok_or(InstructionError::NotEnoughAccountKeys)?;
        let args: UpdateWhitelistInstructionData = self.args()?;
        let mut entry: WhitelistEntry = self.load(&accounts.whitelist_entry)?;
        self.require_seeds(
            &accounts.whitelist_entry,
            entry.bump,
            find_whitelist_address(self.ids, &accounts.pool, &entry.owner),
        )?;
        let pool: Pool = self.load(&accounts.pool)?;
        self.require_owner(&pool.owner, &accounts.owner)?;
        self.require_signer(&accounts.owner)?;

        if pool.presale_live {
            return Err(pool_error(PoolError::PresaleLive));
        }
        entry.amount = args.amount;
        entry.whitelisted = args.whitelisted;
        self.store(accounts.whitelist_entry, &entry);
        Ok(())
    }

    fn control_presale_live(&mut self) -> ProcessResult {
        let accounts = ControlPresaleLive::try_from_account_metas(&self.ix.accounts)
            .ok_or(InstructionError::NotEnoughAccountKeys)?;
        let args: ControlPresaleLiveInstructionData = self.args()?;
        let mut pool: Pool = self.load(&accounts.pool)?;
        self.require_owner(&pool.owner, &accounts.owner)?;
        self.require_signer(&accounts.owner)?;

        pool.presale_live = args.presale_live;
        self.store(accounts.pool, &pool);
        Ok(())
    }

    fn mint_nft(&mut self) -> ProcessResult {
        let accounts = MintNft::try_from_account_metas(&self.ix.accounts)
            .ok_or(InstructionError::NotEnoughAccountKeys)?;
        let args: MintNftInstructionData = self.args()?;
        self.require_signer(&accounts.owner)?;
        let pool: Pool = self.load(&accounts.pool)?;
        let mut entry: WhitelistEntry = self.load(&accounts.whitelist_entry)?;
        self.require_owner(&entry.owner, &accounts.owner)?;
        self.require_seeds(
            &accounts.whitelist_entry,
            entry.bump,
            find_whitelist_address(self.ids, &accounts.pool, &accounts.owner),
        )?;
        self.require_mint(&accounts.mint)?;
        self.require_token_account(&accounts.token_account)?;
        self.require_seeds(
            &accounts.metadata_extended,
            args.bump,
            find_metadata_extended_address(self.ids, &accounts.mint, &accounts.pool),
        )?;
        self.require_uninitialized(&accounts.metadata_extended)?;
        self.require_address(&accounts.token_metadata_program, &self.ids.token_metadata)?;
        self.require_address(&accounts.token_program, &TOKEN_PROGRAM_ID)?;
        self.require_address(&accounts.system_program, &SYSTEM_PROGRAM_ID)?;

        // The program reports a closed presale here with the `PresaleLive` code.
        if !pool.presale_live {
            return Err(pool_error(PoolError::PresaleLive));
        }
        if entry.pool != accounts.pool {
            return Err(pool_error(PoolError::InvalidPoolAccount));
        }
        if !entry.whitelisted {
            return Err(pool_error(PoolError::NotWhitelisted));
        }
        if entry.amount == 0 {
            return Err(pool_error(PoolError::MintAmountIsZero));
        }
        let mint = self.state.mint_state(&accounts.mint)?;
        if mint.decimals != 0 || mint.supply != 0 {
            return Err(pool_error(PoolError::InvalidMintAccount));
        }
        if self.state.token_account(&accounts.token_account)?.mint != accounts.mint {
            return Err(pool_error(PoolError::InvalidTokenAccount));
        }

        self.state
            .mint_to(&accounts.mint, &accounts.token_account, &accounts.owner, 1)?;
        self.state.create_metadata(
            self.ids,
            &accounts.metadata,
            &accounts.mint,
            &accounts.owner,
            args.metadata,
        )?;
        self.state.create_master_edition(
            self.ids,
            &accounts.master_edition,
            &accounts.mint,
            &accounts.owner,
        )?;

        entry.amount -= 1;
        self.store(accounts.whitelist_entry, &entry);
        self.store(
            accounts.metadata_extended,
            &MetadataExtended {
                pool: accounts.pool,
                max_price: 0,
                bump: args.bump,
            },
        );
        Ok(())
    }

    fn set_max_price(&mut self) -> ProcessResult {
        let accounts = SetMaxPrice::try_from_account_metas(&self.ix.accounts)
            .ok_or(InstructionError::NotEnoughAccountKeys)?;
        let args: SetMaxPriceInstructionData = self.args()?;
        self.require_signer(&accounts.owner)?;
        let pool: Pool = self.load(&accounts.pool)?;
        self.require_owner(&pool.owner, &accounts.owner)?;
        self.require_mint(&accounts.mint)?;
        let mut extended: MetadataExtended = self.load(&accounts.metadata_extended)?;
        self.require_seeds(
            &accounts.metadata_extended,
            extended.bump,
            find_metadata_extended_address(self.ids, &accounts.mint, &accounts.pool),
        )?;

        if extended.pool != accounts.pool {
            return Err(pool_error(PoolError::InvalidPoolAccount));
        }
        extended.max_price = args.max_price;
        self.store(accounts.metadata_extended, &extended);
        Ok(())
    }

    fn init_sale_manager(&mut self) -> ProcessResult {
        let accounts = InitSaleManager::try_from_account_metas(&self.ix.accounts)
            .ok_or(InstructionError::NotEnoughAccountKeys)?;
        let args: InitSaleManagerInstructionData = self.args()?;
        self.require_signer(&accounts.owner)?;
        let _: Pool = self.load(&accounts.pool)?;
        self.require_mint(&accounts.nft_mint)?;
        self.require_seeds(
            &accounts.sale_manager,
            args.bump,
            find_sale_manager_address(self.ids, &accounts.pool, &accounts.nft_mint),
        )?;
        self.require_uninitialized(&accounts.sale_manager)?;
        self.require_address(&accounts.system_program, &SYSTEM_PROGRAM_ID)?;

        self.store(
            accounts.sale_manager,
            &SaleManager {
                pool: accounts.pool,
                seller: Address::default(),
                nft_mint: accounts.nft_mint,
                nft_pot: Address::default(),
                sale_pot: Address::default(),
                price: 0,
                sale_state: SaleState::Idle as u8,
                is_primary: false,
                bump: args.bump,
            },
        );
        Ok(())
    }

    fn sell_nft(&mut self) -> ProcessResult {
        let accounts = SellNft::try_from_account_metas(&self.ix.accounts)
            .ok_or(InstructionError::NotEnoughAccountKeys)?;
        let args: SellNftInstructionData = self.args()?;
        self.require_signer(&accounts.owner)?;
        let pool: Pool = self.load(&accounts.pool)?;
        self.require_mint(&accounts.nft_mint)?;
        let extended: MetadataExtended = self.load(&accounts.metadata_extended)?;
        self.require_seeds(
            &accounts.metadata_extended,
            extended.bump,
            find_metadata_extended_address(self.ids, &accounts.nft_mint, &accounts.pool),
        )?;
        let mut manager: SaleManager = self.load(&accounts.sale_manager)?;
        self.require_seeds(
            &accounts.sale_manager,
            manager.bump,
            find_sale_manager_address(self.ids, &accounts.pool, &accounts.nft_mint),
        )?;
        self.require_signer(&accounts.sale_pot)?;
        self.require_uninitialized(&accounts.sale_pot)?;
        self.require_token_account(&accounts.nft_seller_token)?;
        self.require_token_account(&accounts.nft_manager_token)?;
        self.require_token_account(&accounts.manager_pot)?;
        self.require_address(&accounts.token_metadata_program, &self.ids.token_metadata)?;
        self.require_address(&accounts.token_program, &TOKEN_PROGRAM_ID)?;
        self.require_address(&accounts.system_program, &SYSTEM_PROGRAM_ID)?;

        let manager_pot = self.state.token_account(&accounts.manager_pot)?;
        let nft_seller_token = self.state.token_account(&accounts.nft_seller_token)?;
        let nft_manager_token = self.state.token_account(&accounts.nft_manager_token)?;
        let metadata = self.state.metadata_state(&accounts.metadata)?;
        if nft_seller_token.owner != accounts.owner
            || nft_seller_token.mint != accounts.nft_mint
            || nft_manager_token.mint != accounts.nft_mint
        {
            return Err(pool_error(PoolError::InvalidTokenAccount));
        }
        if manager_pot.mint != pool.sale_mint {
            return Err(pool_error(PoolError::InvalidMintAccount));
        }
        if manager_pot.owner != accounts.sale_manager {
            return Err(pool_error(PoolError::InvalidTokenAccount));
        }
        if extended.max_price != 0 && extended.max_price < args.price {
            return Err(pool_error(PoolError::InvalidPrice));
        }
        if extended.pool != accounts.pool {
            return Err(pool_error(PoolError::InvalidPoolAccount));
        }

        manager.sale_pot = accounts.sale_pot;
        manager.seller = accounts.owner;
        manager.price = args.price;
        manager.sale_state = SaleState::Listed as u8;
        manager.nft_pot = accounts.nft_manager_token;

        let is_primary = !metadata.primary_sale_happened;
        let sale_pot = SalePot {
            is_used: false,
            sale_manager: accounts.sale_manager,
            pool_pot: accounts.manager_pot,
            price: args.price,
            is_primary,
            seller: accounts.owner,
            seller_verified: is_primary,
            seller_fee_basis_points: metadata.data.seller_fee_basis_points,
            creators: metadata
                .data
                .creators
                .iter()
                .map(|creator| Creator {
                    address: creator.address,
                    verified: false,
                    share: creator.share,
                })
                .collect(),
        };

        self.state.transfer(
            &accounts.nft_seller_token,
            &accounts.nft_manager_token,
            &accounts.owner,
            1,
        )?;
        self.state.set_update_authority(
            &accounts.metadata,
            &accounts.owner,
            &accounts.sale_manager,
        )?;

        self.store(accounts.sale_manager, &manager);
        self.store(accounts.sale_pot, &sale_pot);
        Ok(())
    }

    fn buy_nft(&mut self) -> ProcessResult {
        let accounts = BuyNft::try_from_account_metas(&self.ix.accounts)
            .ok_or(InstructionError::NotEnoughAccountKeys)?;
        let BuyNftInstructionData {} = self.args()?;
        self.require_signer(&accounts.owner)?;
        let pool: Pool = self.load(&accounts.pool)?;
        self.require_mint(&accounts.nft_mint)?;
        let mut manager: SaleManager = self.load(&accounts.sale_manager)?;
        self.require_seeds(
            &accounts.sale_manager,
            manager.bump,
            find_sale_manager_address(self.ids, &accounts.pool, &accounts.nft_mint),
        )?;
        let mut sale_pot: SalePot = self.load(&accounts.sale_pot)?;
        self.require_token_account(&accounts.nft_manager_token)?;
        self.require_token_account(&accounts.nft_bidder_token)?;
        self.require_token_account(&accounts.manager_pot)?;
        self.require_token_account(&accounts.bidder_token)?;
        self.require_address(&accounts.token_metadata_program, &self.ids.token_metadata)?;
        self.require_address(&accounts.token_program, &TOKEN_PROGRAM_ID)?;

        let nft_manager_token = self.state.token_account(&accounts.nft_manager_token)?;
        let nft_bidder_token = self.state.token_account(&accounts.nft_bidder_token)?;
        let manager_pot = self.state.token_account(&accounts.manager_pot)?;
        let bidder_token = self.state.token_account(&accounts.bidder_token)?;
        self.state.metadata_state(&accounts.metadata)?;
        if nft_manager_token.mint != accounts.nft_mint
            || nft_bidder_token.mint != accounts.nft_mint
            || manager_pot.mint != pool.sale_mint
            || bidder_token.mint != pool.sale_mint
            || bidder_token.owner != accounts.owner
        {
            return Err(pool_error(PoolError::InvalidTokenAccount));
        }
        if bidder_token.amount < manager.price {
            return Err(pool_error(PoolError::NotEnoughTokenAmount));
        }
        if manager.sale_state != SaleState::Listed as u8 {
            return Err(pool_error(PoolError::InvalidSaleState));
        }
        if sale_pot.pool_pot != accounts.manager_pot {
            return Err(pool_error(PoolError::InvalidTokenAccount));
        }
        if manager.nft_mint != accounts.nft_mint {
            return Err(pool_error(PoolError::InvalidMintAccount));
        }
        if manager.seller == accounts.owner {
            return Err(pool_error(PoolError::InvalidBidder));
        }

        self.state.transfer(
            &accounts.bidder_token,
            &accounts.manager_pot,
            &accounts.owner,
            manager.price,
        )?;
        self.state.mark_primary_sale(
            &accounts.metadata,
            &accounts.sale_manager,
            &accounts.nft_manager_token,
        )?;
        self.state.transfer(
            &accounts.nft_manager_token,
            &accounts.nft_bidder_token,
            &accounts.sale_manager,
            1,
        )?;
        self.state.set_update_authority(
            &accounts.metadata,
            &accounts.sale_manager,
            &accounts.owner,
        )?;

        manager.sale_state = SaleState::Sold as u8;
        sale_pot.is_used = true;
        self.store(accounts.sale_manager, &manager);
        self.store(accounts.sale_pot, &sale_pot);
        Ok(())
    }

    fn redeem_nft(&mut self) -> ProcessResult {
        let accounts = RedeemNft::try_from_account_metas(&self.ix.accounts)
            .ok_or(InstructionError::NotEnoughAccountKeys)?;
        let RedeemNftInstructionData {} = self.args()?;
        self.require_signer(&accounts.owner)?;
        let _: Pool = self.load(&accounts.pool)?;
        self.require_mint(&accounts.nft_mint)?;
        let mut manager: SaleManager = self.load(&accounts.sale_manager)?;
        self.require_seeds(
            &accounts.sale_manager,
            manager.bump,
            find_sale_manager_address(self.ids, &accounts.pool, &accounts.nft_mint),
        )?;
        self.require_token_account(&accounts.nft_seller_token)?;
        self.require_token_account(&accounts.nft_manager_token)?;
        self.require_address(&accounts.token_metadata_program, &self.ids.token_metadata)?;
        self.require_address(&accounts.token_program, &TOKEN_PROGRAM_ID)?;

        let nft_manager_token = self.state.token_account(&accounts.nft_manager_token)?;
        let nft_seller_token = self.state.token_account(&accounts.nft_seller_token)?;
        self.state.metadata_state(&accounts.metadata)?;
        if manager.sale_state != SaleState::Listed as u8 {
            return Err(pool_error(PoolError::InvalidSaleState));
        }
        if manager.nft_mint != accounts.nft_mint {
            return Err(pool_error(PoolError::InvalidMintAccount));
        }
        if nft_manager_token.mint != accounts.nft_mint || nft_seller_token.mint != accounts.nft_mint
        {
            return Err(pool_error(PoolError::InvalidTokenAccount));
        }
        if manager.seller != accounts.owner {
            return Err(pool_error(PoolError::InvalidSeller));
        }

        self.state.transfer(
            &accounts.nft_manager_token,
            &accounts.nft_seller_token,
            &accounts.sale_manager,
            1,
        )?;
        self.state.set_update_authority(
            &accounts.metadata,
            &accounts.sale_manager,
            &accounts.owner,
        )?;

        manager.sale_state = SaleState::Idle as u8;
        self.store(accounts.sale_manager, &manager);
        Ok(())
    }

    fn withdraw_fund(&mut self) -> ProcessResult {
        let accounts = WithdrawFund::try_from_account_metas(&self.ix.accounts)
            .ok_or(InstructionError::NotEnoughAccountKeys)?;
        let WithdrawFundInstructionData {} = self.args()?;
        self.require_signer(&accounts.owner)?;
        let _: SaleManager = self.load(&accounts.sale_manager)?;
        let mut sale_pot: SalePot = self.load(&accounts.sale_pot)?;
        self.require_token_account(&accounts.pool_pot)?;
        self.require_token_account(&accounts.withdraw_pot)?;
        self.require_address(&accounts.token_program, &TOKEN_PROGRAM_ID)?;

        let pool_pot = self.state.token_account(&accounts.pool_pot)?;
        let amount = settle(&mut sale_pot, &accounts.owner);
        if amount == 0 {
            return Err(pool_error(PoolError::InvalidAmount));
        }

        self.state.transfer(
            &accounts.pool_pot,
            &accounts.withdraw_pot,
            &accounts.sale_manager,
            amount.min(pool_pot.amount),
        )?;
        self.store(accounts.sale_pot, &sale_pot);
        Ok(())
    }
}

/// Computes what `payee` is owed from a sale and marks them as paid.
///
/// A primary sale pays creators their share of the whole price. A secondary sale pays the seller
/// the price minus royalties, and creators their share of the royalties.
/// Each payout is computed exactly in `u128` and truncated toward zero. Above 2^53 lamports this
/// can be one lamport off from a floating point rendition of the same formula.
fn settle(sale_pot: &mut SalePot, payee: &Address) -> u64 {
    let price = sale_pot.price as u128;
    let fee = sale_pot.seller_fee_basis_points as u128;
    let mut amount: u128 = 0;

    if !sale_pot.is_primary && !sale_pot.seller_verified && sale_pot.seller == *payee {
        amount += price * BASIS_POINTS.saturating_sub(fee) / BASIS_POINTS;
        sale_pot.seller_verified = true;
    }

    let mut share: u128 = 0;
    for creator in sale_pot.creators.iter_mut() {
        if !creator.verified && creator.address == *payee {
            creator.verified = true;
            share = creator.share as u128;
        }
    }
    amount += match sale_pot.is_primary {
        true => price * share / PERCENT,
        false => price * fee * share / (BASIS_POINTS * PERCENT),
    };

    u64::try_from(amount).unwrap_or(u64::MAX)
}
