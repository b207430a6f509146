//! Pool-level context for building presale program instructions from contextual address data.

use presale_interface::{
    instructions::*,
    program::{
        ProgramIds,
        RENT_SYSVAR_ID,
        SYSTEM_PROGRAM_ID,
        TOKEN_PROGRAM_ID,
    },
    state::NftMetadata,
};
use solana_address::Address;
use solana_instruction::Instruction;

use crate::pda::{
    find_master_edition_address,
    find_metadata_address,
    find_metadata_extended_address,
    find_sale_manager_address,
    find_whitelist_address,
};

/// A struct containing the program ids and pool address that every presale instruction shares.
///
/// Implements helper methods for building all program instructions using those values. Every
/// PDA an instruction needs is derived here, right before the instruction is built.
#[derive(Clone, Copy, Debug)]
pub struct PoolContext {
    pub ids: ProgramIds,
    pub pool: Address,
}

/// The token accounts involved in listing or redeeming an NFT.
#[derive(Clone, Copy, Debug)]
pub struct ListingAccounts {
    /// The seller's token account holding the NFT.
    pub nft_seller_token: Address,
    /// The sale manager's token account that escrows the NFT.
    pub nft_manager_token: Address,
    /// The sale manager's sale mint token account that collects payment.
    pub manager_pot: Address,
}

/// The accounts involved in buying an NFT. The escrow accounts must come from the on-chain sale
/// records, not from derivation.
#[derive(Clone, Copy, Debug)]
pub struct PurchaseAccounts {
    pub sale_pot: Address,
    pub nft_manager_token: Address,
    pub manager_pot: Address,
    pub nft_bidder_token: Address,
    pub bidder_token: Address,
}

impl PoolContext {
    pub fn new(ids: ProgramIds, pool: Address) -> Self {
        Self { ids, pool }
    }

    pub fn whitelist_address(&self, bidder: &Address) -> Address {
        find_whitelist_address(&self.ids, &self.pool, bidder).0
    }

    pub fn sale_manager_address(&self, nft_mint: &Address) -> Address {
        find_sale_manager_address(&self.ids, &self.pool, nft_mint).0
    }

    pub fn metadata_extended_address(&self, mint: &Address) -> Address {
        find_metadata_extended_address(&self.ids, mint, &self.pool).0
    }

    pub fn init_pool(&self, owner: Address, sale_mint: Address) -> Instruction {
        InitPool {
            pool: self.pool,
            owner,
            sale_mint,
            system_program: SYSTEM_PROGRAM_ID,
        }
        .create_instruction(self.ids.presale, InitPoolInstructionData {})
    }

    pub fn set_authority(&self, owner: Address, new_owner: Address) -> Instruction {
        SetAuthority {
            pool: self.pool,
            owner,
            new_owner,
        }
        .create_instruction(self.ids.presale, SetAuthorityInstructionData {})
    }

    /// Creates the bidder's whitelist entry. Only valid while no entry exists for the bidder.
    pub fn set_whitelist(
        &self,
        owner: Address,
        bidder: Address,
        amount: u64,
        whitelisted: bool,
    ) -> Instruction {
        let (whitelist_entry, bump) = find_whitelist_address(&self.ids, &self.pool, &bidder);
        SetWhitelist {
            whitelist_entry,
            pool: self.pool,
            owner,
            bidder,
            system_program: SYSTEM_PROGRAM_ID,
        }
        .create_instruction(
            self.ids.presale,
            SetWhitelistInstructionData {
                bump,
                amount,
                whitelisted,
            },
        )
    }

    pub fn update_whitelist(
        &self,
        owner: Address,
        bidder: Address,
        amount: u64,
        whitelisted: bool,
    ) -> Instruction {
        UpdateWhitelist {
            whitelist_entry: self.whitelist_address(&bidder),
            pool: self.pool,
            owner,
        }
        .create_instruction(
            self.ids.presale,
            UpdateWhitelistInstructionData {
                amount,
                whitelisted,
            },
        )
    }

    pub fn control_presale_live(&self, owner: Address, presale_live: bool) -> Instruction {
        ControlPresaleLive {
            pool: self.pool,
            owner,
        }
        .create_instruction(
            self.ids.presale,
            ControlPresaleLiveInstructionData { presale_live },
        )
    }

    /// Mints an NFT to `token_account`. The owner mints against their own whitelist entry.
    pub fn mint_nft(
        &self,
        owner: Address,
        mint: Address,
        token_account: Address,
        metadata: NftMetadata,
    ) -> Instruction {
        let (metadata_extended, bump) =
            find_metadata_extended_address(&self.ids, &mint, &self.pool);
        MintNft {
            owner,
            pool: self.pool,
            whitelist_entry: self.whitelist_address(&owner),
            mint,
            token_account,
            metadata: find_metadata_address(&self.ids, &mint).0,
            master_edition: find_master_edition_address(&self.ids, &mint).0,
            metadata_extended,
            token_metadata_program: self.ids.token_metadata,
            token_program: TOKEN_PROGRAM_ID,
            system_program: SYSTEM_PROGRAM_ID,
            rent: RENT_SYSVAR_ID,
        }
        .create_instruction(self.ids.presale, MintNftInstructionData { bump, metadata })
    }

    pub fn set_max_price(&self, owner: Address, mint: Address, max_price: u64) -> Instruction {
        SetMaxPrice {
            owner,
            pool: self.pool,
            mint,
            metadata_extended: self.metadata_extended_address(&mint),
        }
        .create_instruction(self.ids.presale, SetMaxPriceInstructionData { max_price })
    }

    pub fn init_sale_manager(&self, owner: Address, nft_mint: Address) -> Instruction {
        let (sale_manager, bump) = find_sale_manager_address(&self.ids, &self.pool, &nft_mint);
        InitSaleManager {
            owner,
            pool: self.pool,
            nft_mint,
            sale_manager,
            system_program: SYSTEM_PROGRAM_ID,
        }
        .create_instruction(self.ids.presale, InitSaleManagerInstructionData { bump })
    }

    pub fn sell_nft(
        &self,
        owner: Address,
        nft_mint: Address,
        sale_pot: Address,
        accounts: ListingAccounts,
        price: u64,
    ) -> Instruction {
        SellNft {
            owner,
            pool: self.pool,
            nft_mint,
            metadata: find_metadata_address(&self.ids, &nft_mint).0,
            metadata_extended: self.metadata_extended_address(&nft_mint),
            sale_manager: self.sale_manager_address(&nft_mint),
            sale_pot,
            nft_seller_token: accounts.nft_seller_token,
            nft_manager_token: accounts.nft_manager_token,
            manager_pot: accounts.manager_pot,
            token_metadata_program: self.ids.token_metadata,
            token_program: TOKEN_PROGRAM_ID,
            system_program: SYSTEM_PROGRAM_ID,
        }
        .create_instruction(self.ids.presale, SellNftInstructionData { price })
    }

    pub fn buy_nft(
        &self,
        bidder: Address,
        nft_mint: Address,
        accounts: PurchaseAccounts,
    ) -> Instruction {
        BuyNft {
            owner: bidder,
            pool: self.pool,
            nft_mint,
            metadata: find_metadata_address(&self.ids, &nft_mint).0,
            sale_manager: self.sale_manager_address(&nft_mint),
            sale_pot: accounts.sale_pot,
            nft_manager_token: accounts.nft_manager_token,
            nft_bidder_token: accounts.nft_bidder_token,
            manager_pot: accounts.manager_pot,
            bidder_token: accounts.bidder_token,
            token_metadata_program: self.ids.token_metadata,
            token_program: TOKEN_PROGRAM_ID,
        }
        .create_instruction(self.ids.presale, BuyNftInstructionData {})
    }

    pub fn redeem_nft(
        &self,
        owner: Address,
        nft_mint: Address,
        nft_seller_token: Address,
        nft_manager_token: Address,
    ) -> Instruction {
        RedeemNft {
            owner,
            pool: self.pool,
            nft_mint,
            metadata: find_metadata_address(&self.ids, &nft_mint).0,
            sale_manager: self.sale_manager_address(&nft_mint),
            nft_seller_token,
            nft_manager_token,
            token_metadata_program: self.ids.token_metadata,
            token_program: TOKEN_PROGRAM_ID,
        }
        .create_instruction(self.ids.presale, RedeemNftInstructionData {})
    }
}

/// Withdrawals are keyed by the sale manager alone, so they don't need a pool context.
pub fn withdraw_fund_instruction(
    ids: &ProgramIds,
    owner: Address,
    sale_manager: Address,
    sale_pot: Address,
    pool_pot: Address,
    withdraw_pot: Address,
) -> Instruction {
    WithdrawFund {
        owner,
        sale_manager,
        sale_pot,
        pool_pot,
        withdraw_pot,
        token_program: TOKEN_PROGRAM_ID,
    }
    .create_instruction(ids.presale, WithdrawFundInstructionData {})
}

#[cfg(test)]
mod tests {
    use presale_interface::instructions::PresaleInstruction;

    use super::*;

    fn address(byte: u8) -> Address {
        Address::new_from_array([byte; 32])
    }

    #[test]
    fn set_whitelist_passes_the_derived_bump() {
        let ctx = PoolContext::new(ProgramIds::default(), address(1));
        let bidder = address(2);
        let ix = ctx.set_whitelist(address(3), bidder, 10, true);

        let (entry, bump) = find_whitelist_address(&ctx.ids, &ctx.pool, &bidder);
        let accounts = SetWhitelist::try_from_account_metas(&ix.accounts).unwrap();
        assert_eq!(accounts.whitelist_entry, entry);
        let data = SetWhitelistInstructionData::unpack(&ix.data).unwrap();
        assert_eq!(data.bump, bump);
        assert_eq!(ix.program_id, ctx.ids.presale);
    }

    #[test]
    fn mint_nft_uses_the_owners_whitelist_entry() {
        let ctx = PoolContext::new(ProgramIds::default(), address(1));
        let (owner, mint) = (address(2), address(3));
        let ix = ctx.mint_nft(owner, mint, address(4), NftMetadata::default());

        let accounts = MintNft::try_from_account_metas(&ix.accounts).unwrap();
        assert_eq!(accounts.whitelist_entry, ctx.whitelist_address(&owner));
        assert_eq!(accounts.metadata, find_metadata_address(&ctx.ids, &mint).0);
        assert_eq!(accounts.metadata_extended, ctx.metadata_extended_address(&mint));
        assert_eq!(accounts.token_metadata_program, ctx.ids.token_metadata);
        assert_eq!(
            PresaleInstruction::from_instruction_data(&ix.data),
            Some(PresaleInstruction::MintNft)
        );
    }

    #[test]
    fn sell_and_buy_share_the_sale_manager() {
        let ctx = PoolContext::new(ProgramIds::default(), address(1));
        let mint = address(2);
        let sell = ctx.sell_nft(
            address(3),
            mint,
            address(4),
            ListingAccounts {
                nft_seller_token: address(5),
                nft_manager_token: address(6),
                manager_pot: address(7),
            },
            100,
        );
        let buy = ctx.buy_nft(
            address(8),
            mint,
            PurchaseAccounts {
                sale_pot: address(4),
                nft_manager_token: address(6),
                manager_pot: address(7),
                nft_bidder_token: address(9),
                bidder_token: address(10),
            },
        );
        let sell = SellNft::try_from_account_metas(&sell.accounts).unwrap();
        let buy = BuyNft::try_from_account_metas(&buy.accounts).unwrap();
        assert_eq!(sell.sale_manager, buy.sale_manager);
        assert_eq!(sell.sale_manager, ctx.sale_manager_address(&mint));
    }
}
