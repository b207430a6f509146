//! Ordered account lists for every presale instruction.

use crate::instructions::data::*;

#[rustfmt::skip]
instruction_accounts! {
    /// Creates a pool. The pool address is a fresh keypair that co-signs.
    InitPool => InitPoolInstructionData {
        pool:                   writable + signer,
        owner:                  writable + signer,
        sale_mint:              readonly,
        system_program:         readonly,
    }

    /// Transfers pool ownership.
    SetAuthority => SetAuthorityInstructionData {
        pool:                   writable,
        owner:                  writable + signer,
        new_owner:              writable,
    }

    /// Creates a bidder's whitelist entry. Fails if the entry already exists.
    SetWhitelist => SetWhitelistInstructionData {
        whitelist_entry:        writable,
        pool:                   readonly,
        owner:                  writable + signer,
        bidder:                 readonly,
        system_program:         readonly,
    }

    /// Updates an existing whitelist entry.
    UpdateWhitelist => UpdateWhitelistInstructionData {
        whitelist_entry:        writable,
        pool:                   readonly,
        owner:                  writable + signer,
    }

    ControlPresaleLive => ControlPresaleLiveInstructionData {
        pool:                   writable,
        owner:                  writable + signer,
    }

    /// Mints a single NFT during the presale and creates its metadata, master edition and
    /// metadata extended accounts.
    MintNft => MintNftInstructionData {
        owner:                  writable + signer,
        pool:                   readonly,
        whitelist_entry:        writable,
        mint:                   writable,
        token_account:          writable,
        metadata:               writable,
        master_edition:         writable,
        metadata_extended:      writable,
        token_metadata_program: readonly,
        token_program:          readonly,
        system_program:         readonly,
        rent:                   readonly,
    }

    SetMaxPrice => SetMaxPriceInstructionData {
        owner:                  writable + signer,
        pool:                   readonly,
        mint:                   readonly,
        metadata_extended:      writable,
    }

    InitSaleManager => InitSaleManagerInstructionData {
        owner:                  writable + signer,
        pool:                   readonly,
        nft_mint:               readonly,
        sale_manager:           writable,
        system_program:         readonly,
    }

    /// Lists an NFT. The sale pot is a fresh keypair generated by the seller that co-signs.
    SellNft => SellNftInstructionData {
        owner:                  writable + signer,
        pool:                   readonly,
        nft_mint:               readonly,
        metadata:               writable,
        metadata_extended:      writable,
        sale_manager:           writable,
        sale_pot:               writable + signer,
        nft_seller_token:       writable,
        nft_manager_token:      writable,
        manager_pot:            writable,
        token_metadata_program: readonly,
        token_program:          readonly,
        system_program:         readonly,
    }

    BuyNft => BuyNftInstructionData {
        owner:                  writable + signer,
        pool:                   readonly,
        nft_mint:               readonly,
        metadata:               writable,
        sale_manager:           writable,
        sale_pot:               writable,
        nft_manager_token:      writable,
        nft_bidder_token:       writable,
        manager_pot:            writable,
        bidder_token:           writable,
        token_metadata_program: readonly,
        token_program:          readonly,
    }

    /// Cancels a listing and returns the NFT to the seller.
    RedeemNft => RedeemNftInstructionData {
        owner:                  writable + signer,
        pool:                   readonly,
        nft_mint:               readonly,
        metadata:               writable,
        sale_manager:           writable,
        nft_seller_token:       writable,
        nft_manager_token:      writable,
        token_metadata_program: readonly,
        token_program:          readonly,
    }

    /// Pays the signer's share of a sale's proceeds out of the manager pot.
    WithdrawFund => WithdrawFundInstructionData {
        owner:                  writable + signer,
        sale_manager:           writable,
        sale_pot:               writable,
        pool_pot:               writable,
        withdraw_pot:           writable,
        token_program:          readonly,
    }
}
