//! PDA helpers for deriving presale and token metadata program addresses.
//!
//! Every helper is a pure function of its seeds and the owning program id in [`ProgramIds`], so
//! repeated derivations always return the same address and bump.

use presale_interface::{
    program::ProgramIds,
    seeds::{
        EDITION_SEED,
        METADATA_SEED,
    },
};
use solana_address::Address;

/// The bidder's whitelist entry: `[presale_program_id, pool, bidder]` under the presale program.
pub fn find_whitelist_address(ids: &ProgramIds, pool: &Address, bidder: &Address) -> (Address, u8) {
    Address::find_program_address(
        &[ids.presale.as_ref(), pool.as_ref(), bidder.as_ref()],
        &ids.presale,
    )
}

pub fn find_metadata_address(ids: &ProgramIds, mint: &Address) -> (Address, u8) {
    Address::find_program_address(
        &[METADATA_SEED, ids.token_metadata.as_ref(), mint.as_ref()],
        &ids.token_metadata,
    )
}

pub fn find_master_edition_address(ids: &ProgramIds, mint: &Address) -> (Address, u8) {
    Address::find_program_address(
        &[
            METADATA_SEED,
            ids.token_metadata.as_ref(),
            mint.as_ref(),
            EDITION_SEED,
        ],
        &ids.token_metadata,
    )
}

/// The presale program's per-mint record: `[mint, pool, presale_program_id]`.
pub fn find_metadata_extended_address(
    ids: &ProgramIds,
    mint: &Address,
    pool: &Address,
) -> (Address, u8) {
    Address::find_program_address(
        &[mint.as_ref(), pool.as_ref(), ids.presale.as_ref()],
        &ids.presale,
    )
}

/// The sale manager for an NFT within a pool: `[pool, nft_mint]`.
pub fn find_sale_manager_address(
    ids: &ProgramIds,
    pool: &Address,
    nft_mint: &Address,
) -> (Address, u8) {
    Address::find_program_address(&[pool.as_ref(), nft_mint.as_ref()], &ids.presale)
}
