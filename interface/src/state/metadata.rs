//! NFT metadata as passed to `mint_nft`, plus the presale program's own per-mint extension record.

use borsh::{
    BorshDeserialize,
    BorshSerialize,
};
use solana_address::Address;
use static_assertions::const_assert_eq;

use crate::state::{
    AccountRecord,
    ADDRESS_SIZE,
    BOOL_SIZE,
    U64_SIZE,
    U8_SIZE,
};

pub const CREATOR_SIZE: usize = ADDRESS_SIZE + BOOL_SIZE + U8_SIZE;
pub const MAX_CREATOR_NUM: usize = 6;
/// The token metadata program accepts at most this many creators per NFT.
pub const MAX_METADATA_CREATORS: usize = 5;
pub const METADATA_EXTENDED_SIZE: usize = ADDRESS_SIZE + U64_SIZE + U8_SIZE;

const_assert_eq!(CREATOR_SIZE, 34);
const_assert_eq!(METADATA_EXTENDED_SIZE, 41);

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Creator {
    pub address: Address,
    pub verified: bool,
    /// Percentage of creator proceeds, out of 100.
    pub share: u8,
}

/// The metadata argument of `mint_nft`.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct NftMetadata {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub seller_fee_basis_points: u16,
    pub creators: Vec<Creator>,
    pub is_mutable: bool,
}

/// Per-mint record created by `mint_nft` at the PDA of `[mint, pool, presale_program_id]`.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct MetadataExtended {
    pub pool: Address,
    /// Upper bound on the listing price. Zero means unbounded.
    pub max_price: u64,
    pub bump: u8,
}

impl AccountRecord for MetadataExtended {
    const ACCOUNT_NAME: &'static str = "MetadataExtended";
    const SPACE: usize = METADATA_EXTENDED_SIZE;
}
