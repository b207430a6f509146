//! See [`Pool`] and [`WhitelistEntry`].

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

pub const POOL_SIZE: usize = ADDRESS_SIZE + BOOL_SIZE + ADDRESS_SIZE;
pub const WHITELIST_ENTRY_SIZE: usize = ADDRESS_SIZE + ADDRESS_SIZE + U64_SIZE + BOOL_SIZE + U8_SIZE;

const_assert_eq!(POOL_SIZE, 65);
const_assert_eq!(WHITELIST_ENTRY_SIZE, 74);

/// The sale's root record. Its address is a plain keypair supplied at creation.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Pool {
    /// The authority allowed to whitelist bidders and toggle the presale.
    pub owner: Address,
    pub presale_live: bool,
    /// The fungible token mint prices are denominated in.
    pub sale_mint: Address,
}

impl AccountRecord for Pool {
    const ACCOUNT_NAME: &'static str = "Pool";
    const SPACE: usize = POOL_SIZE;
}

/// A bidder's whitelist entry for a pool, stored at the PDA of
/// `[presale_program_id, pool, bidder]` under the presale program.
///
/// The program declares this record as `Client`.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct WhitelistEntry {
    /// The whitelisted bidder.
    pub owner: Address,
    pub pool: Address,
    /// The number of NFTs the bidder may still mint during the presale.
    pub amount: u64,
    pub whitelisted: bool,
    pub bump: u8,
}

impl AccountRecord for WhitelistEntry {
    const ACCOUNT_NAME: &'static str = "Client";
    const SPACE: usize = WHITELIST_ENTRY_SIZE;
}
