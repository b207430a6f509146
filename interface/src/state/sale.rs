//! See [`SaleManager`] and [`SalePot`].

use borsh::{
    BorshDeserialize,
    BorshSerialize,
};
use solana_address::Address;
use static_assertions::{
    const_assert,
    const_assert_eq,
};

use crate::state::{
    AccountRecord,
    Creator,
    ADDRESS_SIZE,
    BOOL_SIZE,
    CREATOR_SIZE,
    MAX_CREATOR_NUM,
    MAX_METADATA_CREATORS,
    U16_SIZE,
    U64_SIZE,
    U8_SIZE,
    VEC_PREFIX_SIZE,
};

pub const SALE_MANAGER_SIZE: usize = ADDRESS_SIZE * 5 + U64_SIZE + U8_SIZE + BOOL_SIZE + U8_SIZE;
/// The sale pot allocation made by the program. It budgets for six creators but leaves out `price`
/// and the creators length prefix, so the encoded record is only guaranteed to fit for the
/// [`MAX_METADATA_CREATORS`] creators a metadata account can carry.
pub const SALE_POT_SIZE: usize = BOOL_SIZE
    + ADDRESS_SIZE
    + BOOL_SIZE
    + ADDRESS_SIZE
    + BOOL_SIZE
    + ADDRESS_SIZE
    + U16_SIZE
    + CREATOR_SIZE * MAX_CREATOR_NUM;

/// The encoded size of a sale pot holding `creators` creators.
pub const fn sale_pot_encoded_size(creators: usize) -> usize {
    BOOL_SIZE
        + ADDRESS_SIZE * 3
        + U64_SIZE
        + BOOL_SIZE * 2
        + U16_SIZE
        + VEC_PREFIX_SIZE
        + CREATOR_SIZE * creators
}

const_assert_eq!(SALE_MANAGER_SIZE, 171);
const_assert_eq!(SALE_POT_SIZE, 305);
const_assert!(sale_pot_encoded_size(MAX_METADATA_CREATORS) <= SALE_POT_SIZE);

/// The lifecycle of a listing, stored as [`SaleManager::sale_state`].
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(strum_macros::FromRepr, strum_macros::Display))]
pub enum SaleState {
    /// Initialized or redeemed; not listed.
    Idle = 0,
    Listed = 1,
    Sold = 2,
}

/// Per (pool, NFT mint) sale state at the PDA of `[pool, nft_mint]` under the presale program.
/// Created once by `init_sale_manager` and reused by every later listing of the same NFT.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SaleManager {
    pub pool: Address,
    pub seller: Address,
    pub nft_mint: Address,
    /// The manager-owned token account that escrows the NFT while listed.
    pub nft_pot: Address,
    /// The sale pot of the latest listing. All zeroes until the first `sell_nft`.
    pub sale_pot: Address,
    pub price: u64,
    pub sale_state: u8,
    pub is_primary: bool,
    pub bump: u8,
}

impl SaleManager {
    #[cfg(feature = "client")]
    pub fn state(&self) -> Option<SaleState> {
        SaleState::from_repr(self.sale_state)
    }

    pub fn has_sale_pot(&self) -> bool {
        self.sale_pot != Address::default()
    }
}

impl AccountRecord for SaleManager {
    const ACCOUNT_NAME: &'static str = "SaleManager";
    const SPACE: usize = SALE_MANAGER_SIZE;
}

/// The proceeds ledger of one listing. Its address is a keypair generated by the seller at sell
/// time, so it can only be found by reading [`SaleManager::sale_pot`].
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SalePot {
    pub is_used: bool,
    pub sale_manager: Address,
    /// The manager-owned sale mint token account that receives the buyer's payment.
    pub pool_pot: Address,
    pub price: u64,
    pub is_primary: bool,
    pub seller: Address,
    /// Whether the seller has already withdrawn their proceeds.
    pub seller_verified: bool,
    pub seller_fee_basis_points: u16,
    /// Creator shares. `verified` flips to true once a creator has withdrawn.
    pub creators: Vec<Creator>,
}

impl AccountRecord for SalePot {
    const ACCOUNT_NAME: &'static str = "SalePot";
    const SPACE: usize = SALE_POT_SIZE;
}
