//! Borsh argument payloads for each presale instruction.

use borsh::{
    BorshDeserialize,
    BorshSerialize,
};

use crate::{
    instructions::{
        InstructionData,
        PresaleInstruction,
    },
    state::NftMetadata,
};

macro_rules! impl_instruction_data {
    ($($data:ident => $instruction:ident),* $(,)?) => {
        $(
            impl InstructionData for $data {
                const INSTRUCTION: PresaleInstruction = PresaleInstruction::$instruction;
            }
        )*
    };
}

impl_instruction_data! {
    InitPoolInstructionData => InitPool,
    SetAuthorityInstructionData => SetAuthority,
    SetWhitelistInstructionData => SetWhitelist,
    UpdateWhitelistInstructionData => UpdateWhitelist,
    ControlPresaleLiveInstructionData => ControlPresaleLive,
    MintNftInstructionData => MintNft,
    SetMaxPriceInstructionData => SetMaxPrice,
    InitSaleManagerInstructionData => InitSaleManager,
    SellNftInstructionData => SellNft,
    BuyNftInstructionData => BuyNft,
    RedeemNftInstructionData => RedeemNft,
    WithdrawFundInstructionData => WithdrawFund,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct InitPoolInstructionData {}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SetAuthorityInstructionData {}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SetWhitelistInstructionData {
    /// Bump of the whitelist entry PDA being created.
    pub bump: u8,
    /// How many NFTs the bidder may mint.
    pub amount: u64,
    pub whitelisted: bool,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct UpdateWhitelistInstructionData {
    pub amount: u64,
    pub whitelisted: bool,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ControlPresaleLiveInstructionData {
    pub presale_live: bool,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct MintNftInstructionData {
    /// Bump of the metadata extended PDA being created.
    pub bump: u8,
    pub metadata: NftMetadata,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SetMaxPriceInstructionData {
    pub max_price: u64,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct InitSaleManagerInstructionData {
    /// Bump of the sale manager PDA being created.
    pub bump: u8,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SellNftInstructionData {
    pub price: u64,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct BuyNftInstructionData {}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RedeemNftInstructionData {}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct WithdrawFundInstructionData {}
