//! Definitions of all presale program instructions: the instruction tags, their Borsh argument
//! payloads, and the ordered account lists expected by the program.
//!
//! Account structs are generated by [`instruction_accounts`] and expose `create_instruction` for
//! building client-side instructions and `try_from_account_metas` for reading them back.

use borsh::{
    BorshDeserialize,
    BorshSerialize,
};

use crate::discriminator::{
    instruction_discriminator,
    Discriminator,
    DISCRIMINATOR_LEN,
};

#[macro_use]
mod accounts_macro;

pub mod accounts;
pub mod data;

pub use accounts::*;
pub use data::*;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "client", derive(strum_macros::EnumIter))]
pub enum PresaleInstruction {
    InitPool,
    SetAuthority,
    SetWhitelist,
    UpdateWhitelist,
    ControlPresaleLive,
    MintNft,
    SetMaxPrice,
    InitSaleManager,
    SellNft,
    BuyNft,
    RedeemNft,
    WithdrawFund,
}

impl PresaleInstruction {
    /// The instruction's handler name in the program, which seeds its discriminator.
    pub const fn name(self) -> &'static str {
        match self {
            Self::InitPool => "init_pool",
            Self::SetAuthority => "set_authority",
            Self::SetWhitelist => "set_whitelist",
            Self::UpdateWhitelist => "update_whitelist",
            Self::ControlPresaleLive => "control_presale_live",
            Self::MintNft => "mint_nft",
            Self::SetMaxPrice => "set_max_price",
            Self::InitSaleManager => "init_sale_manager",
            Self::SellNft => "sell_nft",
            Self::BuyNft => "buy_nft",
            Self::RedeemNft => "redeem_nft",
            Self::WithdrawFund => "withdraw_fund",
        }
    }

    pub fn discriminator(self) -> Discriminator {
        instruction_discriminator(self.name())
    }

    /// Matches the leading discriminator of raw instruction data against every known instruction.
    #[cfg(feature = "client")]
    pub fn from_instruction_data(data: &[u8]) -> Option<Self> {
        use strum::IntoEnumIterator;

        let tag = data.get(..DISCRIMINATOR_LEN)?;
        Self::iter().find(|ix| ix.discriminator() == tag)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InstructionDataError {
    #[error("instruction data isn't tagged as {}", .expected.name())]
    UnexpectedDiscriminator { expected: PresaleInstruction },
    #[error("invalid instruction args: {0}")]
    InvalidArgs(String),
}

/// The Borsh-encoded argument payload of a single presale instruction.
pub trait InstructionData: BorshSerialize + BorshDeserialize + Sized {
    const INSTRUCTION: PresaleInstruction;

    /// Packs the instruction data as the discriminator followed by the Borsh-encoded arguments.
    fn pack(&self) -> Vec<u8> {
        let mut data = Self::INSTRUCTION.discriminator().to_vec();
        // Writing into a `Vec` can't fail.
        let _ = self.serialize(&mut data);
        data
    }

    fn unpack(data: &[u8]) -> Result<Self, InstructionDataError> {
        let unexpected = InstructionDataError::UnexpectedDiscriminator {
            expected: Self::INSTRUCTION,
        };
        if data.len() < DISCRIMINATOR_LEN {
            return Err(unexpected);
        }
        let (tag, args) = data.split_at(DISCRIMINATOR_LEN);
        if tag != Self::INSTRUCTION.discriminator() {
            return Err(unexpected);
        }
        Self::try_from_slice(args).map_err(|e| InstructionDataError::InvalidArgs(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn discriminators_are_unique() {
        let all = PresaleInstruction::iter()
            .map(PresaleInstruction::discriminator)
            .collect::<std::collections::HashSet<_>>();
        assert_eq!(all.len(), PresaleInstruction::iter().count());
    }

    #[test]
    fn instruction_from_data() {
        for ix in PresaleInstruction::iter() {
            let mut data = ix.discriminator().to_vec();
            data.extend_from_slice(&[1, 2, 3]);
            assert_eq!(PresaleInstruction::from_instruction_data(&data), Some(ix));
        }
        assert_eq!(PresaleInstruction::from_instruction_data(&[0; 4]), None);
        assert_eq!(PresaleInstruction::from_instruction_data(&[0; 8]), None);
    }

    #[test]
    fn set_whitelist_layout() {
        let data = SetWhitelistInstructionData {
            bump: 253,
            amount: 10,
            whitelisted: true,
        }
        .pack();
        assert_eq!(&data[..8], &[69, 161, 114, 252, 244, 66, 197, 48]);
        assert_eq!(data[8], 253);
        assert_eq!(&data[9..17], &10u64.to_le_bytes());
        assert_eq!(data[17], 1);
        assert_eq!(data.len(), 18);
    }

    #[test]
    fn unpack_rejects_other_instruction() {
        let data = SellNftInstructionData { price: 100 }.pack();
        assert_eq!(
            SellNftInstructionData::unpack(&data),
            Ok(SellNftInstructionData { price: 100 })
        );
        assert_eq!(
            SetMaxPriceInstructionData::unpack(&data),
            Err(InstructionDataError::UnexpectedDiscriminator {
                expected: PresaleInstruction::SetMaxPrice
            })
        );
        assert_eq!(
            SetMaxPriceInstructionData::unpack(&data)
                .unwrap_err()
                .to_string(),
            "instruction data isn't tagged as set_max_price"
        );
    }
}
