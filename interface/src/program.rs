//! Program ids the presale program interacts with.
//!
//! The presale program and token metadata program ids are deployment specific, so they're passed
//! around explicitly through [`ProgramIds`] instead of being read from global state.

use solana_address::Address;

/// The program id declared by the presale program's source.
pub const DEFAULT_PRESALE_PROGRAM_ID: Address =
    Address::from_str_const("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

/// The Metaplex token metadata program.
pub const DEFAULT_TOKEN_METADATA_PROGRAM_ID: Address =
    Address::from_str_const("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

pub const SYSTEM_PROGRAM_ID: Address =
    Address::from_str_const("11111111111111111111111111111111");

pub const TOKEN_PROGRAM_ID: Address =
    Address::from_str_const("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

pub const RENT_SYSVAR_ID: Address =
    Address::from_str_const("SysvarRent111111111111111111111111111111111");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramIds {
    /// The deployed presale program.
    pub presale: Address,
    /// The token metadata program that owns NFT metadata and master edition accounts.
    pub token_metadata: Address,
}

impl ProgramIds {
    pub fn new(presale: Address, token_metadata: Address) -> Self {
        Self {
            presale,
            token_metadata,
        }
    }
}

impl Default for ProgramIds {
    fn default() -> Self {
        Self {
            presale: DEFAULT_PRESALE_PROGRAM_ID,
            token_metadata: DEFAULT_TOKEN_METADATA_PROGRAM_ID,
        }
    }
}
