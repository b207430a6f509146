//! Account records owned by the presale program.
//!
//! Every record is stored as an 8-byte account discriminator followed by its Borsh-encoded fields.
//! Accounts are allocated with a fixed size up front, so decoding must tolerate trailing zeroed
//! bytes after the encoded record.

use borsh::{
    BorshDeserialize,
    BorshSerialize,
};

use crate::discriminator::{
    account_discriminator,
    Discriminator,
    DISCRIMINATOR_LEN,
};

pub mod metadata;
pub mod pool;
pub mod sale;

pub use metadata::*;
pub use pool::*;
pub use sale::*;

pub const ADDRESS_SIZE: usize = 32;
pub const U64_SIZE: usize = core::mem::size_of::<u64>();
pub const U16_SIZE: usize = core::mem::size_of::<u16>();
pub const BOOL_SIZE: usize = 1;
pub const U8_SIZE: usize = 1;
/// Borsh length prefix for a `Vec<T>`.
pub const VEC_PREFIX_SIZE: usize = core::mem::size_of::<u32>();

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum AccountDecodeError {
    /// The account data is shorter than a discriminator.
    #[error("account data too short ({len} bytes)")]
    TooShort { len: usize },
    #[error("expected discriminator {expected:?}, found {found:?}")]
    DiscriminatorMismatch {
        expected: Discriminator,
        found: Discriminator,
    },
    #[error("invalid account data: {0}")]
    InvalidData(String),
}

/// A Borsh record stored in a presale program account behind an Anchor account discriminator.
pub trait AccountRecord: BorshSerialize + BorshDeserialize + Sized {
    /// The record's type name as declared by the program, used to derive its discriminator.
    const ACCOUNT_NAME: &'static str;

    /// The maximum serialized size of the record, excluding the discriminator.
    const SPACE: usize;

    fn discriminator() -> Discriminator {
        account_discriminator(Self::ACCOUNT_NAME)
    }

    fn try_from_account_data(data: &[u8]) -> Result<Self, AccountDecodeError> {
        if data.len() < DISCRIMINATOR_LEN {
            return Err(AccountDecodeError::TooShort { len: data.len() });
        }
        let (tag, mut body) = data.split_at(DISCRIMINATOR_LEN);
        let expected = Self::discriminator();
        if tag != expected {
            let mut found = [0u8; DISCRIMINATOR_LEN];
            found.copy_from_slice(tag);
            return Err(AccountDecodeError::DiscriminatorMismatch { expected, found });
        }

        // `deserialize` rather than `try_from_slice` so the zeroed allocation tail is ignored.
        Self::deserialize(&mut body).map_err(|e| AccountDecodeError::InvalidData(e.to_string()))
    }

    /// Encodes the record as it would be stored on-chain: discriminator, fields, then zero padding
    /// up to the account's allocated size.
    fn to_account_data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(DISCRIMINATOR_LEN + Self::SPACE);
        data.extend_from_slice(&Self::discriminator());
        // Writing into a `Vec` can't fail.
        let _ = self.serialize(&mut data);
        if data.len() < DISCRIMINATOR_LEN + Self::SPACE {
            data.resize(DISCRIMINATOR_LEN + Self::SPACE, 0);
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use solana_address::Address;

    use super::*;

    #[test]
    fn decode_ignores_allocation_padding() {
        let pool = Pool {
            owner: Address::new_from_array([7; 32]),
            presale_live: true,
            sale_mint: Address::new_from_array([9; 32]),
        };
        let mut data = pool.to_account_data();
        data.extend_from_slice(&[0; 64]);
        assert_eq!(Pool::try_from_account_data(&data), Ok(pool));
    }

    #[test]
    fn decode_rejects_other_records() {
        let entry = WhitelistEntry {
            owner: Address::new_from_array([1; 32]),
            pool: Address::new_from_array([2; 32]),
            amount: 10,
            whitelisted: true,
            bump: 254,
        };
        let data = entry.to_account_data();
        assert!(matches!(
            Pool::try_from_account_data(&data),
            Err(AccountDecodeError::DiscriminatorMismatch { .. })
        ));
        assert_eq!(
            Pool::try_from_account_data(&data[..4]),
            Err(AccountDecodeError::TooShort { len: 4 })
        );
        assert_eq!(
            AccountDecodeError::TooShort { len: 4 }.to_string(),
            "account data too short (4 bytes)"
        );
    }
}
