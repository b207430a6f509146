//! Error codes returned by the presale program and conversion helpers to represent them as error
//! message strings.

/// Anchor places user-defined program errors after its own framework error codes.
pub const ANCHOR_ERROR_OFFSET: u32 = 300;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "client", derive(strum_macros::FromRepr, strum_macros::EnumIter))]
#[repr(u32)]
pub enum PoolError {
    TokenMintToFailed = ANCHOR_ERROR_OFFSET,
    TokenSetAuthorityFailed,
    TokenTransferFailed,
    PresaleLive,
    PresaleNotLive,
    InvalidMintAccount,
    InvalidTokenAccount,
    InvalidPoolAccount,
    NotWhitelisted,
    MintAmountIsZero,
    AlreadyTrading,
    InvalidPrice,
    InvalidSaleState,
    NotEnoughTokenAmount,
    InvalidBidder,
    InvalidAmount,
    InvalidSeller,
}

impl PoolError {
    pub const fn code(self) -> u32 {
        self as u32
    }

    #[cfg(feature = "client")]
    pub fn from_code(code: u32) -> Option<Self> {
        Self::from_repr(code)
    }
}

impl From<PoolError> for &'static str {
    fn from(value: PoolError) -> Self {
        match value {
            PoolError::TokenMintToFailed => "Token mint to failed",
            PoolError::TokenSetAuthorityFailed => "Token set authority failed",
            PoolError::TokenTransferFailed => "Token transfer failed",
            PoolError::PresaleLive => "Presale is live",
            PoolError::PresaleNotLive => "Presale is not live",
            PoolError::InvalidMintAccount => "Invalid mint account",
            PoolError::InvalidTokenAccount => "Invalid token account",
            PoolError::InvalidPoolAccount => "Invalid pool account",
            PoolError::NotWhitelisted => "Not whitelisted",
            PoolError::MintAmountIsZero => "Mint amount is zero",
            PoolError::AlreadyTrading => "Already on sale",
            PoolError::InvalidPrice => "Invalid price",
            PoolError::InvalidSaleState => "Invalid sale state",
            PoolError::NotEnoughTokenAmount => "Not enough token amount",
            PoolError::InvalidBidder => "Invalid bidder",
            PoolError::InvalidAmount => "Invalid amount",
            PoolError::InvalidSeller => "Invalid seller",
        }
    }
}

impl core::fmt::Display for PoolError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}: {}", self, <&'static str>::from(*self))
    }
}

/// The subset of Anchor framework account constraint codes the client needs to tell apart.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "client", derive(strum_macros::FromRepr))]
#[repr(u32)]
pub enum AnchorFrameworkError {
    ConstraintMut = 140,
    ConstraintHasOne = 141,
    ConstraintSigner = 142,
    ConstraintRaw = 143,
    ConstraintOwner = 144,
    ConstraintRentExempt = 145,
    ConstraintSeeds = 146,
    ConstraintAddress = 152,
    AccountDiscriminatorNotFound = 161,
    AccountDiscriminatorMismatch = 162,
}

impl AnchorFrameworkError {
    pub const fn code(self) -> u32 {
        self as u32
    }

    #[cfg(feature = "client")]
    pub fn from_code(code: u32) -> Option<Self> {
        Self::from_repr(code)
    }
}

impl core::fmt::Display for AnchorFrameworkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn pool_error_codes_start_at_anchor_offset() {
        assert_eq!(PoolError::TokenMintToFailed.code(), 300);
        assert_eq!(PoolError::PresaleLive.code(), 303);
        assert_eq!(PoolError::InvalidPrice.code(), 311);
        assert_eq!(PoolError::InvalidSeller.code(), 316);
    }

    #[test]
    fn pool_error_code_round_trip() {
        for error in PoolError::iter() {
            assert_eq!(PoolError::from_code(error.code()), Some(error));
        }
        assert_eq!(PoolError::from_code(299), None);
        assert_eq!(PoolError::from_code(317), None);
    }

    #[test]
    fn framework_codes() {
        assert_eq!(
            AnchorFrameworkError::from_code(146),
            Some(AnchorFrameworkError::ConstraintSeeds)
        );
        assert_eq!(AnchorFrameworkError::from_code(300), None);
    }
}
