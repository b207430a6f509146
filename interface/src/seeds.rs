//! Literal seed tags used when deriving token metadata program addresses.
//!
//! The presale program's own PDAs are derived purely from account addresses and carry no literal
//! tags. See `client::pda` for the full seed layouts.

pub const METADATA_SEED: &[u8] = b"metadata";

pub const EDITION_SEED: &[u8] = b"edition";
