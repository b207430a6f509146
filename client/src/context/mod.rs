//! Contextual helpers that carry the addresses needed to build presale and token instructions.

pub mod pool;
pub mod token;
