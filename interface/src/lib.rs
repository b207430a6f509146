//! Public interface layer for the presale program: program ids, seed tags, instruction schemas,
//! account state records, and error codes shared by every client-side crate.

pub mod discriminator;
pub mod error;
pub mod instructions;
pub mod program;
pub mod seeds;
pub mod state;
