//! Client-side utilities for driving the presale program.
//!
//! Includes PDA derivations, instruction building contexts, an RPC client with bounded
//! confirmation, the sale workflow orchestrator, and an in-process ledger for tests.

pub mod context;
pub mod e2e_helpers;
pub mod error;
pub mod ledger;
pub mod local_ledger;
pub mod logs;
pub mod pda;
pub mod scenario;
pub mod token_instructions;
pub mod transactions;
pub mod views;
pub mod workflow;

pub use logs::LogColor;
