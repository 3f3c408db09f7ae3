//! Client-side utilities for the bootcamp programs.
//!
//! Includes address derivation, transaction assembly and confirmation, an in-memory ledger for
//! tests, and helpers shared by the demos.

pub mod config;
pub mod e2e_helpers;
pub mod error;
pub mod logs;
pub mod mock_ledger;
pub mod pda;
pub mod rpc;
pub mod single_signer_instruction;
pub mod transactions;

pub use logs::LogColor;
