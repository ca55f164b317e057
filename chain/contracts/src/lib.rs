//! Time-Locked Bond Contract Logic
//!
//! This crate implements a single-deposit custody contract: a value held for
//! a beneficiary and released only after a fixed 365-day lock.
//!
//! # Modules
//! - `errors`: Contract-specific error types
//! - `events`: Events emitted on deposit and withdrawal
//! - `ledger`: The custody ledger entry and its read-only projections
//! - `clock`: Clock oracle trait with wall and manual clocks
//! - `transfer`: Value-transfer primitive and native balances
//! - `bond`: The custody controller (deploy, withdraw, inspect)

pub mod errors;
pub mod events;
pub mod ledger;
pub mod clock;
pub mod transfer;
pub mod bond;

pub use bond::TimeLockedBond;
pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::{BondError, TransferError};
pub use ledger::{BondInfo, BondState};
pub use transfer::{Balances, Custody, ValueTransfer};
