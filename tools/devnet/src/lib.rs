//! Local Devnet for Time-Locked Bonds
//!
//! An in-process execution environment that deploys bonds, advances a
//! manual clock, and persists its state between CLI invocations.
//!
//! # Modules
//! - `chain`: Balances, deployed bonds, atomic transactions, time skip
//! - `config`: Network table and environment-driven settings
//! - `errors`: Devnet and configuration errors

pub mod chain;
pub mod config;
pub mod errors;

pub use chain::{Devnet, LoggedEvent, Receipt};
pub use config::{DevnetConfig, NetworkConfig};
pub use errors::{ConfigError, DevnetError};
