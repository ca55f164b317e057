//! Devnet error types

use bond_types::ids::Address;
use thiserror::Error;
use timelock_bond::{BondError, TransferError};

/// Errors raised by the local execution environment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DevnetError {
    #[error("No contract deployed at {address}")]
    UnknownContract { address: Address },

    #[error("No genesis account at index {index}")]
    UnknownAccount { index: usize },

    #[error("Contract call reverted: {0}")]
    Bond(#[from] BondError),

    #[error("Transfer failed: {0}")]
    Transfer(#[from] TransferError),

    #[error("Chain id mismatch: state file has {found}, network expects {expected}")]
    ChainIdMismatch { expected: u64, found: u64 },

    #[error("Network {name} is remote; only local networks run in the devnet")]
    RemoteNetwork { name: String },

    #[error("Corrupt state: bond at {contract} violates its ledger invariant")]
    CorruptState { contract: Address },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serde(String),
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Unknown network: {name}")]
    UnknownNetwork { name: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

impl From<std::io::Error> for DevnetError {
    fn from(err: std::io::Error) -> Self {
        DevnetError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DevnetError {
    fn from(err: serde_json::Error) -> Self {
        DevnetError::Serde(err.to_string())
    }
}
