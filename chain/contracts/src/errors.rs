//! Contract-specific error types
//!
//! Every error is a rejected operation: the call aborts and leaves no
//! persisted side effect, so retrying once the precondition holds is safe.

use bond_types::ids::Address;
use bond_types::time::{format_duration, Timestamp};
use rust_decimal::Decimal;
use thiserror::Error;

/// Bond controller errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BondError {
    #[error("Invalid beneficiary: the zero address cannot be a beneficiary")]
    InvalidBeneficiary,

    #[error("Deposit amount must be positive")]
    InvalidAmount,

    #[error("Unauthorized: {caller} is not the beneficiary")]
    Unauthorized { caller: Address },

    #[error("Bond not matured: unlocks at {unlock_time}, {} remaining", format_duration(*remaining_seconds))]
    NotMatured {
        unlock_time: Timestamp,
        remaining_seconds: i64,
    },

    #[error("Funds already withdrawn")]
    AlreadyWithdrawn,

    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),
}

/// Value-transfer errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    #[error("Insufficient balance for {account}: required {required}, available {available}")]
    InsufficientBalance {
        account: Address,
        required: Decimal,
        available: Decimal,
    },

    #[error("Transfer amount must not be negative")]
    InvalidAmount,

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,

    #[error("Recipient {recipient} rejected the transfer: {reason}")]
    Rejected { recipient: Address, reason: String },
}
