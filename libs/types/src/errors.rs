//! Error types for shared primitives

use thiserror::Error;

/// Failure to parse an [`Address`](crate::ids::Address) from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid address length: expected 40 hex digits, got {actual}")]
    InvalidLength { actual: usize },

    #[error("Invalid hex in address: {0}")]
    InvalidHex(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_error_display() {
        let err = AddressError::InvalidLength { actual: 12 };
        assert!(err.to_string().contains("12"));
    }
}
