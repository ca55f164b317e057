//! Contract events
//!
//! Events are immutable records emitted by bond operations for off-system
//! observers. The bond keeps them in an append-only log.

use bond_types::ids::Address;
use bond_types::time::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Value taken into custody at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposited {
    pub owner: Address,
    pub beneficiary: Address,
    pub amount: Decimal,
    pub unlock_time: Timestamp,
}

/// Locked value released to the beneficiary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawn {
    pub beneficiary: Address,
    pub amount: Decimal,
    pub timestamp: Timestamp,
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    Deposited(Deposited),
    Withdrawn(Withdrawn),
}

impl ContractEvent {
    /// Short label for logs and CLI output
    pub fn name(&self) -> &'static str {
        match self {
            ContractEvent::Deposited(_) => "Deposited",
            ContractEvent::Withdrawn(_) => "Withdrawn",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_withdrawn_serialization() {
        let event = Withdrawn {
            beneficiary: Address::derive(b"bob"),
            amount: Decimal::from(10),
            timestamp: 1_708_123_456,
        };
        let json = serde_json::to_string(&event).unwrap();
        let deser: Withdrawn = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }

    #[test]
    fn test_contract_event_name() {
        let event = ContractEvent::Deposited(Deposited {
            owner: Address::derive(b"alice"),
            beneficiary: Address::derive(b"bob"),
            amount: Decimal::new(15, 1),
            unlock_time: 42,
        });
        assert_eq!(event.name(), "Deposited");
        assert!(matches!(event, ContractEvent::Deposited(_)));
    }
}
