//! Custody ledger entry
//!
//! Pure state for a single bond: who deposited, who may withdraw, how much
//! is held and until when. Fields are read through accessors; the only
//! mutation path is crate-private and driven by the bond controller.

use bond_types::ids::Address;
use bond_types::time::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Persistent record of one custody deposit.
///
/// Invariant: `withdrawn` implies `locked_amount == 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    owner: Address,
    beneficiary: Address,
    locked_amount: Decimal,
    unlock_time: Timestamp,
    withdrawn: bool,
}

impl LedgerEntry {
    pub(crate) fn new(
        owner: Address,
        beneficiary: Address,
        locked_amount: Decimal,
        unlock_time: Timestamp,
    ) -> Self {
        Self {
            owner,
            beneficiary,
            locked_amount,
            unlock_time,
            withdrawn: false,
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn beneficiary(&self) -> Address {
        self.beneficiary
    }

    pub fn locked_amount(&self) -> Decimal {
        self.locked_amount
    }

    pub fn unlock_time(&self) -> Timestamp {
        self.unlock_time
    }

    pub fn withdrawn(&self) -> bool {
        self.withdrawn
    }

    /// Check the entry invariant: withdrawn => nothing left locked.
    pub fn check_invariant(&self) -> bool {
        !self.withdrawn || self.locked_amount.is_zero()
    }

    /// Move to the terminal state, returning the amount that was locked.
    pub(crate) fn mark_withdrawn(&mut self) -> Decimal {
        self.withdrawn = true;
        std::mem::replace(&mut self.locked_amount, Decimal::ZERO)
    }
}

/// Lifecycle state of a bond relative to a clock reading.
///
/// `Maturing` is never stored; it follows from the clock alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BondState {
    /// Before the unlock time
    Locked,
    /// Unlock time reached, funds still held
    Maturing,
    /// Funds released (terminal)
    Withdrawn,
}

/// Read-only projection of a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondInfo {
    pub owner: Address,
    pub beneficiary: Address,
    pub locked_amount: Decimal,
    pub unlock_time: Timestamp,
    pub withdrawn: bool,
}

impl From<&LedgerEntry> for BondInfo {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            owner: entry.owner,
            beneficiary: entry.beneficiary,
            locked_amount: entry.locked_amount,
            unlock_time: entry.unlock_time,
            withdrawn: entry.withdrawn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> LedgerEntry {
        LedgerEntry::new(
            Address::derive(b"alice"),
            Address::derive(b"bob"),
            Decimal::from(10),
            1_000,
        )
    }

    #[test]
    fn test_new_entry_not_withdrawn() {
        let e = entry();
        assert!(!e.withdrawn());
        assert_eq!(e.locked_amount(), Decimal::from(10));
        assert!(e.check_invariant());
    }

    #[test]
    fn test_mark_withdrawn_zeroes_amount() {
        let mut e = entry();
        let released = e.mark_withdrawn();
        assert_eq!(released, Decimal::from(10));
        assert!(e.withdrawn());
        assert_eq!(e.locked_amount(), Decimal::ZERO);
        assert!(e.check_invariant());
    }

    #[test]
    fn test_mark_withdrawn_keeps_identities() {
        let mut e = entry();
        e.mark_withdrawn();
        assert_eq!(e.owner(), Address::derive(b"alice"));
        assert_eq!(e.beneficiary(), Address::derive(b"bob"));
        assert_eq!(e.unlock_time(), 1_000);
    }

    #[test]
    fn test_bond_info_projection() {
        let e = entry();
        let info = BondInfo::from(&e);
        assert_eq!(info.owner, e.owner());
        assert_eq!(info.locked_amount, e.locked_amount());
        assert!(!info.withdrawn);
    }

    #[test]
    fn test_bond_state_serialization() {
        let json = serde_json::to_string(&BondState::Maturing).unwrap();
        assert_eq!(json, "\"maturing\"");
    }
}
