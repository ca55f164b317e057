//! Time-Locked Bond: custody controller
//!
//! Holds a single deposit for a beneficiary and releases it once, after a
//! fixed 365-day lock:
//! - Construction takes the deposit into custody or fails as a whole
//! - Withdrawal is beneficiary-only, after maturity, at most once
//! - State is committed before value leaves custody (checks-effects-interactions)
//! - Inspection never fails and never mutates

use bond_types::ids::Address;
use bond_types::time::{Timestamp, LOCK_DURATION_SECS};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::errors::BondError;
use crate::events::{ContractEvent, Deposited, Withdrawn};
use crate::ledger::{BondInfo, BondState, LedgerEntry};
use crate::transfer::ValueTransfer;

/// The custody contract.
///
/// Owns its ledger entry; every mutation goes through `withdraw`. Callers
/// supply the clock and the value-transfer primitive on each call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLockedBond {
    entry: LedgerEntry,
    /// Emitted events log (append-only)
    events: Vec<ContractEvent>,
}

impl TimeLockedBond {
    /// Construct a bond and take `value` from `owner` into custody.
    ///
    /// Validates: beneficiary is not the zero address, value is positive.
    /// If the transfer fails no bond is created. Emits `Deposited`.
    pub fn deploy(
        owner: Address,
        beneficiary: Address,
        value: Decimal,
        clock: &dyn Clock,
        transfer: &mut dyn ValueTransfer,
    ) -> Result<Self, BondError> {
        if beneficiary.is_zero() {
            debug!(%owner, "Rejected bond with zero beneficiary");
            return Err(BondError::InvalidBeneficiary);
        }

        if value <= Decimal::ZERO {
            debug!(%owner, %value, "Rejected bond with non-positive deposit");
            return Err(BondError::InvalidAmount);
        }

        let now = clock.now();
        let unlock_time = now.saturating_add(LOCK_DURATION_SECS);

        transfer.collect(&owner, value)?;

        let entry = LedgerEntry::new(owner, beneficiary, value, unlock_time);
        let event = ContractEvent::Deposited(Deposited {
            owner,
            beneficiary,
            amount: value,
            unlock_time,
        });

        info!(
            %owner,
            %beneficiary,
            amount = %value,
            unlock_time,
            "Bond deployed"
        );

        Ok(Self {
            entry,
            events: vec![event],
        })
    }

    /// Release the locked value to the beneficiary.
    ///
    /// Checks, in order: not yet withdrawn, caller is the beneficiary,
    /// clock has reached the unlock time. Emits `Withdrawn`.
    ///
    /// A transfer error is returned after the entry has been marked
    /// withdrawn; the executing environment must discard the call's state
    /// changes when it sees an error.
    pub fn withdraw(
        &mut self,
        caller: &Address,
        clock: &dyn Clock,
        transfer: &mut dyn ValueTransfer,
    ) -> Result<ContractEvent, BondError> {
        if self.entry.withdrawn() {
            debug!(%caller, "Rejected withdrawal: already withdrawn");
            return Err(BondError::AlreadyWithdrawn);
        }

        let beneficiary = self.entry.beneficiary();
        if *caller != beneficiary {
            debug!(%caller, %beneficiary, "Rejected withdrawal: unauthorized caller");
            return Err(BondError::Unauthorized { caller: *caller });
        }

        let now = clock.now();
        let unlock_time = self.entry.unlock_time();
        if now < unlock_time {
            debug!(now, unlock_time, "Rejected withdrawal: not matured");
            return Err(BondError::NotMatured {
                unlock_time,
                remaining_seconds: unlock_time.saturating_sub(now),
            });
        }

        // Commit before the transfer: a reentrant call must see the terminal state.
        let amount = self.entry.mark_withdrawn();

        transfer.release(self, &beneficiary, amount)?;

        let event = ContractEvent::Withdrawn(Withdrawn {
            beneficiary,
            amount,
            timestamp: now,
        });
        self.events.push(event.clone());

        info!(%beneficiary, amount = %amount, timestamp = now, "Bond withdrawn");
        Ok(event)
    }

    /// Read-only projection of the ledger entry.
    pub fn inspect(&self) -> BondInfo {
        BondInfo::from(&self.entry)
    }

    /// Lifecycle state at time `now`.
    pub fn state(&self, now: Timestamp) -> BondState {
        if self.entry.withdrawn() {
            BondState::Withdrawn
        } else if now < self.entry.unlock_time() {
            BondState::Locked
        } else {
            BondState::Maturing
        }
    }

    /// Seconds until maturity at time `now`; zero once matured.
    pub fn time_remaining(&self, now: Timestamp) -> i64 {
        self.entry.unlock_time().saturating_sub(now).max(0)
    }

    pub fn entry(&self) -> &LedgerEntry {
        &self.entry
    }

    pub fn owner(&self) -> Address {
        self.entry.owner()
    }

    pub fn beneficiary(&self) -> Address {
        self.entry.beneficiary()
    }

    pub fn unlock_time(&self) -> Timestamp {
        self.entry.unlock_time()
    }

    // ───────────────────────── Events ─────────────────────────

    /// Get all emitted events.
    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }
}
