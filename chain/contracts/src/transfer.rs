//! Value-transfer primitive and native balance tracking
//!
//! - `ValueTransfer`: the seam the bond moves value through
//! - `Balances`: per-address balances with overflow/underflow protection
//! - `Custody`: `ValueTransfer` over `Balances` for one custody account

use bond_types::ids::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::bond::TimeLockedBond;
use crate::errors::TransferError;

/// Atomic movement of the held asset.
///
/// `release` hands control to the recipient side together with mutable
/// access to the bond, so a recipient can call back into it before the
/// transfer returns. The bond commits its own state before calling it.
pub trait ValueTransfer {
    /// Move `amount` from `from` into custody.
    fn collect(&mut self, from: &Address, amount: Decimal) -> Result<(), TransferError>;

    /// Move `amount` out of custody to `to`.
    fn release(
        &mut self,
        bond: &mut TimeLockedBond,
        to: &Address,
        amount: Decimal,
    ) -> Result<(), TransferError>;
}

/// Native asset balances keyed by address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    accounts: BTreeMap<Address, Decimal>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `account`, zero if never seen.
    pub fn balance_of(&self, account: &Address) -> Decimal {
        self.accounts.get(account).copied().unwrap_or(Decimal::ZERO)
    }

    /// Mint `amount` into `account` with overflow protection.
    pub fn credit(&mut self, account: &Address, amount: Decimal) -> Result<(), TransferError> {
        if amount < Decimal::ZERO {
            return Err(TransferError::InvalidAmount);
        }
        let current = self.accounts.entry(*account).or_insert(Decimal::ZERO);
        *current = current.checked_add(amount).ok_or(TransferError::Overflow)?;
        Ok(())
    }

    /// Move `amount` from `from` to `to`.
    ///
    /// Either both sides are updated or neither is.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Decimal,
    ) -> Result<(), TransferError> {
        if amount < Decimal::ZERO {
            return Err(TransferError::InvalidAmount);
        }

        let available = self.balance_of(from);
        if available < amount {
            return Err(TransferError::InsufficientBalance {
                account: *from,
                required: amount,
                available,
            });
        }

        if from == to {
            return Ok(());
        }

        let debited = available
            .checked_sub(amount)
            .ok_or(TransferError::Overflow)?;
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;

        self.accounts.insert(*from, debited);
        self.accounts.insert(*to, credited);
        Ok(())
    }

    /// Sum of all balances.
    pub fn total(&self) -> Decimal {
        self.accounts.values().copied().sum()
    }
}

/// Transfers through `Balances` on behalf of one custody account.
#[derive(Debug)]
pub struct Custody<'a> {
    balances: &'a mut Balances,
    account: Address,
}

impl<'a> Custody<'a> {
    pub fn new(balances: &'a mut Balances, account: Address) -> Self {
        Self { balances, account }
    }
}

impl ValueTransfer for Custody<'_> {
    fn collect(&mut self, from: &Address, amount: Decimal) -> Result<(), TransferError> {
        self.balances.transfer(from, &self.account, amount)
    }

    fn release(
        &mut self,
        _bond: &mut TimeLockedBond,
        to: &Address,
        amount: Decimal,
    ) -> Result<(), TransferError> {
        self.balances.transfer(&self.account, to, amount)
    }
}
