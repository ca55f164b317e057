//! In-process ledger for deploying and exercising bonds
//!
//! Plays the role of the execution environment around the contract:
//! - Pre-funded genesis accounts
//! - Deterministic contract addresses from `(deployer, nonce)`
//! - All-or-nothing transactions (world state restored on any error)
//! - A manual clock with time skip and block mining
//! - Event log tagged with block number and contract address
//! - JSON persistence between CLI invocations

use bond_types::ids::Address;
use bond_types::time::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use timelock_bond::events::ContractEvent;
use timelock_bond::{Balances, BondInfo, BondState, Clock, Custody, ManualClock, TimeLockedBond};
use tracing::{debug, info, warn};

use crate::config::DevnetConfig;
use crate::errors::DevnetError;

/// State that transactions may modify and that is rolled back on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct World {
    balances: Balances,
    bonds: BTreeMap<Address, TimeLockedBond>,
    nonces: BTreeMap<Address, u64>,
}

/// A contract event together with where it was emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub block: u64,
    pub contract: Address,
    pub event: ContractEvent,
}

/// Outcome of a committed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub block: u64,
    pub timestamp: Timestamp,
    pub contract: Address,
    pub events: Vec<ContractEvent>,
}

/// Local chain holding balances and deployed bonds.
#[derive(Debug, Serialize, Deserialize)]
pub struct Devnet {
    chain_id: u64,
    block_number: u64,
    clock: ManualClock,
    accounts: Vec<Address>,
    world: World,
    events: Vec<LoggedEvent>,
}

impl Devnet {
    /// Fresh chain with `account_count` accounts funded with `balance` each.
    pub fn genesis(
        chain_id: u64,
        account_count: usize,
        balance: Decimal,
        start: Timestamp,
    ) -> Result<Self, DevnetError> {
        let mut world = World::default();
        let accounts: Vec<Address> = (0..account_count).map(genesis_account).collect();
        for account in &accounts {
            world.balances.credit(account, balance)?;
        }

        info!(chain_id, accounts = account_count, %balance, start, "Devnet genesis");

        Ok(Self {
            chain_id,
            block_number: 0,
            clock: ManualClock::at(start),
            accounts,
            world,
            events: Vec::new(),
        })
    }

    /// Open the devnet described by `config`, loading persisted state if any.
    pub fn open(config: &DevnetConfig, start: Timestamp) -> Result<Self, DevnetError> {
        if !config.network.local {
            return Err(DevnetError::RemoteNetwork {
                name: config.network.name.clone(),
            });
        }

        if !config.state_path.exists() {
            return Self::genesis(
                config.network.chain_id,
                config.accounts,
                config.account_balance,
                start,
            );
        }

        let devnet = Self::load(&config.state_path)?;
        if devnet.chain_id != config.network.chain_id {
            return Err(DevnetError::ChainIdMismatch {
                expected: config.network.chain_id,
                found: devnet.chain_id,
            });
        }
        Ok(devnet)
    }

    /// Read a state file and validate every stored bond.
    pub fn load(path: &Path) -> Result<Self, DevnetError> {
        let json = fs::read_to_string(path)?;
        let devnet: Devnet = serde_json::from_str(&json)?;

        for (contract, bond) in &devnet.world.bonds {
            if !bond.entry().check_invariant() {
                return Err(DevnetError::CorruptState {
                    contract: *contract,
                });
            }
        }

        debug!(path = %path.display(), block = devnet.block_number, "Loaded devnet state");
        Ok(devnet)
    }

    /// Write state as pretty JSON, creating parent directories.
    ///
    /// The previous file stays intact until the new one is fully on disk.
    pub fn save(&self, path: &Path) -> Result<(), DevnetError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        let tmp_path = temp_path(path);

        // Atomic write: write to tmp, fsync, rename
        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, path)?;

        debug!(path = %path.display(), block = self.block_number, "Saved devnet state");
        Ok(())
    }

    // ───────────────────────── Contract Calls ─────────────────────────

    /// Deploy a bond from `from` with `value` attached.
    pub fn deploy(
        &mut self,
        from: Address,
        beneficiary: Address,
        value: Decimal,
    ) -> Result<Receipt, DevnetError> {
        let contract = self.transact(|world, clock| {
            let nonce = world.nonces.entry(from).or_insert(0);
            let contract = contract_address(&from, *nonce);
            *nonce += 1;

            let mut custody = Custody::new(&mut world.balances, contract);
            let bond = TimeLockedBond::deploy(from, beneficiary, value, clock, &mut custody)?;
            world.bonds.insert(contract, bond);
            Ok(contract)
        })?;

        info!(%contract, deployer = %from, "Bond contract deployed");
        self.commit(contract)
    }

    /// Call `withdraw` on the bond at `contract` as `caller`.
    pub fn withdraw(&mut self, contract: Address, caller: Address) -> Result<Receipt, DevnetError> {
        self.transact(|world, clock| {
            let bond = world
                .bonds
                .get_mut(&contract)
                .ok_or(DevnetError::UnknownContract { address: contract })?;
            let mut custody = Custody::new(&mut world.balances, contract);
            bond.withdraw(&caller, clock, &mut custody)?;
            Ok(())
        })?;

        self.commit(contract)
    }

    /// Read-only view of the bond at `contract`.
    pub fn inspect(&self, contract: &Address) -> Result<BondInfo, DevnetError> {
        self.bond(contract).map(TimeLockedBond::inspect)
    }

    /// Lifecycle state of the bond at `contract` at the current chain time.
    pub fn state(&self, contract: &Address) -> Result<BondState, DevnetError> {
        self.bond(contract).map(|bond| bond.state(self.now()))
    }

    pub fn bond(&self, contract: &Address) -> Result<&TimeLockedBond, DevnetError> {
        self.world
            .bonds
            .get(contract)
            .ok_or(DevnetError::UnknownContract {
                address: *contract,
            })
    }

    // ───────────────────────── Time ─────────────────────────

    /// Move chain time forward without mining.
    pub fn increase_time(&mut self, seconds: u64) -> Timestamp {
        let now = self.clock.advance(seconds);
        debug!(seconds, now, "Increased time");
        now
    }

    /// Mine an empty block at the current time.
    pub fn mine(&mut self) -> u64 {
        self.block_number += 1;
        self.block_number
    }

    /// Skip `seconds` ahead and mine a block.
    pub fn time_skip(&mut self, seconds: u64) -> Timestamp {
        let now = self.increase_time(seconds);
        let block = self.mine();
        info!(seconds, now, block, "Time skipped");
        now
    }

    // ───────────────────────── Queries ─────────────────────────

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Genesis accounts in creation order.
    pub fn accounts(&self) -> &[Address] {
        &self.accounts
    }

    /// Genesis account by index.
    pub fn account(&self, index: usize) -> Result<Address, DevnetError> {
        self.accounts
            .get(index)
            .copied()
            .ok_or(DevnetError::UnknownAccount { index })
    }

    pub fn balance(&self, account: &Address) -> Decimal {
        self.world.balances.balance_of(account)
    }

    /// Addresses of all deployed bonds.
    pub fn contracts(&self) -> impl Iterator<Item = &Address> {
        self.world.bonds.keys()
    }

    /// Every event emitted so far.
    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    // ───────────────────────── Internals ─────────────────────────

    /// Run `op` against the world; restore the pre-call world if it fails.
    fn transact<T>(
        &mut self,
        op: impl FnOnce(&mut World, &ManualClock) -> Result<T, DevnetError>,
    ) -> Result<T, DevnetError> {
        let snapshot = self.world.clone();
        match op(&mut self.world, &self.clock) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(error = %err, "Transaction reverted");
                self.world = snapshot;
                Err(err)
            }
        }
    }

    /// Mine a block for a committed call and collect its events.
    fn commit(&mut self, contract: Address) -> Result<Receipt, DevnetError> {
        let block = self.mine();
        let events = self
            .world
            .bonds
            .get_mut(&contract)
            .ok_or(DevnetError::UnknownContract { address: contract })?
            .drain_events();

        self.events.extend(events.iter().cloned().map(|event| LoggedEvent {
            block,
            contract,
            event,
        }));

        Ok(Receipt {
            block,
            timestamp: self.now(),
            contract,
            events,
        })
    }
}

/// Sibling of `path` that `save` writes before renaming into place.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Deterministic genesis account for `index`.
pub fn genesis_account(index: usize) -> Address {
    Address::derive(format!("devnet-account-{}", index).as_bytes())
}

/// Address of the `nonce`-th contract deployed by `deployer`.
pub fn contract_address(deployer: &Address, nonce: u64) -> Address {
    let mut seed = Vec::with_capacity(28);
    seed.extend_from_slice(deployer.as_bytes());
    seed.extend_from_slice(&nonce.to_be_bytes());
    Address::derive(&seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bond_types::time::LOCK_DURATION_SECS;
    use timelock_bond::BondError;

    const START: Timestamp = 1_704_067_200;

    fn devnet() -> Devnet {
        Devnet::genesis(31337, 3, Decimal::from(100), START).unwrap()
    }

    #[test]
    fn test_genesis_funds_accounts() {
        let net = devnet();
        assert_eq!(net.accounts().len(), 3);
        for account in net.accounts() {
            assert_eq!(net.balance(account), Decimal::from(100));
        }
        assert_eq!(net.block_number(), 0);
        assert_eq!(net.now(), START);
    }

    #[test]
    fn test_contract_addresses_differ_per_nonce() {
        let deployer = genesis_account(0);
        assert_ne!(contract_address(&deployer, 0), contract_address(&deployer, 1));
        assert_eq!(contract_address(&deployer, 0), contract_address(&deployer, 0));
    }

    #[test]
    fn test_deploy_mines_block_and_logs_event() {
        let mut net = devnet();
        let owner = net.account(0).unwrap();
        let beneficiary = net.account(1).unwrap();

        let receipt = net.deploy(owner, beneficiary, Decimal::from(10)).unwrap();
        assert_eq!(receipt.block, 1);
        assert_eq!(receipt.contract, contract_address(&owner, 0));
        assert_eq!(receipt.events.len(), 1);
        assert_eq!(net.events().len(), 1);
        assert_eq!(net.balance(&receipt.contract), Decimal::from(10));
        assert_eq!(net.balance(&owner), Decimal::from(90));
    }

    #[test]
    fn test_failed_deploy_does_not_consume_nonce() {
        let mut net = devnet();
        let owner = net.account(0).unwrap();

        let result = net.deploy(owner, Address::ZERO, Decimal::from(10));
        assert_eq!(result, Err(DevnetError::Bond(BondError::InvalidBeneficiary)));
        assert_eq!(net.block_number(), 0);

        let receipt = net.deploy(owner, owner, Decimal::from(10)).unwrap();
        assert_eq!(receipt.contract, contract_address(&owner, 0));
    }

    #[test]
    fn test_withdraw_unknown_contract() {
        let mut net = devnet();
        let caller = net.account(0).unwrap();
        let missing = Address::derive(b"nowhere");
        assert_eq!(
            net.withdraw(missing, caller),
            Err(DevnetError::UnknownContract { address: missing })
        );
    }

    #[test]
    fn test_state_follows_clock() {
        let mut net = devnet();
        let owner = net.account(0).unwrap();
        let receipt = net.deploy(owner, owner, Decimal::from(1)).unwrap();

        assert_eq!(net.state(&receipt.contract).unwrap(), BondState::Locked);
        net.time_skip(LOCK_DURATION_SECS as u64);
        assert_eq!(net.state(&receipt.contract).unwrap(), BondState::Maturing);
    }

    #[test]
    fn test_unknown_account() {
        let net = devnet();
        assert_eq!(net.account(7), Err(DevnetError::UnknownAccount { index: 7 }));
    }
}
