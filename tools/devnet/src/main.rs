//! devnet
//!
//! CLI for deploying and exercising time-locked bonds on a local devnet.
//! State persists in a JSON file between invocations.
//!
//! Usage:
//!   devnet networks
//!   devnet accounts
//!   devnet deploy    [--from <index>] [--beneficiary <addr>] [--value <amount>]
//!   devnet time-skip [--seconds <n>]
//!   devnet withdraw  --contract <addr> [--from <index> | --caller <addr>]
//!   devnet inspect   --contract <addr>
//!   devnet balance   --account <addr>
//!   devnet events
//!   devnet reset

use anyhow::Context;
use bond_types::ids::Address;
use bond_types::time::{format_duration, LOCK_DURATION_SECS};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::fs;
use timelock_bond::{Clock, SystemClock};
use tracing::info;
use tracing_subscriber::EnvFilter;

use devnet::{Devnet, DevnetConfig, NetworkConfig};

// ── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "devnet", version, about = "Local devnet for time-locked bonds")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List known networks.
    Networks,

    /// Delete persisted state.
    Reset,

    #[command(flatten)]
    Chain(ChainCommand),
}

/// Commands that run against the devnet state.
#[derive(Subcommand, Debug)]
enum ChainCommand {
    /// List genesis accounts and balances.
    Accounts,

    /// Deploy a bond. The beneficiary defaults to the deployer.
    Deploy {
        /// Index of the deploying genesis account.
        #[arg(long, default_value_t = 0)]
        from: usize,
        /// Beneficiary address.
        #[arg(long)]
        beneficiary: Option<Address>,
        /// Value to lock.
        #[arg(long, default_value = "1")]
        value: Decimal,
    },

    /// Advance chain time and mine a block.
    TimeSkip {
        /// Seconds to skip (default: 365 days).
        #[arg(long, default_value_t = LOCK_DURATION_SECS as u64)]
        seconds: u64,
    },

    /// Withdraw from a bond.
    Withdraw {
        /// Bond contract address.
        #[arg(long)]
        contract: Address,
        /// Index of the calling genesis account.
        #[arg(long, default_value_t = 0)]
        from: usize,
        /// Calling address, for beneficiaries outside the genesis accounts.
        #[arg(long, conflicts_with = "from")]
        caller: Option<Address>,
    },

    /// Print a bond's state as JSON.
    Inspect {
        /// Bond contract address.
        #[arg(long)]
        contract: Address,
    },

    /// Print the balance of an address.
    Balance {
        /// Address to query.
        #[arg(long)]
        account: Address,
    },

    /// Print every emitted event.
    Events,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let config = DevnetConfig::from_env().context("loading devnet configuration")?;

    match args.command {
        Command::Networks => {
            let alchemy_key = std::env::var("ALCHEMY_API_KEY").ok();
            for network in NetworkConfig::builtin(alchemy_key.as_deref()) {
                let marker = if network.name == config.network.name { "*" } else { " " };
                println!(
                    "{} {:<10} chain {:<9} {}",
                    marker,
                    network.name,
                    network.chain_id,
                    network.url.as_deref().unwrap_or("(in-process)")
                );
            }
        }

        Command::Reset => {
            if config.state_path.exists() {
                fs::remove_file(&config.state_path).with_context(|| {
                    format!("removing {}", config.state_path.display())
                })?;
            }
            println!("Devnet state reset");
        }

        Command::Chain(command) => {
            let mut net = Devnet::open(&config, SystemClock.now()).with_context(|| {
                format!("opening devnet state at {}", config.state_path.display())
            })?;

            run(&mut net, command)?;

            net.save(&config.state_path).with_context(|| {
                format!("saving devnet state to {}", config.state_path.display())
            })?;
        }
    }
    Ok(())
}

fn run(net: &mut Devnet, command: ChainCommand) -> anyhow::Result<()> {
    match command {
        ChainCommand::Accounts => {
            for (i, account) in net.accounts().iter().enumerate() {
                println!("[{:>2}] {}  {}", i, account, net.balance(account));
            }
        }

        ChainCommand::Deploy {
            from,
            beneficiary,
            value,
        } => {
            let deployer = net.account(from)?;
            let beneficiary = beneficiary.unwrap_or(deployer);
            println!("Deploying with account: {}", deployer);

            let receipt = net
                .deploy(deployer, beneficiary, value)
                .context("deploy reverted")?;
            let info = net.inspect(&receipt.contract)?;
            info!(contract = %receipt.contract, block = receipt.block, "Deployed");

            println!("TimeLockedBond deployed to: {}", receipt.contract);
            println!("  beneficiary: {}", info.beneficiary);
            println!("  locked:      {}", info.locked_amount);
            println!("  unlocks at:  {}", format_timestamp(info.unlock_time));
        }

        ChainCommand::TimeSkip { seconds } => {
            let now = net.time_skip(seconds);
            println!(
                "Skipped {} seconds ({}); chain time is now {}",
                seconds,
                skip_duration(seconds),
                format_timestamp(now)
            );
        }

        ChainCommand::Withdraw {
            contract,
            from,
            caller,
        } => {
            let caller = match caller {
                Some(address) => address,
                None => net.account(from)?,
            };
            let receipt = net.withdraw(contract, caller).context("withdraw reverted")?;
            println!("Withdrawn in block {}", receipt.block);
            for event in &receipt.events {
                println!("  {}", serde_json::to_string(event)?);
            }
            println!("Balance of {}: {}", caller, net.balance(&caller));
        }

        ChainCommand::Inspect { contract } => {
            let info = net.inspect(&contract)?;
            let state = net.state(&contract)?;
            let bond = net.bond(&contract)?;
            let view = serde_json::json!({
                "contract": contract,
                "owner": info.owner,
                "beneficiary": info.beneficiary,
                "lockedAmount": info.locked_amount,
                "unlockTime": info.unlock_time,
                "withdrawn": info.withdrawn,
                "state": state,
                "remaining": format_duration(bond.time_remaining(net.now())),
            });
            println!("{}", serde_json::to_string_pretty(&view)?);
        }

        ChainCommand::Balance { account } => {
            println!("{}", net.balance(&account));
        }

        ChainCommand::Events => {
            for logged in net.events() {
                println!(
                    "block {:>4}  {}  {}  {}",
                    logged.block,
                    logged.contract,
                    logged.event.name(),
                    serde_json::to_string(&logged.event)?
                );
            }
        }
    }
    Ok(())
}

fn skip_duration(seconds: u64) -> String {
    format_duration(i64::try_from(seconds).unwrap_or(i64::MAX))
}

fn format_timestamp(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        Args::try_parse_from(args.iter().copied()).map(|a| a.command)
    }

    #[test]
    fn test_withdraw_by_address() {
        let contract = Address::derive(b"bond").to_string();
        let caller = Address::derive(b"outside-beneficiary");
        let command = parse(&[
            "devnet",
            "withdraw",
            "--contract",
            contract.as_str(),
            "--caller",
            caller.to_string().as_str(),
        ])
        .unwrap();
        assert!(matches!(
            command,
            Command::Chain(ChainCommand::Withdraw { caller: Some(c), .. }) if c == caller
        ));
    }

    #[test]
    fn test_withdraw_defaults_to_first_account() {
        let contract = Address::derive(b"bond").to_string();
        let command = parse(&["devnet", "withdraw", "--contract", contract.as_str()]).unwrap();
        assert!(matches!(
            command,
            Command::Chain(ChainCommand::Withdraw {
                from: 0,
                caller: None,
                ..
            })
        ));
    }

    #[test]
    fn test_withdraw_rejects_from_with_caller() {
        let contract = Address::derive(b"bond").to_string();
        let caller = Address::derive(b"outside-beneficiary").to_string();
        let result = parse(&[
            "devnet",
            "withdraw",
            "--contract",
            contract.as_str(),
            "--from",
            "1",
            "--caller",
            caller.as_str(),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_time_skip_default_is_one_year() {
        let command = parse(&["devnet", "time-skip"]).unwrap();
        assert!(matches!(
            command,
            Command::Chain(ChainCommand::TimeSkip { seconds }) if seconds == LOCK_DURATION_SECS as u64
        ));
    }

    #[test]
    fn test_skip_duration_does_not_wrap() {
        assert_eq!(skip_duration(86_400), "1d 0h 0m 0s");
        assert_eq!(skip_duration(u64::MAX), format_duration(i64::MAX));
        assert_ne!(skip_duration(u64::MAX), "0d 0h 0m 0s");
    }
}
