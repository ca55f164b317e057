//! Devnet configuration
//!
//! Network table and environment-driven settings. Values come from the
//! process environment after loading an optional `.env` file.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::errors::ConfigError;

pub const HARDHAT_CHAIN_ID: u64 = 31337;
pub const SEPOLIA_CHAIN_ID: u64 = 11155111;

const DEFAULT_NETWORK: &str = "hardhat";
const DEFAULT_STATE_PATH: &str = ".devnet/state.json";
const DEFAULT_ACCOUNTS: usize = 20;
const DEFAULT_ACCOUNT_BALANCE: i64 = 10_000;

/// A named network the tooling knows about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub name: String,
    pub chain_id: u64,
    /// RPC endpoint, `None` for the in-process network
    pub url: Option<String>,
    /// Whether the in-process devnet can serve this network
    pub local: bool,
}

impl NetworkConfig {
    /// Built-in networks. Sepolia's URL needs an Alchemy key.
    pub fn builtin(alchemy_api_key: Option<&str>) -> Vec<NetworkConfig> {
        vec![
            NetworkConfig {
                name: "hardhat".to_string(),
                chain_id: HARDHAT_CHAIN_ID,
                url: None,
                local: true,
            },
            NetworkConfig {
                name: "localhost".to_string(),
                chain_id: HARDHAT_CHAIN_ID,
                url: Some("http://127.0.0.1:8545".to_string()),
                local: true,
            },
            NetworkConfig {
                name: "sepolia".to_string(),
                chain_id: SEPOLIA_CHAIN_ID,
                url: alchemy_api_key
                    .map(|key| format!("https://eth-sepolia.g.alchemy.com/v2/{}", key)),
                local: false,
            },
        ]
    }

    /// Look up a built-in network by name.
    pub fn by_name(name: &str, alchemy_api_key: Option<&str>) -> Result<Self, ConfigError> {
        Self::builtin(alchemy_api_key)
            .into_iter()
            .find(|n| n.name == name)
            .ok_or_else(|| ConfigError::UnknownNetwork {
                name: name.to_string(),
            })
    }
}

/// Settings for the devnet CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct DevnetConfig {
    pub network: NetworkConfig,
    /// Where devnet state is persisted between commands
    pub state_path: PathBuf,
    /// Number of pre-funded genesis accounts
    pub accounts: usize,
    /// Genesis balance of each account
    pub account_balance: Decimal,
}

impl Default for DevnetConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::builtin(None).remove(0),
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            accounts: DEFAULT_ACCOUNTS,
            account_balance: Decimal::from(DEFAULT_ACCOUNT_BALANCE),
        }
    }
}

impl DevnetConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    ///
    /// Keys: `DEVNET_NETWORK`, `DEVNET_STATE`, `DEVNET_ACCOUNTS`,
    /// `DEVNET_ACCOUNT_BALANCE`, `ALCHEMY_API_KEY`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let alchemy_api_key = lookup("ALCHEMY_API_KEY");
        let network_name = lookup("DEVNET_NETWORK").unwrap_or_else(|| DEFAULT_NETWORK.to_string());
        let network = NetworkConfig::by_name(&network_name, alchemy_api_key.as_deref())?;

        let state_path = lookup("DEVNET_STATE")
            .map(PathBuf::from)
            .unwrap_or(defaults.state_path);

        let accounts = match lookup("DEVNET_ACCOUNTS") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(invalid("DEVNET_ACCOUNTS", raw)),
            },
            None => defaults.accounts,
        };

        let account_balance = match lookup("DEVNET_ACCOUNT_BALANCE") {
            Some(raw) => match raw.parse::<Decimal>() {
                Ok(v) if v >= Decimal::ZERO => v,
                _ => return Err(invalid("DEVNET_ACCOUNT_BALANCE", raw)),
            },
            None => defaults.account_balance,
        };

        Ok(Self {
            network,
            state_path,
            accounts,
            account_balance,
        })
    }
}

fn invalid(key: &str, value: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DevnetConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, DevnetConfig::default());
        assert_eq!(config.network.name, "hardhat");
        assert_eq!(config.network.chain_id, HARDHAT_CHAIN_ID);
        assert_eq!(config.accounts, 20);
    }

    #[test]
    fn test_overrides() {
        let config = DevnetConfig::from_lookup(lookup_from(&[
            ("DEVNET_NETWORK", "localhost"),
            ("DEVNET_STATE", "/tmp/bond.json"),
            ("DEVNET_ACCOUNTS", "3"),
            ("DEVNET_ACCOUNT_BALANCE", "12.5"),
        ]))
        .unwrap();
        assert_eq!(config.network.url.as_deref(), Some("http://127.0.0.1:8545"));
        assert_eq!(config.state_path, PathBuf::from("/tmp/bond.json"));
        assert_eq!(config.accounts, 3);
        assert_eq!(config.account_balance, Decimal::new(125, 1));
    }

    #[test]
    fn test_sepolia_url_uses_alchemy_key() {
        let config = DevnetConfig::from_lookup(lookup_from(&[
            ("DEVNET_NETWORK", "sepolia"),
            ("ALCHEMY_API_KEY", "abc"),
        ]))
        .unwrap();
        assert_eq!(config.network.chain_id, SEPOLIA_CHAIN_ID);
        assert_eq!(
            config.network.url.as_deref(),
            Some("https://eth-sepolia.g.alchemy.com/v2/abc")
        );
        assert!(!config.network.local);
    }

    #[test]
    fn test_unknown_network() {
        let result = DevnetConfig::from_lookup(lookup_from(&[("DEVNET_NETWORK", "mainnet")]));
        assert_eq!(
            result,
            Err(ConfigError::UnknownNetwork {
                name: "mainnet".to_string()
            })
        );
    }

    #[test]
    fn test_invalid_account_count() {
        let result = DevnetConfig::from_lookup(lookup_from(&[("DEVNET_ACCOUNTS", "0")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

        let result = DevnetConfig::from_lookup(lookup_from(&[("DEVNET_ACCOUNTS", "many")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_negative_balance_rejected() {
        let result =
            DevnetConfig::from_lookup(lookup_from(&[("DEVNET_ACCOUNT_BALANCE", "-1")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
