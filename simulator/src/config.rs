//! Simulator configuration

use anyhow::{Context, Result};
use curve_model::Params;
use fairlaunch_common::{ether, units, Address, Amount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable naming the scenario file
pub const CONFIG_ENV: &str = "FAIRLAUNCH_CONFIG";

/// Scenario file used when neither a path nor the environment names one
pub const DEFAULT_CONFIG_PATH: &str = "fairlaunch.toml";

/// Name that always resolves to the pool's own address
pub const POOL_ALIAS: &str = "pool";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid sell amount {0:?}: expected \"all\", \"half\" or a decimal")]
    SellAmount(String),
    #[error("step {step} names unknown account {name:?}")]
    UnknownAccount { step: usize, name: String },
    #[error("step {step} uses a zero-width account name")]
    EmptyName { step: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub token_name: String,
    pub token_symbol: String,

    /// Account paying the optional initial base
    pub deployer: Address,

    /// The pool's own address (sell spender)
    pub pool_address: Address,

    /// Base merged into the reserve at construction
    #[serde(with = "ether::option", default, skip_serializing_if = "Option::is_none")]
    pub initial_base: Option<Amount>,

    #[serde(default)]
    pub params: Params,

    /// Named traders and their starting base balances
    #[serde(default)]
    pub accounts: BTreeMap<String, Account>,

    /// Calls replayed in order
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: Address,
    #[serde(with = "ether")]
    pub base: Amount,
}

/// One scenario call. `account` is the caller; `to` and `spender` accept an
/// account name or `"pool"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Buy {
        account: String,
        #[serde(with = "ether")]
        amount: Amount,
    },
    /// Approves the pool for the amount, then sells it
    Sell { account: String, amount: SellAmount },
    Approve {
        account: String,
        spender: String,
        #[serde(with = "ether")]
        amount: Amount,
    },
    Transfer {
        account: String,
        to: String,
        #[serde(with = "ether")]
        amount: Amount,
    },
}

impl Step {
    pub fn account(&self) -> &str {
        match self {
            Step::Buy { account, .. }
            | Step::Sell { account, .. }
            | Step::Approve { account, .. }
            | Step::Transfer { account, .. } => account,
        }
    }

    /// Every name the step resolves
    fn names(&self) -> Vec<&str> {
        match self {
            Step::Buy { account, .. } | Step::Sell { account, .. } => vec![account.as_str()],
            Step::Approve { account, spender, .. } => vec![account.as_str(), spender.as_str()],
            Step::Transfer { account, to, .. } => vec![account.as_str(), to.as_str()],
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use alloy_primitives::utils::format_ether;
        match self {
            Step::Buy { account, amount } => write!(f, "{} buys with {}", account, format_ether(*amount)),
            Step::Sell { account, amount } => write!(f, "{} sells {}", account, amount),
            Step::Approve { account, spender, amount } => {
                write!(f, "{} approves {} for {}", account, spender, format_ether(*amount))
            }
            Step::Transfer { account, to, amount } => {
                write!(f, "{} transfers {} to {}", account, format_ether(*amount), to)
            }
        }
    }
}

/// Token amount for a sell step, relative to the seller's balance at the time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SellAmount {
    All,
    Half,
    Exact(Amount),
}

impl SellAmount {
    pub fn resolve(self, balance: Amount) -> Amount {
        match self {
            SellAmount::All => balance,
            SellAmount::Half => balance / Amount::from(2u8),
            SellAmount::Exact(amount) => amount,
        }
    }
}

impl FromStr for SellAmount {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(SellAmount::All),
            "half" => Ok(SellAmount::Half),
            raw => alloy_primitives::utils::parse_ether(raw)
                .map(SellAmount::Exact)
                .map_err(|_| ConfigError::SellAmount(s.to_string())),
        }
    }
}

impl TryFrom<String> for SellAmount {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SellAmount> for String {
    fn from(amount: SellAmount) -> Self {
        amount.to_string()
    }
}

impl fmt::Display for SellAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SellAmount::All => f.write_str("all"),
            SellAmount::Half => f.write_str("half"),
            SellAmount::Exact(amount) => {
                f.write_str(&alloy_primitives::utils::format_ether(*amount))
            }
        }
    }
}

impl Config {
    /// Load configuration from TOML file. `path` wins over `FAIRLAUNCH_CONFIG`.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_string(),
            None => std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string()),
        };
        let config_path = shellexpand::tilde(&config_path).into_owned();

        let config_str = std::fs::read_to_string(&config_path)
            .context(format!("Failed to read config file: {}", config_path))?;

        let config = Self::parse(&config_str)?;
        log::info!("Loaded scenario from {} ({} steps)", config_path, config.steps.len());
        Ok(config)
    }

    pub fn parse(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str).context("Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.params.validate().context("Invalid pool params")?;

        for (i, step) in self.steps.iter().enumerate() {
            for name in step.names() {
                if name.is_empty() {
                    return Err(ConfigError::EmptyName { step: i }.into());
                }
                if self.resolve(name).is_none() {
                    return Err(ConfigError::UnknownAccount { step: i, name: name.to_string() }.into());
                }
            }
        }
        Ok(())
    }

    /// Address behind an account name, `"pool"`, or a literal hex address
    pub fn resolve(&self, name: &str) -> Option<Address> {
        if name == POOL_ALIAS {
            return Some(self.pool_address);
        }
        if let Some(account) = self.accounts.get(name) {
            return Some(account.address);
        }
        name.parse().ok()
    }

    /// Built-in scenario: a five-unit launch bought up by four traders until
    /// the base reserve crosses the threshold, then one buy too many.
    pub fn default_scenario() -> Self {
        let accounts = [("alice", 0xa1u8), ("bob", 0xb0), ("carol", 0xc0), ("dave", 0xda)]
            .into_iter()
            .map(|(name, byte)| {
                (
                    name.to_string(),
                    Account { address: Address::repeat_byte(byte), base: units(100) },
                )
            })
            .collect();

        let buy = |account: &str, n: u64| Step::Buy { account: account.into(), amount: units(n) };

        Self {
            token_name: "Testing Token".to_string(),
            token_symbol: "TEST".to_string(),
            deployer: Address::repeat_byte(0xd0),
            pool_address: Address::repeat_byte(0xee),
            initial_base: Some(units(5)),
            params: Params::default(),
            accounts,
            steps: vec![
                buy("bob", 10),
                buy("carol", 3),
                Step::Sell { account: "bob".into(), amount: SellAmount::Half },
                buy("dave", 10),
                buy("carol", 6),
                buy("bob", 2),
                buy("carol", 2),
            ],
        }
    }

    /// Write default config to file
    pub fn write_default(path: &str) -> Result<()> {
        let config = Self::default_scenario();
        let toml_str = toml::to_string_pretty(&config).context("Failed to serialize config")?;

        let path = shellexpand::tilde(path).into_owned();
        std::fs::write(&path, toml_str).context(format!("Failed to write config to {}", path))?;

        log::info!("Created default config at {}", path);
        Ok(())
    }
}
