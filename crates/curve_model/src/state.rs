//! Pure ledger state

use fairlaunch_common::{units, Address, Amount, LaunchError, LaunchResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Basis points scale (10,000 bps = 100%)
pub const BPS_SCALE: u16 = 10_000;

/// Default supply: one billion tokens
pub const DEFAULT_TOTAL_SUPPLY_UNITS: u64 = 1_000_000_000;

/// Default graduation threshold: 25 base units
pub const DEFAULT_LAUNCH_THRESHOLD_UNITS: u64 = 25;

/// One-way launch latch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchState {
    #[default]
    Trading,
    Graduated,
}

impl LaunchState {
    pub fn is_graduated(self) -> bool {
        matches!(self, LaunchState::Graduated)
    }
}

/// Whether holders may still sell into the pool once it has graduated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SellPolicy {
    Open,
    Closed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Fixed supply minted into the pool at construction
    #[serde(with = "fairlaunch_common::ether")]
    pub total_supply: Amount,
    /// Base reserve at which the launch graduates
    #[serde(with = "fairlaunch_common::ether")]
    pub launch_threshold: Amount,
    /// Swap fee on input, retained in the pool
    pub fee_bps: u16,
    pub sells_after_graduation: SellPolicy,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            total_supply: units(DEFAULT_TOTAL_SUPPLY_UNITS),
            launch_threshold: units(DEFAULT_LAUNCH_THRESHOLD_UNITS),
            fee_bps: 0,
            sells_after_graduation: SellPolicy::Open,
        }
    }
}

impl Params {
    pub fn validate(&self) -> LaunchResult<()> {
        if self.total_supply.is_zero() {
            return Err(LaunchError::InvalidConfig("total_supply must be non-zero".into()));
        }
        if self.launch_threshold.is_zero() {
            return Err(LaunchError::InvalidConfig("launch_threshold must be non-zero".into()));
        }
        if self.fee_bps >= BPS_SCALE {
            return Err(LaunchError::InvalidConfig(format!(
                "fee_bps must be below {BPS_SCALE}, got {}",
                self.fee_bps
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    /// The pool's own address: allowance spender for sells, holder of the reserve
    pub pool: Address,
    pub token_reserve: Amount,
    pub base_reserve: Amount,
    /// Holder balances outside the pool
    pub balances: BTreeMap<Address, Amount>,
    /// (owner, spender) -> allowance
    pub allowances: BTreeMap<(Address, Address), Amount>,
    pub launch: LaunchState,
    pub params: Params,
}

impl State {
    /// Full supply minted into the reserve, no base, trading open
    pub fn new(pool: Address, params: Params) -> Self {
        Self {
            pool,
            token_reserve: params.total_supply,
            base_reserve: Amount::ZERO,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            launch: LaunchState::Trading,
            params,
        }
    }

    /// Token balance; the pool address reports the token reserve
    pub fn balance_of(&self, who: Address) -> Amount {
        if who == self.pool {
            return self.token_reserve;
        }
        self.balances.get(&who).copied().unwrap_or(Amount::ZERO)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> Amount {
        self.allowances.get(&(owner, spender)).copied().unwrap_or(Amount::ZERO)
    }

    /// Write a holder balance, dropping zero entries so equal ledgers compare equal
    pub(crate) fn set_balance(&mut self, who: Address, amount: Amount) {
        if amount.is_zero() {
            self.balances.remove(&who);
        } else {
            self.balances.insert(who, amount);
        }
    }

    pub(crate) fn set_allowance(&mut self, owner: Address, spender: Address, amount: Amount) {
        if amount.is_zero() {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }
}

/// Copy of every ledger cell a call may touch, restorable if a later step of
/// the call (such as the outgoing base transfer) fails.
#[derive(Clone, Debug)]
pub struct Snapshot {
    token_reserve: Amount,
    base_reserve: Amount,
    launch: LaunchState,
    balances: Vec<(Address, Option<Amount>)>,
    allowances: Vec<((Address, Address), Option<Amount>)>,
}

impl Snapshot {
    pub fn capture(s: &State, holders: &[Address], allowances: &[(Address, Address)]) -> Self {
        Self {
            token_reserve: s.token_reserve,
            base_reserve: s.base_reserve,
            launch: s.launch,
            balances: holders.iter().map(|h| (*h, s.balances.get(h).copied())).collect(),
            allowances: allowances
                .iter()
                .map(|k| (*k, s.allowances.get(k).copied()))
                .collect(),
        }
    }

    pub fn restore(self, s: &mut State) {
        s.token_reserve = self.token_reserve;
        s.base_reserve = self.base_reserve;
        s.launch = self.launch;
        for (who, prev) in self.balances {
            match prev {
                Some(v) => s.balances.insert(who, v),
                None => s.balances.remove(&who),
            };
        }
        for (key, prev) in self.allowances {
            match prev {
                Some(v) => s.allowances.insert(key, v),
                None => s.allowances.remove(&key),
            };
        }
    }
}
