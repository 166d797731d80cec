//! Host seam for moving base currency out of the pool

use crate::state::LaunchPool;
use curve_model::State;
use fairlaunch_common::{Address, Amount, LaunchError, LaunchResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pays base currency to a seller.
///
/// Called only after every ledger mutation of the sell is final. `pool` is the
/// post-mutation ledger; the shared borrow means the host can observe the
/// pool mid-call but cannot re-enter it. An `Err` aborts the sell and the pool
/// reverts the whole call.
pub trait BaseTransfer {
    fn send_base(&mut self, to: Address, amount: Amount, pool: &State) -> Result<(), String>;
}

/// In-memory base-currency balances for hosts that keep their own accounts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeLedger {
    balances: BTreeMap<Address, Amount>,
}

impl NativeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, who: Address) -> Amount {
        self.balances.get(&who).copied().unwrap_or(Amount::ZERO)
    }

    /// Sum of every account, `None` on overflow
    pub fn total(&self) -> Option<Amount> {
        self.balances.values().try_fold(Amount::ZERO, |acc, b| acc.checked_add(*b))
    }

    pub fn credit(&mut self, who: Address, amount: Amount) -> LaunchResult<()> {
        let after = self
            .balance_of(who)
            .checked_add(amount)
            .ok_or(LaunchError::ArithmeticOverflow)?;
        self.balances.insert(who, after);
        Ok(())
    }

    pub fn debit(&mut self, who: Address, amount: Amount) -> LaunchResult<()> {
        let balance = self.balance_of(who);
        if balance < amount {
            return Err(LaunchError::InsufficientBalance { balance, needed: amount });
        }
        self.balances.insert(who, balance - amount);
        Ok(())
    }

    /// Attach `amount` of `caller`'s base to a buy. The base is only taken
    /// if the pool accepts the buy.
    pub fn buy(&mut self, pool: &mut LaunchPool, caller: Address, amount: Amount) -> LaunchResult<Amount> {
        let balance = self.balance_of(caller);
        if balance < amount {
            return Err(LaunchError::InsufficientBalance { balance, needed: amount });
        }
        let out = pool.swap_base_for_tokens(caller, amount)?;
        self.debit(caller, amount)?;
        Ok(out)
    }

    /// Sell through the pool with proceeds credited here
    pub fn sell(&mut self, pool: &mut LaunchPool, caller: Address, amount: Amount) -> LaunchResult<Amount> {
        pool.swap_tokens_for_base(caller, amount, self)
    }
}

impl BaseTransfer for NativeLedger {
    fn send_base(&mut self, to: Address, amount: Amount, _pool: &State) -> Result<(), String> {
        self.credit(to, amount).map_err(|e| e.to_string())
    }
}
