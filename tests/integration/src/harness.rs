//! Test harness for whole-session pool tests

use alloy_primitives::utils::format_ether;
use anyhow::{ensure, Result};
use curve_model::{conservation_ok, Params};
use fairlaunch_common::units;
use fairlaunch_pool::{Address, Amount, LaunchPool, LaunchResult, NativeLedger};

/// Base each trader starts with
pub const STARTING_BASE_UNITS: u64 = 100;

/// Deterministic trader address
pub fn user(n: u8) -> Address {
    Address::repeat_byte(n)
}

pub fn deployer() -> Address {
    Address::repeat_byte(0xd0)
}

pub fn pool_address() -> Address {
    Address::repeat_byte(0xee)
}

/// Deployed pool plus the base-currency accounts around it
pub struct TestContext {
    pub pool: LaunchPool,
    pub ledger: NativeLedger,
    /// Base that entered the system: trader funding plus the seed
    base_issued: Amount,
}

impl TestContext {
    /// Deploy with default params and `initial_units` of base from the deployer
    pub fn deploy(initial_units: u64) -> Result<Self> {
        Self::deploy_with(units(initial_units), Params::default())
    }

    pub fn deploy_with(initial_base: Amount, params: Params) -> Result<Self> {
        let pool = LaunchPool::new(
            "Testing Token",
            "TEST",
            deployer(),
            pool_address(),
            Some(initial_base),
            params,
        )?;
        Ok(Self { pool, ledger: NativeLedger::new(), base_issued: initial_base })
    }

    /// Credit each trader with the starting base
    pub fn fund(&mut self, traders: &[Address]) -> Result<()> {
        for &who in traders {
            self.ledger.credit(who, units(STARTING_BASE_UNITS))?;
            self.base_issued += units(STARTING_BASE_UNITS);
        }
        Ok(())
    }

    pub fn buy(&mut self, who: Address, amount: Amount) -> LaunchResult<Amount> {
        self.ledger.buy(&mut self.pool, who, amount)
    }

    /// Approve the pool for `amount`, then sell it
    pub fn sell(&mut self, who: Address, amount: Amount) -> LaunchResult<Amount> {
        let spender = self.pool.address();
        self.pool.approve(who, spender, amount)?;
        self.ledger.sell(&mut self.pool, who, amount)
    }

    pub fn sell_all(&mut self, who: Address) -> LaunchResult<Amount> {
        let held = self.pool.balance_of(who);
        self.sell(who, held)
    }

    pub fn sell_half(&mut self, who: Address) -> LaunchResult<Amount> {
        let half = self.pool.balance_of(who) / Amount::from(2u8);
        self.sell(who, half)
    }

    pub fn tokens(&self, who: Address) -> Amount {
        self.pool.balance_of(who)
    }

    pub fn base(&self, who: Address) -> Amount {
        self.ledger.balance_of(who)
    }

    pub fn print_state(&self, label: &str, traders: &[Address]) {
        println!("--- {} ---", label);
        println!(
            "  pool: tokens {} base {} graduated {}",
            format_ether(self.pool.get_token_reserve()),
            format_ether(self.pool.get_base_reserve()),
            self.pool.get_launch_status()
        );
        for &who in traders {
            println!(
                "  {}: tokens {} base {}",
                who,
                format_ether(self.tokens(who)),
                format_ether(self.base(who))
            );
        }
    }

    /// Token supply and base currency are both fully accounted for
    pub fn check_conservation(&self) -> Result<()> {
        ensure!(conservation_ok(self.pool.ledger()), "token supply not conserved");

        let held = self.ledger.total().unwrap_or(Amount::MAX);
        let base_total = held.checked_add(self.pool.get_base_reserve());
        ensure!(
            base_total == Some(self.base_issued),
            "base not conserved: {:?} held vs {} issued",
            base_total,
            self.base_issued
        );
        Ok(())
    }
}
