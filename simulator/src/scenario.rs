//! Scenario runner - replays config steps as encoded pool calls

use crate::config::{Config, Step};
use alloy_primitives::utils::format_ether;
use fairlaunch_common::ether;
use fairlaunch_pool::{
    process_instruction, Address, Amount, Instruction, LaunchError, LaunchPool, LaunchResult,
    LaunchState, NativeLedger, Outcome, PoolEvent, SwapReceipt,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// What a step did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum StepOutcome {
    Swapped { receipt: SwapReceipt },
    Done,
    Rejected { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub step: Step,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub address: Address,
    #[serde(with = "ether")]
    pub tokens: Amount,
    #[serde(with = "ether")]
    pub base: Amount,
}

/// Final state of a run
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub token: String,
    pub symbol: String,
    #[serde(with = "ether")]
    pub token_reserve: Amount,
    #[serde(with = "ether")]
    pub base_reserve: Amount,
    #[serde(with = "ether")]
    pub spot_price: Amount,
    pub launch: LaunchState,
    pub accounts: BTreeMap<String, AccountSummary>,
    pub steps: Vec<StepReport>,
    pub events: Vec<PoolEvent>,
}

pub struct Simulation {
    config: Config,
    pool: LaunchPool,
    ledger: NativeLedger,
    reports: Vec<StepReport>,
}

impl Simulation {
    /// Deploy the pool and fund every named account
    pub fn new(config: Config) -> LaunchResult<Self> {
        let pool = LaunchPool::new(
            config.token_name.clone(),
            config.token_symbol.clone(),
            config.deployer,
            config.pool_address,
            config.initial_base,
            config.params.clone(),
        )?;

        let mut ledger = NativeLedger::new();
        for account in config.accounts.values() {
            ledger.credit(account.address, account.base)?;
        }

        Ok(Self { config, pool, ledger, reports: Vec::new() })
    }

    pub fn pool(&self) -> &LaunchPool {
        &self.pool
    }

    pub fn reports(&self) -> &[StepReport] {
        &self.reports
    }

    /// Run every configured step, recording rejections instead of stopping
    pub fn run(&mut self) {
        let steps = self.config.steps.clone();
        for step in &steps {
            self.run_step(step);
            self.log_state();
        }
    }

    /// Execute one step and record its report
    pub fn run_step(&mut self, step: &Step) -> &StepReport {
        let index = self.reports.len();
        let outcome = match self.execute(step) {
            Ok(Outcome::Swapped(receipt)) => {
                log::info!(
                    "step {}: {} -> {} out at {} avg",
                    index,
                    step,
                    format_ether(receipt.amount_out),
                    format_ether(receipt.avg_price())
                );
                StepOutcome::Swapped { receipt }
            }
            Ok(Outcome::Done) => {
                log::info!("step {}: {}", index, step);
                StepOutcome::Done
            }
            Err(e) => {
                log::warn!("step {}: {} rejected: {}", index, step, e);
                StepOutcome::Rejected { error: e.to_string() }
            }
        };

        self.reports.push(StepReport { index, step: step.clone(), outcome });
        &self.reports[index]
    }

    fn execute(&mut self, step: &Step) -> LaunchResult<Outcome> {
        let caller = self.address(step.account())?;
        match step {
            Step::Buy { amount, .. } => {
                // Base is only taken if the pool accepts the buy
                let balance = self.ledger.balance_of(caller);
                if balance < *amount {
                    return Err(LaunchError::InsufficientBalance { balance, needed: *amount });
                }
                let outcome = self.dispatch(caller, Instruction::SwapBaseForTokens { amount_in: *amount })?;
                self.ledger.debit(caller, *amount)?;
                Ok(outcome)
            }
            Step::Sell { amount, .. } => {
                let amount_in = amount.resolve(self.pool.balance_of(caller));
                let spender = self.pool.address();
                self.dispatch(caller, Instruction::Approve { spender, amount: amount_in })?;
                self.dispatch(caller, Instruction::SwapTokensForBase { amount_in })
            }
            Step::Approve { spender, amount, .. } => {
                let spender = self.address(spender)?;
                self.dispatch(caller, Instruction::Approve { spender, amount: *amount })
            }
            Step::Transfer { to, amount, .. } => {
                let to = self.address(to)?;
                self.dispatch(caller, Instruction::Transfer { to, amount: *amount })
            }
        }
    }

    fn dispatch(&mut self, caller: Address, instruction: Instruction) -> LaunchResult<Outcome> {
        let data = instruction.pack();
        process_instruction(&mut self.pool, caller, &mut self.ledger, &data)
    }

    fn address(&self, name: &str) -> LaunchResult<Address> {
        self.config.resolve(name).ok_or(LaunchError::InvalidAddress)
    }

    pub fn log_state(&self) {
        log::info!(
            "  pool: tokens {} base {} price {} graduated {}",
            format_ether(self.pool.get_token_reserve()),
            format_ether(self.pool.get_base_reserve()),
            format_ether(self.pool.spot_price()),
            self.pool.get_launch_status()
        );
        for (name, account) in &self.config.accounts {
            log::info!(
                "  {:<8} tokens {} base {}",
                name,
                format_ether(self.pool.balance_of(account.address)),
                format_ether(self.ledger.balance_of(account.address))
            );
        }
    }

    pub fn summary(&self) -> Summary {
        let accounts = self
            .config
            .accounts
            .iter()
            .map(|(name, account)| {
                (
                    name.clone(),
                    AccountSummary {
                        address: account.address,
                        tokens: self.pool.balance_of(account.address),
                        base: self.ledger.balance_of(account.address),
                    },
                )
            })
            .collect();

        Summary {
            token: self.pool.name().to_string(),
            symbol: self.pool.symbol().to_string(),
            token_reserve: self.pool.get_token_reserve(),
            base_reserve: self.pool.get_base_reserve(),
            spot_price: self.pool.spot_price(),
            launch: self.pool.launch_state(),
            accounts,
            steps: self.reports.clone(),
            events: self.pool.events().to_vec(),
        }
    }
}
