//! Launch pool state - token metadata, ledger, event log

use crate::host::BaseTransfer;
use crate::instructions;
use curve_model::{transitions, LaunchState, Params, Quote, State};
use fairlaunch_common::{
    Address, Amount, LaunchError, LaunchResult, PoolEvent, Side, SwapReceipt, DECIMALS,
};
use serde::{Deserialize, Serialize};

/// ERC20-style token metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// A launched token and the pool that trades it
#[derive(Debug, Clone)]
pub struct LaunchPool {
    pub(crate) metadata: TokenMetadata,
    pub(crate) deployer: Address,
    pub(crate) state: State,
    /// Bumped on every committed mutation
    pub(crate) seqno: u64,
    pub(crate) events: Vec<PoolEvent>,
}

impl LaunchPool {
    /// Mint the full supply into the pool, merge the deployer's optional
    /// initial base payment, then run the launch latch once.
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        deployer: Address,
        address: Address,
        initial_base: Option<Amount>,
        params: Params,
    ) -> LaunchResult<Self> {
        params.validate()?;
        if address == Address::ZERO || deployer == Address::ZERO || deployer == address {
            return Err(LaunchError::InvalidAddress);
        }

        let mut pool = Self {
            metadata: TokenMetadata {
                name: name.into(),
                symbol: symbol.into(),
                decimals: DECIMALS,
            },
            deployer,
            state: State::new(address, params),
            seqno: 0,
            events: Vec::new(),
        };

        if let Some(amount) = initial_base.filter(|a| !a.is_zero()) {
            let graduated = transitions::seed(&mut pool.state, amount)?;
            pool.events.push(PoolEvent::Seeded { from: deployer, amount });
            if graduated {
                pool.record_graduation();
            }
        }

        log::info!(
            "launched {} ({}) at {}: supply {}, base reserve {}, threshold {}",
            pool.metadata.name,
            pool.metadata.symbol,
            address,
            pool.state.params.total_supply,
            pool.state.base_reserve,
            pool.state.params.launch_threshold
        );
        Ok(pool)
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn total_supply(&self) -> Amount {
        self.state.params.total_supply
    }

    /// The pool's own address
    pub fn address(&self) -> Address {
        self.state.pool
    }

    pub fn deployer(&self) -> Address {
        self.deployer
    }

    pub fn balance_of(&self, who: Address) -> Amount {
        self.state.balance_of(who)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> Amount {
        self.state.allowance(owner, spender)
    }

    pub fn get_token_reserve(&self) -> Amount {
        self.state.token_reserve
    }

    pub fn get_base_reserve(&self) -> Amount {
        self.state.base_reserve
    }

    /// True once the launch has graduated
    pub fn get_launch_status(&self) -> bool {
        self.state.launch.is_graduated()
    }

    pub fn launch_state(&self) -> LaunchState {
        self.state.launch
    }

    /// Read-only view of the whole ledger
    pub fn ledger(&self) -> &State {
        &self.state
    }

    /// Base per token at 1e18 scale
    pub fn spot_price(&self) -> Amount {
        curve_model::spot_price(self.state.token_reserve, self.state.base_reserve)
    }

    /// What `swap_base_for_tokens(amount_in)` would return right now
    pub fn quote_buy(&self, amount_in: Amount) -> LaunchResult<Quote> {
        transitions::preview_buy(&self.state, amount_in)
    }

    /// What `swap_tokens_for_base(amount_in)` would return right now, ignoring
    /// the caller's allowance and balance
    pub fn quote_sell(&self, amount_in: Amount) -> LaunchResult<Quote> {
        transitions::preview_sell(&self.state, amount_in)
    }

    pub fn seqno(&self) -> u64 {
        self.seqno
    }

    pub fn events(&self) -> &[PoolEvent] {
        &self.events
    }

    /// Buy tokens with `amount_in` base attached by the caller
    pub fn swap_base_for_tokens(&mut self, caller: Address, amount_in: Amount) -> LaunchResult<Amount> {
        instructions::process_swap_base_for_tokens(self, caller, amount_in).map(|r| r.amount_out)
    }

    /// Sell `amount_in` tokens; the base proceeds are sent through `host`
    pub fn swap_tokens_for_base<H: BaseTransfer + ?Sized>(
        &mut self,
        caller: Address,
        amount_in: Amount,
        host: &mut H,
    ) -> LaunchResult<Amount> {
        instructions::process_swap_tokens_for_base(self, caller, amount_in, host).map(|r| r.amount_out)
    }

    pub fn approve(&mut self, caller: Address, spender: Address, amount: Amount) -> LaunchResult<()> {
        instructions::process_approve(self, caller, spender, amount)
    }

    pub fn transfer(&mut self, caller: Address, to: Address, amount: Amount) -> LaunchResult<()> {
        instructions::process_transfer(self, caller, to, amount)
    }

    pub fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> LaunchResult<()> {
        instructions::process_transfer_from(self, caller, from, to, amount)
    }

    pub(crate) fn bump_seqno(&mut self) -> u64 {
        self.seqno = self.seqno.wrapping_add(1);
        self.seqno
    }

    pub(crate) fn record_swap(
        &mut self,
        side: Side,
        trader: Address,
        trade: &transitions::Trade,
    ) -> SwapReceipt {
        let receipt = SwapReceipt {
            seqno: self.bump_seqno(),
            side,
            trader,
            amount_in: trade.quote.amount_in,
            fee: trade.quote.fee,
            amount_out: trade.quote.amount_out,
            token_reserve_after: self.state.token_reserve,
            base_reserve_after: self.state.base_reserve,
        };
        self.events.push(PoolEvent::Swap(receipt.clone()));
        if trade.graduated {
            self.record_graduation();
        }
        receipt
    }

    pub(crate) fn record_graduation(&mut self) {
        self.events.push(PoolEvent::Graduated {
            seqno: self.seqno,
            base_reserve: self.state.base_reserve,
        });
    }
}
