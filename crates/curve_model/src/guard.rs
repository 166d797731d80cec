//! Guard layer - input, state and permission checks run before any write

use crate::math::sub;
use crate::state::*;
use fairlaunch_common::{Address, Amount, LaunchError, LaunchResult};

/// Reject zero inputs
pub fn require_non_zero(amount: Amount) -> LaunchResult<()> {
    if amount.is_zero() {
        return Err(LaunchError::InvalidAmount);
    }
    Ok(())
}

/// Buys are only accepted while trading
pub fn require_trading(launch: LaunchState) -> LaunchResult<()> {
    match launch {
        LaunchState::Trading => Ok(()),
        LaunchState::Graduated => Err(LaunchError::TradingClosed),
    }
}

/// Sells follow the configured post-graduation policy
pub fn require_sell_open(launch: LaunchState, policy: SellPolicy) -> LaunchResult<()> {
    match (launch, policy) {
        (LaunchState::Trading, _) => Ok(()),
        (LaunchState::Graduated, SellPolicy::Open) => Ok(()),
        (LaunchState::Graduated, SellPolicy::Closed) => Err(LaunchError::TradingClosed),
    }
}

/// External callers are never the zero address nor the pool itself
pub fn require_holder(s: &State, who: Address) -> LaunchResult<()> {
    if who == Address::ZERO || who == s.pool {
        return Err(LaunchError::InvalidAddress);
    }
    Ok(())
}

pub fn require_recipient(to: Address) -> LaunchResult<()> {
    if to == Address::ZERO {
        return Err(LaunchError::InvalidAddress);
    }
    Ok(())
}

/// Allowance left after spending `amount`
pub fn require_allowance(
    s: &State,
    owner: Address,
    spender: Address,
    amount: Amount,
) -> LaunchResult<Amount> {
    let allowance = s.allowance(owner, spender);
    if allowance < amount {
        return Err(LaunchError::InsufficientAllowance { allowance, needed: amount });
    }
    sub(allowance, amount)
}

/// Balance left after debiting `amount`
pub fn require_balance(s: &State, who: Address, amount: Amount) -> LaunchResult<Amount> {
    let balance = s.balance_of(who);
    if balance < amount {
        return Err(LaunchError::InsufficientBalance { balance, needed: amount });
    }
    sub(balance, amount)
}
