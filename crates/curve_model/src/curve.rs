//! Constant product bonding curve (x·y=k) over token and base reserves

use crate::math::{add, bps_of, mul_div, sub};
use fairlaunch_common::{Amount, LaunchError, LaunchResult, WAD};

/// Quote result for a single swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    /// Gross input (base for buys, tokens for sells)
    pub amount_in: Amount,

    /// Part of the input kept by the pool as fee
    pub fee: Amount,

    /// Output owed to the trader
    pub amount_out: Amount,

    /// New token reserve after trade
    pub new_token_reserve: Amount,

    /// New base reserve after trade
    pub new_base_reserve: Amount,
}

/// Calculate quote for buying tokens with base (trader provides Δb, receives Δt)
///
/// With fee on input:
/// - Δb_net = Δb_in - fee
/// - Δt_out = t0 · Δb_net / (b0 + Δb_net)
/// - t1 = t0 - Δt_out, b1 = b0 + Δb_in (fee stays in the pool)
pub fn quote_buy(
    token_reserve: Amount,
    base_reserve: Amount,
    fee_bps: u16,
    amount_in: Amount,
) -> LaunchResult<Quote> {
    if amount_in.is_zero() {
        return Err(LaunchError::InvalidAmount);
    }

    let fee = bps_of(amount_in, fee_bps)?;
    let net_in = sub(amount_in, fee)?;

    let amount_out = mul_div(token_reserve, net_in, add(base_reserve, net_in)?)?;

    // Draining the reserve is rejected outright, never clamped
    if amount_out >= token_reserve {
        return Err(LaunchError::ArithmeticUnderflow);
    }
    if amount_out.is_zero() {
        return Err(LaunchError::InvalidAmount);
    }

    Ok(Quote {
        amount_in,
        fee,
        amount_out,
        new_token_reserve: sub(token_reserve, amount_out)?,
        new_base_reserve: add(base_reserve, amount_in)?,
    })
}

/// Calculate quote for selling tokens for base (trader provides Δt, receives Δb)
///
/// With fee on input:
/// - Δt_net = Δt_in - fee
/// - Δb_out = b0 · Δt_net / (t0 + Δt_net)
/// - t1 = t0 + Δt_in, b1 = b0 - Δb_out
pub fn quote_sell(
    token_reserve: Amount,
    base_reserve: Amount,
    fee_bps: u16,
    amount_in: Amount,
) -> LaunchResult<Quote> {
    if amount_in.is_zero() {
        return Err(LaunchError::InvalidAmount);
    }

    let fee = bps_of(amount_in, fee_bps)?;
    let net_in = sub(amount_in, fee)?;

    let amount_out = mul_div(base_reserve, net_in, add(token_reserve, net_in)?)?;

    if amount_out.is_zero() {
        return Err(LaunchError::InvalidAmount);
    }
    if amount_out >= base_reserve {
        return Err(LaunchError::ArithmeticUnderflow);
    }

    Ok(Quote {
        amount_in,
        fee,
        amount_out,
        new_token_reserve: add(token_reserve, amount_in)?,
        new_base_reserve: sub(base_reserve, amount_out)?,
    })
}

/// Spot price p = b/t, base per token at 1e18 scale. Zero when no tokens remain.
pub fn spot_price(token_reserve: Amount, base_reserve: Amount) -> Amount {
    if token_reserve.is_zero() {
        return Amount::ZERO;
    }
    mul_div(base_reserve, WAD, token_reserve).unwrap_or(Amount::MAX)
}
