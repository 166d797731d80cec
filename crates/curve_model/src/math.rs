//! Checked arithmetic helpers - no wrapping, no saturation, no panics

use fairlaunch_common::{Amount, LaunchError, LaunchResult};

/// Add, failing on overflow
pub fn add(a: Amount, b: Amount) -> LaunchResult<Amount> {
    a.checked_add(b).ok_or(LaunchError::ArithmeticOverflow)
}

/// Subtract, failing instead of going below zero
pub fn sub(a: Amount, b: Amount) -> LaunchResult<Amount> {
    a.checked_sub(b).ok_or(LaunchError::ArithmeticUnderflow)
}

/// Multiply, failing on overflow
pub fn mul(a: Amount, b: Amount) -> LaunchResult<Amount> {
    a.checked_mul(b).ok_or(LaunchError::ArithmeticOverflow)
}

/// floor(a * b / d)
pub fn mul_div(a: Amount, b: Amount, d: Amount) -> LaunchResult<Amount> {
    if d.is_zero() {
        return Err(LaunchError::ArithmeticOverflow);
    }
    Ok(mul(a, b)? / d)
}

/// Fee portion of `amount` at `bps` basis points, rounded down
pub fn bps_of(amount: Amount, bps: u16) -> LaunchResult<Amount> {
    mul_div(amount, Amount::from(bps), Amount::from(crate::state::BPS_SCALE))
}

/// Product of two reserves, `None` if it does not fit in 256 bits
pub fn product(a: Amount, b: Amount) -> Option<Amount> {
    a.checked_mul(b)
}
