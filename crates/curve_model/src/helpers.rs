//! Invariant checking helpers

use crate::math::product;
use crate::state::*;
use fairlaunch_common::Amount;

/// Sum of holder balances outside the pool, `None` on overflow
pub fn circulating_supply(s: &State) -> Option<Amount> {
    s.balances.values().try_fold(Amount::ZERO, |acc, b| acc.checked_add(*b))
}

/// Conservation: token reserve plus every holder balance equals the fixed supply
pub fn conservation_ok(s: &State) -> bool {
    circulating_supply(s)
        .and_then(|c| c.checked_add(s.token_reserve))
        .map_or(false, |total| total == s.params.total_supply)
}

/// Reserve product t·b never shrinks across a swap
pub fn product_non_decreasing(before: &State, after: &State) -> bool {
    match (
        product(before.token_reserve, before.base_reserve),
        product(after.token_reserve, after.base_reserve),
    ) {
        (Some(k0), Some(k1)) => k1 >= k0,
        _ => false,
    }
}

/// The launch latch only moves Trading -> Graduated
pub fn launch_monotonic(before: &State, after: &State) -> bool {
    !(before.launch.is_graduated() && !after.launch.is_graduated())
}

/// Graduated state is consistent with the threshold: a trading pool never
/// sits at or above the threshold after a buy has been evaluated
pub fn launch_consistent(s: &State) -> bool {
    match s.launch {
        LaunchState::Trading => s.base_reserve < s.params.launch_threshold,
        LaunchState::Graduated => true,
    }
}
