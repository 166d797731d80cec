//! State transition functions
//!
//! Each transition runs every guard and computes every new value before the
//! first write, so an `Err` leaves the state untouched.

use crate::curve::{quote_buy, quote_sell, Quote};
use crate::guard::*;
use crate::math::add;
use crate::state::*;
use fairlaunch_common::{Address, Amount, LaunchResult};

/// Result of an applied swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trade {
    pub quote: Quote,
    /// True if this call latched the launch into Graduated
    pub graduated: bool,
}

/// Launch latch: Trading becomes Graduated once the base reserve reaches the
/// threshold; Graduated never changes
pub fn evaluate_launch(launch: LaunchState, base_reserve: Amount, threshold: Amount) -> LaunchState {
    match launch {
        LaunchState::Trading if base_reserve >= threshold => LaunchState::Graduated,
        LaunchState::Trading => LaunchState::Trading,
        LaunchState::Graduated => LaunchState::Graduated,
    }
}

/// Re-evaluate the latch in place; true if it flipped on this call
fn apply_launch(s: &mut State) -> bool {
    let next = evaluate_launch(s.launch, s.base_reserve, s.params.launch_threshold);
    let flipped = next != s.launch;
    s.launch = next;
    if flipped {
        log::info!("launch graduated at base reserve {}", s.base_reserve);
    }
    flipped
}

/// Merge the deployer's initial base payment into the reserve
pub fn seed(s: &mut State, amount: Amount) -> LaunchResult<bool> {
    let base_after = add(s.base_reserve, amount)?;
    s.base_reserve = base_after;
    Ok(apply_launch(s))
}

/// Quote a buy against the current state
pub fn preview_buy(s: &State, amount_in: Amount) -> LaunchResult<Quote> {
    require_non_zero(amount_in)?;
    require_trading(s.launch)?;
    quote_buy(s.token_reserve, s.base_reserve, s.params.fee_bps, amount_in)
}

/// Quote a sell against the current state (ignores allowance and balance)
pub fn preview_sell(s: &State, amount_in: Amount) -> LaunchResult<Quote> {
    require_non_zero(amount_in)?;
    require_sell_open(s.launch, s.params.sells_after_graduation)?;
    quote_sell(s.token_reserve, s.base_reserve, s.params.fee_bps, amount_in)
}

/// Swap base for tokens, crediting the buyer, then run the launch latch
pub fn buy(s: &mut State, buyer: Address, amount_in: Amount) -> LaunchResult<Trade> {
    require_holder(s, buyer)?;
    let quote = preview_buy(s, amount_in)?;
    let balance_after = add(s.balance_of(buyer), quote.amount_out)?;

    s.token_reserve = quote.new_token_reserve;
    s.base_reserve = quote.new_base_reserve;
    s.set_balance(buyer, balance_after);
    let graduated = apply_launch(s);

    log::debug!(
        "buy: {} paid {} base for {} tokens (reserves t={} b={})",
        buyer,
        amount_in,
        quote.amount_out,
        s.token_reserve,
        s.base_reserve
    );

    Ok(Trade { quote, graduated })
}

/// Swap tokens for base. Pulls `amount_in` from the seller through the pool's
/// allowance; the base owed is `quote.amount_out` and is paid by the caller
/// of this function after it returns.
pub fn sell(s: &mut State, seller: Address, amount_in: Amount) -> LaunchResult<Trade> {
    require_non_zero(amount_in)?;
    require_holder(s, seller)?;
    require_sell_open(s.launch, s.params.sells_after_graduation)?;

    let pool = s.pool;
    let allowance_after = require_allowance(s, seller, pool, amount_in)?;
    let balance_after = require_balance(s, seller, amount_in)?;
    let quote = quote_sell(s.token_reserve, s.base_reserve, s.params.fee_bps, amount_in)?;

    s.set_balance(seller, balance_after);
    s.set_allowance(seller, pool, allowance_after);
    s.token_reserve = quote.new_token_reserve;
    s.base_reserve = quote.new_base_reserve;

    log::debug!(
        "sell: {} sold {} tokens for {} base (reserves t={} b={})",
        seller,
        amount_in,
        quote.amount_out,
        s.token_reserve,
        s.base_reserve
    );

    Ok(Trade { quote, graduated: false })
}

/// Set (overwrite) an allowance
pub fn approve(s: &mut State, owner: Address, spender: Address, amount: Amount) -> LaunchResult<()> {
    require_holder(s, owner)?;
    require_recipient(spender)?;
    s.set_allowance(owner, spender, amount);
    Ok(())
}

/// Move tokens between holders; sending to the pool address donates to the reserve
pub fn transfer(s: &mut State, from: Address, to: Address, amount: Amount) -> LaunchResult<()> {
    require_holder(s, from)?;
    require_recipient(to)?;
    let from_after = require_balance(s, from, amount)?;

    if to == s.pool {
        let reserve_after = add(s.token_reserve, amount)?;
        s.set_balance(from, from_after);
        s.token_reserve = reserve_after;
    } else if to != from {
        let to_after = add(s.balance_of(to), amount)?;
        s.set_balance(from, from_after);
        s.set_balance(to, to_after);
    }
    Ok(())
}

/// Delegated transfer consuming exactly `amount` of `from`'s allowance to `spender`
pub fn transfer_from(
    s: &mut State,
    spender: Address,
    from: Address,
    to: Address,
    amount: Amount,
) -> LaunchResult<()> {
    require_holder(s, spender)?;
    let allowance_after = require_allowance(s, from, spender, amount)?;
    // transfer writes nothing on Err, so the allowance is only spent on success
    transfer(s, from, to, amount)?;
    s.set_allowance(from, spender, allowance_after);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::*;
    use fairlaunch_common::{units, LaunchError};

    fn pool() -> Address {
        Address::repeat_byte(0xee)
    }
    fn alice() -> Address {
        Address::repeat_byte(0xa1)
    }
    fn bob() -> Address {
        Address::repeat_byte(0xb0)
    }

    fn seeded(base: u64) -> State {
        let mut s = State::new(pool(), Params::default());
        seed(&mut s, units(base)).unwrap();
        s
    }

    #[test]
    fn test_evaluate_launch_latch() {
        let t = units(25);
        assert_eq!(evaluate_launch(LaunchState::Trading, units(24), t), LaunchState::Trading);
        assert_eq!(evaluate_launch(LaunchState::Trading, units(25), t), LaunchState::Graduated);
        // Never reverts, even if reserves fall back below
        assert_eq!(evaluate_launch(LaunchState::Graduated, Amount::ZERO, t), LaunchState::Graduated);
    }

    #[test]
    fn test_seed_can_graduate() {
        let s = seeded(30);
        assert_eq!(s.launch, LaunchState::Graduated);
        assert!(conservation_ok(&s));
    }

    #[test]
    fn test_buy_credits_buyer() {
        let mut s = seeded(1);
        let trade = buy(&mut s, alice(), units(1)).unwrap();

        // 1B * 1 / (1 + 1)
        assert_eq!(trade.quote.amount_out, units(500_000_000));
        assert_eq!(s.balance_of(alice()), units(500_000_000));
        assert_eq!(s.base_reserve, units(2));
        assert!(!trade.graduated);
        assert!(conservation_ok(&s));
    }

    #[test]
    fn test_buy_after_graduation_rejected() {
        let mut s = seeded(25);
        let before = s.clone();
        assert_eq!(buy(&mut s, alice(), units(1)), Err(LaunchError::TradingClosed));
        assert_eq!(s, before);
    }

    #[test]
    fn test_buy_zero_rejected_without_change() {
        let mut s = seeded(1);
        let before = s.clone();
        assert_eq!(buy(&mut s, alice(), Amount::ZERO), Err(LaunchError::InvalidAmount));
        assert_eq!(s, before);
    }

    #[test]
    fn test_buy_unseeded_pool_would_drain() {
        let mut s = State::new(pool(), Params::default());
        let before = s.clone();
        assert_eq!(buy(&mut s, alice(), units(1)), Err(LaunchError::ArithmeticUnderflow));
        assert_eq!(s, before);
    }

    #[test]
    fn test_buy_crossing_threshold_graduates() {
        let mut s = seeded(20);
        let trade = buy(&mut s, alice(), units(5)).unwrap();
        assert!(trade.graduated);
        assert_eq!(s.launch, LaunchState::Graduated);
        assert!(s.balance_of(alice()) > Amount::ZERO);
    }

    #[test]
    fn test_sell_requires_allowance() {
        let mut s = seeded(1);
        buy(&mut s, alice(), units(1)).unwrap();
        let before = s.clone();

        let err = sell(&mut s, alice(), units(1)).unwrap_err();
        assert_eq!(
            err,
            LaunchError::InsufficientAllowance { allowance: Amount::ZERO, needed: units(1) }
        );
        assert_eq!(s, before);
    }

    #[test]
    fn test_sell_requires_balance() {
        let mut s = seeded(1);
        buy(&mut s, alice(), units(1)).unwrap();
        let held = s.balance_of(alice());
        approve(&mut s, alice(), pool(), held + units(1)).unwrap();
        let before = s.clone();

        let err = sell(&mut s, alice(), held + units(1)).unwrap_err();
        assert!(matches!(err, LaunchError::InsufficientBalance { .. }));
        assert_eq!(s, before);
    }

    #[test]
    fn test_buy_then_sell_all_round_trip() {
        let mut s = seeded(1);
        let bought = buy(&mut s, alice(), units(1)).unwrap().quote.amount_out;
        approve(&mut s, alice(), pool(), bought).unwrap();
        let trade = sell(&mut s, alice(), bought).unwrap();

        assert!(trade.quote.amount_out <= units(1));
        assert_eq!(s.balance_of(alice()), Amount::ZERO);
        assert_eq!(s.allowance(alice(), pool()), Amount::ZERO);
        assert_eq!(s.token_reserve, s.params.total_supply);
        assert!(conservation_ok(&s));
    }

    #[test]
    fn test_sell_decrements_allowance_exactly() {
        let mut s = seeded(1);
        let bought = buy(&mut s, alice(), units(1)).unwrap().quote.amount_out;
        approve(&mut s, alice(), pool(), bought).unwrap();
        sell(&mut s, alice(), units(1_000)).unwrap();
        assert_eq!(s.allowance(alice(), pool()), bought - units(1_000));
    }

    #[test]
    fn test_sell_after_graduation_follows_policy() {
        let mut s = seeded(20);
        let bought = buy(&mut s, alice(), units(10)).unwrap().quote.amount_out;
        assert!(s.launch.is_graduated());
        approve(&mut s, alice(), pool(), bought).unwrap();

        let mut closed = s.clone();
        closed.params.sells_after_graduation = SellPolicy::Closed;
        assert_eq!(sell(&mut closed, alice(), bought), Err(LaunchError::TradingClosed));

        assert!(sell(&mut s, alice(), bought).is_ok());
        // Selling never un-graduates
        assert!(s.launch.is_graduated());
    }

    #[test]
    fn test_approve_overwrites() {
        let mut s = seeded(1);
        approve(&mut s, alice(), bob(), units(5)).unwrap();
        approve(&mut s, alice(), bob(), units(2)).unwrap();
        assert_eq!(s.allowance(alice(), bob()), units(2));
        assert_eq!(approve(&mut s, alice(), Address::ZERO, units(1)), Err(LaunchError::InvalidAddress));
    }

    #[test]
    fn test_transfer_and_donation() {
        let mut s = seeded(1);
        buy(&mut s, alice(), units(1)).unwrap();

        transfer(&mut s, alice(), bob(), units(100)).unwrap();
        assert_eq!(s.balance_of(bob()), units(100));

        let reserve = s.token_reserve;
        transfer(&mut s, bob(), pool(), units(100)).unwrap();
        assert_eq!(s.token_reserve, reserve + units(100));
        assert_eq!(s.balance_of(bob()), Amount::ZERO);
        assert!(conservation_ok(&s));
    }

    #[test]
    fn test_transfer_to_self_is_noop() {
        let mut s = seeded(1);
        buy(&mut s, alice(), units(1)).unwrap();
        let before = s.clone();
        transfer(&mut s, alice(), alice(), units(7)).unwrap();
        assert_eq!(s, before);
    }

    #[test]
    fn test_pool_cannot_spend_reserve_directly() {
        let mut s = seeded(1);
        assert_eq!(transfer(&mut s, pool(), alice(), units(1)), Err(LaunchError::InvalidAddress));
    }

    #[test]
    fn test_transfer_from_consumes_allowance() {
        let mut s = seeded(1);
        buy(&mut s, alice(), units(1)).unwrap();
        approve(&mut s, alice(), bob(), units(10)).unwrap();

        transfer_from(&mut s, bob(), alice(), bob(), units(4)).unwrap();
        assert_eq!(s.allowance(alice(), bob()), units(6));
        assert_eq!(s.balance_of(bob()), units(4));

        let before = s.clone();
        assert!(matches!(
            transfer_from(&mut s, bob(), alice(), bob(), units(7)),
            Err(LaunchError::InsufficientAllowance { .. })
        ));
        assert_eq!(s, before);
    }

    #[test]
    fn test_transfer_from_failed_transfer_keeps_allowance() {
        let mut s = seeded(1);
        approve(&mut s, alice(), bob(), units(10)).unwrap();
        let before = s.clone();
        // alice holds nothing
        assert!(matches!(
            transfer_from(&mut s, bob(), alice(), bob(), units(1)),
            Err(LaunchError::InsufficientBalance { .. })
        ));
        assert_eq!(s, before);
    }

    #[test]
    fn test_preview_matches_buy() {
        let mut s = seeded(3);
        let preview = preview_buy(&s, units(2)).unwrap();
        let trade = buy(&mut s, alice(), units(2)).unwrap();
        assert_eq!(preview, trade.quote);
    }

    #[test]
    fn test_preview_matches_sell() {
        let mut s = seeded(1);
        let bought = buy(&mut s, alice(), units(1)).unwrap().quote.amount_out;
        approve(&mut s, alice(), pool(), bought).unwrap();

        let preview = preview_sell(&s, bought).unwrap();
        let trade = sell(&mut s, alice(), bought).unwrap();
        assert_eq!(preview, trade.quote);
        assert_eq!(preview.amount_out, units(1));

        // Graduated and closed: the preview fails the same way the sell would
        let mut closed = seeded(25);
        closed.params.sells_after_graduation = SellPolicy::Closed;
        assert_eq!(preview_sell(&closed, units(1)), Err(LaunchError::TradingClosed));
        assert_eq!(preview_sell(&closed, Amount::ZERO), Err(LaunchError::InvalidAmount));
    }
}
