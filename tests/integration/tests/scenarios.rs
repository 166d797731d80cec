//! Whole-session scenarios: multi-trader launches, graduation and round trips

use fairlaunch_common::units;
use fairlaunch_integration_tests::*;
use fairlaunch_pool::{Amount, LaunchError, Params, SellPolicy};

/// 0.0001 units
fn dust() -> Amount {
    units(1) / Amount::from(10_000u64)
}

#[test]
fn test_four_traders_until_graduation() {
    let mut ctx = TestContext::deploy(5).unwrap();
    let (u2, u3, u4) = (user(2), user(3), user(4));
    ctx.fund(&[u2, u3, u4]).unwrap();

    ctx.buy(u2, units(10)).unwrap();
    ctx.buy(u3, units(3)).unwrap();
    ctx.sell_half(u2).unwrap();
    ctx.buy(u4, units(10)).unwrap();
    ctx.buy(u3, units(6)).unwrap();
    ctx.print_state("before crossing", &[u2, u3, u4]);

    // About 24.18 units in the pool, still below 25
    assert!(!ctx.pool.get_launch_status());
    assert!(ctx.pool.get_base_reserve() < units(25));
    assert!(ctx.pool.get_base_reserve() > units(24));

    ctx.buy(u2, units(2)).unwrap();
    ctx.print_state("after crossing", &[u2, u3, u4]);
    assert!(ctx.pool.get_launch_status());

    let u3_base = ctx.base(u3);
    assert_eq!(ctx.buy(u3, units(2)), Err(LaunchError::TradingClosed));
    assert_eq!(ctx.base(u3), u3_base);

    ctx.check_conservation().unwrap();
}

#[test]
fn test_single_unit_buys_graduate_on_the_24th() {
    let mut ctx = TestContext::deploy(1).unwrap();
    let u2 = user(2);
    ctx.fund(&[u2]).unwrap();

    for i in 1..=24 {
        ctx.buy(u2, units(1)).unwrap();
        assert_eq!(ctx.pool.get_launch_status(), i == 24, "buy {}", i);
    }
    assert_eq!(ctx.pool.get_base_reserve(), units(25));

    assert_eq!(ctx.buy(u2, units(1)), Err(LaunchError::TradingClosed));
    ctx.check_conservation().unwrap();
}

#[test]
fn test_buy_then_sell_everything_back() {
    let mut ctx = TestContext::deploy(1).unwrap();
    let u2 = user(2);
    ctx.fund(&[u2]).unwrap();

    let bought = ctx.buy(u2, units(1)).unwrap();
    assert_eq!(bought, units(500_000_000));

    let returned = ctx.sell_all(u2).unwrap();
    assert_eq!(returned, units(1));
    assert!(ctx.tokens(u2) < dust());
    assert_eq!(ctx.base(u2), units(100));
    assert_eq!(ctx.pool.allowance(u2, ctx.pool.address()), Amount::ZERO);

    ctx.check_conservation().unwrap();
}

#[test]
fn test_repeated_cycles_never_drift() {
    let mut ctx = TestContext::deploy(1).unwrap();
    let (u2, u3) = (user(2), user(3));
    ctx.fund(&[u2, u3]).unwrap();

    for round in 0..5 {
        ctx.buy(u2, units(1)).unwrap();
        ctx.buy(u3, units(2)).unwrap();
        ctx.sell_all(u2).unwrap();
        ctx.sell_all(u3).unwrap();

        assert!(ctx.tokens(u2) < dust(), "round {}", round);
        assert!(ctx.tokens(u3) < dust(), "round {}", round);
        assert_eq!(ctx.pool.get_token_reserve(), ctx.pool.total_supply());
        ctx.check_conservation().unwrap();
    }
    // No trader ends up with more base than they started with
    assert!(ctx.base(u2) + ctx.base(u3) <= units(2 * STARTING_BASE_UNITS));
}

#[test]
fn test_zero_amounts_change_nothing() {
    let mut ctx = TestContext::deploy(1).unwrap();
    let u2 = user(2);
    ctx.fund(&[u2]).unwrap();
    ctx.buy(u2, units(1)).unwrap();
    let before = ctx.pool.ledger().clone();

    assert_eq!(ctx.buy(u2, Amount::ZERO), Err(LaunchError::InvalidAmount));
    assert_eq!(
        ctx.pool.swap_tokens_for_base(u2, Amount::ZERO, &mut ctx.ledger),
        Err(LaunchError::InvalidAmount)
    );
    assert_eq!(ctx.pool.ledger(), &before);
    assert_eq!(ctx.base(u2), units(STARTING_BASE_UNITS - 1));
}

#[test]
fn test_fee_stays_in_pool() {
    let params = Params { fee_bps: 100, ..Params::default() };
    let mut ctx = TestContext::deploy_with(units(1), params).unwrap();
    let u2 = user(2);
    ctx.fund(&[u2]).unwrap();

    ctx.buy(u2, units(1)).unwrap();
    let returned = ctx.sell_all(u2).unwrap();
    assert!(returned < units(1));
    assert!(ctx.pool.get_base_reserve() > units(1));
    ctx.check_conservation().unwrap();
}

#[test]
fn test_sells_after_graduation_follow_policy() {
    for policy in [SellPolicy::Open, SellPolicy::Closed] {
        let params = Params { sells_after_graduation: policy, ..Params::default() };
        let mut ctx = TestContext::deploy_with(units(20), params).unwrap();
        let u2 = user(2);
        ctx.fund(&[u2]).unwrap();

        ctx.buy(u2, units(5)).unwrap();
        assert!(ctx.pool.get_launch_status());

        let result = ctx.sell_all(u2);
        match policy {
            SellPolicy::Open => assert!(result.is_ok()),
            SellPolicy::Closed => assert_eq!(result, Err(LaunchError::TradingClosed)),
        }
        // Graduation holds even after base leaves through a sell
        assert!(ctx.pool.get_launch_status());
        ctx.check_conservation().unwrap();
    }
}
