//! Pool instructions - buy, sell, approve, transfer, transfer_from

use crate::host::BaseTransfer;
use crate::state::LaunchPool;
use curve_model::{transitions, Snapshot};
use fairlaunch_common::{Address, Amount, LaunchError, LaunchResult, PoolEvent, Side, SwapReceipt};

/// Swap attached base for tokens
pub fn process_swap_base_for_tokens(
    pool: &mut LaunchPool,
    caller: Address,
    amount_in: Amount,
) -> LaunchResult<SwapReceipt> {
    let trade = transitions::buy(&mut pool.state, caller, amount_in)?;
    Ok(pool.record_swap(Side::Buy, caller, &trade))
}

/// Swap tokens for base, paying out through the host after the ledger is final
pub fn process_swap_tokens_for_base<H: BaseTransfer + ?Sized>(
    pool: &mut LaunchPool,
    caller: Address,
    amount_in: Amount,
    host: &mut H,
) -> LaunchResult<SwapReceipt> {
    let spender = pool.address();
    let snapshot = Snapshot::capture(&pool.state, &[caller], &[(caller, spender)]);

    let trade = transitions::sell(&mut pool.state, caller, amount_in)?;

    // Reserves, balance and allowance are already updated; value leaves last
    if let Err(reason) = host.send_base(caller, trade.quote.amount_out, &pool.state) {
        snapshot.restore(&mut pool.state);
        log::warn!("sell by {} reverted: base transfer failed: {}", caller, reason);
        return Err(LaunchError::TransferFailed { to: caller, reason });
    }

    Ok(pool.record_swap(Side::Sell, caller, &trade))
}

/// Overwrite `caller`'s allowance to `spender`
pub fn process_approve(
    pool: &mut LaunchPool,
    caller: Address,
    spender: Address,
    amount: Amount,
) -> LaunchResult<()> {
    transitions::approve(&mut pool.state, caller, spender, amount)?;
    pool.bump_seqno();
    pool.events.push(PoolEvent::Approval { owner: caller, spender, amount });
    Ok(())
}

pub fn process_transfer(
    pool: &mut LaunchPool,
    caller: Address,
    to: Address,
    amount: Amount,
) -> LaunchResult<()> {
    transitions::transfer(&mut pool.state, caller, to, amount)?;
    pool.bump_seqno();
    pool.events.push(PoolEvent::Transfer { from: caller, to, amount });
    Ok(())
}

/// Delegated transfer by `caller` out of `from`
pub fn process_transfer_from(
    pool: &mut LaunchPool,
    caller: Address,
    from: Address,
    to: Address,
    amount: Amount,
) -> LaunchResult<()> {
    transitions::transfer_from(&mut pool.state, caller, from, to, amount)?;
    pool.bump_seqno();
    pool.events.push(PoolEvent::Transfer { from, to, amount });
    Ok(())
}
