//! Swap receipts and pool events - written by the pool, read by collaborators

use crate::types::{Address, Amount, Side};
use serde::{Deserialize, Serialize};

/// Per-swap summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReceipt {
    /// Pool sequence number at time of commit
    pub seqno: u64,
    pub side: Side,
    pub trader: Address,
    /// Gross input (base for buys, tokens for sells)
    pub amount_in: Amount,
    /// Portion of the input retained by the pool as fee
    pub fee: Amount,
    /// Output credited to the trader
    pub amount_out: Amount,
    pub token_reserve_after: Amount,
    pub base_reserve_after: Amount,
}

impl SwapReceipt {
    /// Average execution price, base per token at 1e18 scale. Zero if the
    /// token leg is zero.
    pub fn avg_price(&self) -> Amount {
        let (base, tokens) = match self.side {
            Side::Buy => (self.amount_in, self.amount_out),
            Side::Sell => (self.amount_out, self.amount_in),
        };
        if tokens.is_zero() {
            return Amount::ZERO;
        }
        base.checked_mul(crate::types::WAD)
            .map(|scaled| scaled / tokens)
            .unwrap_or(Amount::MAX)
    }
}

/// Events appended by successful pool calls, in commit order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PoolEvent {
    /// Initial base payment merged into reserves at construction
    Seeded { from: Address, amount: Amount },
    Swap(SwapReceipt),
    Approval { owner: Address, spender: Address, amount: Amount },
    Transfer { from: Address, to: Address, amount: Amount },
    /// Launch latched into the graduated state
    Graduated { seqno: u64, base_reserve: Amount },
}
