//! Error taxonomy for pool calls
//!
//! Every variant aborts the whole call; the pool is left exactly as it was
//! before the call began.

use crate::types::{Address, Amount};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    #[error("amount must be non-zero and produce a non-zero output")]
    InvalidAmount,

    #[error("insufficient allowance: have {allowance}, need {needed}")]
    InsufficientAllowance { allowance: Amount, needed: Amount },

    #[error("insufficient balance: have {balance}, need {needed}")]
    InsufficientBalance { balance: Amount, needed: Amount },

    #[error("trading closed: launch has graduated")]
    TradingClosed,

    #[error("arithmetic underflow")]
    ArithmeticUnderflow,

    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    #[error("invalid address")]
    InvalidAddress,

    #[error("base transfer to {to} failed: {reason}")]
    TransferFailed { to: Address, reason: String },

    #[error("invalid instruction data")]
    InvalidInstruction,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type LaunchResult<T> = Result<T, LaunchError>;
