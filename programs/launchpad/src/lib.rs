//! Fair-launch pool - bonding-curve token swap with one-way graduation
//!
//! A single pool mints a fixed token supply into its reserve and trades it
//! against a base currency on a constant-product curve (x·y=k):
//! - Buys credit tokens and re-evaluate the launch latch
//! - Sells pull tokens through an allowance and pay base out via the host
//! - Once the base reserve reaches the threshold the launch graduates and
//!   buys close for good

pub mod entrypoint;
pub mod host;
pub mod instructions;
pub mod state;

pub use entrypoint::{process_instruction, Instruction, Outcome};
pub use host::{BaseTransfer, NativeLedger};
pub use state::*;

pub use curve_model::{LaunchState, Params, Quote, SellPolicy};
pub use fairlaunch_common::{Address, Amount, LaunchError, LaunchResult, PoolEvent, SwapReceipt};
