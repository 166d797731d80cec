//! Fair-launch integration tests
//!
//! Drives a deployed pool through whole trading sessions: traders are funded
//! with base on a `NativeLedger`, buy and sell through the public pool API
//! and every step can be checked against the supply and base ledgers.

pub mod harness;

pub use harness::*;
