//! Shared types for the fair-launch pool: amounts, errors, instruction
//! decoding helpers and the receipts/events a pool emits.

pub mod types;
pub mod error;
pub mod instruction;
pub mod receipt;

pub use types::*;
pub use error::*;
pub use instruction::*;
pub use receipt::*;
