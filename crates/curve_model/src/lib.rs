//! Pure ledger model for the bonding-curve launch pool
//! No host dependencies, no unwrap/panic, every fallible step checked

pub mod state;
pub mod math;
pub mod curve;
pub mod guard;
pub mod helpers;
pub mod transitions;

// Re-export commonly used types
pub use state::*;
pub use curve::*;
pub use helpers::*;
pub use transitions::*;
