//! Core traits defined in `tokensmith-core` and implemented by other crates.

pub mod backend;
pub mod clock;
pub mod ledger;

pub use backend::TokenBackend;
pub use clock::{Clock, FixedClock, SystemClock};
pub use ledger::RevocationLedger;
