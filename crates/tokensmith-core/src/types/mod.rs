//! Shared domain types: the typed claim set, principal identifiers and
//! ledger records.

pub mod claims;
pub mod outstanding;
pub mod user;

pub use claims::{Claims, RawClaims};
pub use outstanding::OutstandingToken;
pub use user::UserId;
