//! # tokensmith-auth
//!
//! The token lifecycle engine.
//!
//! ## Modules
//!
//! - `jwt`: HMAC JWT backend built on `jsonwebtoken`
//! - `token`: token kinds, the construction/decoding state machine, claim
//!   access, expiry primitives, refresh → access derivation and sliding
//!   renewal
//! - `issuer`: issuance/validation entry points, with or without the
//!   revocation ledger hooks

pub mod issuer;
pub mod jwt;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;

pub use issuer::{LedgerIssuer, RevocationAware, TokenIssuer, TokenPair, build_issuer};
pub use jwt::JwtBackend;
pub use token::{Token, TokenEngine, TokenKind, TokenVariant};
