//! # tokensmith-ledger
//!
//! Revocation ledger implementations for Tokensmith. Supports two modes:
//!
//! - **memory**: In-process ledger using [dashmap](https://crates.io/crates/dashmap)
//! - **redis**: Redis-backed ledger using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime based on configuration.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::LedgerManager;
