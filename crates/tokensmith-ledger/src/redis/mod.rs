//! Redis revocation ledger.

pub mod client;
pub mod operations;

pub use client::RedisClient;
pub use operations::RedisLedger;
