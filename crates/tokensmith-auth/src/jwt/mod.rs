//! JWT signing and verification.

pub mod backend;

pub use backend::JwtBackend;
