//! # tokensmith-core
//!
//! Core crate for Tokensmith. Contains the seam traits (token backend,
//! revocation ledger, clock), configuration schemas, the typed claim model,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other Tokensmith crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind, TokenRejection};
pub use result::AppResult;
