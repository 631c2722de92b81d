//! Token kinds and the construction/decoding state machine.

pub mod derive;
pub mod engine;
pub mod kind;
pub mod lifecycle;
pub mod sliding;

pub use self::engine::TokenEngine;
pub use self::kind::{TokenKind, TokenVariant};
pub use self::lifecycle::Token;
