//! The closed set of token kinds.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// A token kind. The tag is written into the type claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived credential presented on every request.
    Access,
    /// Long-lived credential that only derives access tokens.
    Refresh,
    /// Short-lived credential that carries its own renewal window.
    Sliding,
}

impl TokenKind {
    /// All kinds, in declaration order.
    pub const ALL: [TokenKind; 3] = [Self::Access, Self::Refresh, Self::Sliding];

    /// The type claim value.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
            Self::Sliding => "sliding",
        }
    }

    /// Whether revocation hooks apply to this kind.
    pub fn is_revocable(&self) -> bool {
        matches!(self, Self::Refresh | Self::Sliding)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for TokenKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "access" => Ok(Self::Access),
            "refresh" => Ok(Self::Refresh),
            "sliding" => Ok(Self::Sliding),
            other => Err(format!("Unknown token kind: '{other}'")),
        }
    }
}

/// A kind together with the lifetime it is minted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenVariant {
    /// The token kind.
    pub kind: TokenKind,
    /// Default expiry window.
    pub lifetime: Duration,
}

impl TokenVariant {
    /// Pairs a kind with a lifetime.
    pub fn new(kind: TokenKind, lifetime: Duration) -> Self {
        Self { kind, lifetime }
    }

    /// Whether tokens of this variant can be constructed at all.
    pub fn is_well_formed(&self) -> bool {
        !self.kind.tag().is_empty() && self.lifetime > Duration::zero()
    }
}
