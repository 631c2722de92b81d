//! Principal identifiers bound into tokens.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// The identifier of the principal a token is issued for.
///
/// Integer identifiers stay integers in the user-id claim; every other kind
/// of identifier is carried as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    /// Numeric primary key.
    Int(i64),
    /// Any other identifier, rendered as text.
    Str(String),
}

impl UserId {
    /// Parses operator input: all-digit input becomes [`UserId::Int`].
    pub fn parse(input: &str) -> Self {
        input
            .parse::<i64>()
            .map(Self::Int)
            .unwrap_or_else(|_| Self::Str(input.to_string()))
    }

    /// Reads a user id back out of a claim value.
    pub fn from_claim(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Int),
            Value::String(s) => Some(Self::Str(s.clone())),
            _ => None,
        }
    }

    /// The claim value for this identifier.
    pub fn to_claim(&self) -> Value {
        match self {
            Self::Int(id) => Value::from(*id),
            Self::Str(id) => Value::String(id.clone()),
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for UserId {
    fn from(id: i32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<u32> for UserId {
    fn from(id: u32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::Str(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self::Str(id)
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self::Str(id.to_string())
    }
}
