//! Key builders for every ledger entry.
//!
//! Keys are relative; the Redis client applies the configured prefix.

use tokensmith_core::types::UserId;

/// Key holding the serialized outstanding record of a token.
pub fn outstanding(jti: &str) -> String {
    format!("outstanding:{jti}")
}

/// Key of the set of token ids issued to a user.
///
/// The id shape is part of the key: integer `7` and string `"7"` are
/// different principals.
pub fn user_tokens(user: &UserId) -> String {
    match user {
        UserId::Int(id) => format!("user:i:{id}"),
        UserId::Str(id) => format!("user:s:{id}"),
    }
}

/// Pattern matching every per-user token set.
pub fn user_tokens_pattern() -> &'static str {
    "user:*"
}

/// Key marking a token id as blacklisted.
pub fn blacklisted(jti: &str) -> String {
    format!("blacklist:{jti}")
}
