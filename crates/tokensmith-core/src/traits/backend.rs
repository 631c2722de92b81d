//! Signing/verification boundary.

use crate::result::AppResult;
use crate::types::RawClaims;

/// Turns a claims mapping into a compact signed string and back.
///
/// A backend checks the signature and the structural well-formedness of the
/// container only. It never interprets claim semantics such as expiry or
/// token type.
pub trait TokenBackend: Send + Sync + std::fmt::Debug + 'static {
    /// Sign `claims`. Deterministic for identical claims and key.
    fn encode(&self, claims: &RawClaims) -> AppResult<String>;

    /// Verify `token` and return its claims.
    ///
    /// Every verification failure is reported as the same generic token
    /// rejection.
    fn decode(&self, token: &str) -> AppResult<RawClaims>;
}
