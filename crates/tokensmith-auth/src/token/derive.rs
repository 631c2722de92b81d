//! Refresh → access derivation.

use tracing::debug;

use tokensmith_core::error::AppError;
use tokensmith_core::result::AppResult;
use tokensmith_core::types::claims::EXP_CLAIM;

use super::kind::TokenKind;
use super::lifecycle::Token;

impl Token {
    /// Mints an access token from this refresh token.
    ///
    /// The access `exp` is computed from this token's captured time, so a
    /// refresh/access pair minted together expires relative to the same
    /// instant. Every claim except the type claim, `exp` and `jti` is copied.
    /// This token is left untouched.
    pub fn derive_access(&self) -> AppResult<Token> {
        if self.kind() != TokenKind::Refresh {
            return Err(AppError::configuration(format!(
                "Only refresh tokens derive access tokens, not '{}'",
                self.kind()
            )));
        }

        let mut access = self.engine().create(TokenKind::Access)?;
        access.set_exp(EXP_CLAIM, Some(self.current_time()), None)?;

        // The well-known claims live outside `extra`, so this is exactly the
        // payload minus the exclusion set.
        for (claim, value) in self.claims().extra() {
            access.set(claim, value.clone())?;
        }

        debug!(refresh_jti = ?self.jti(), access_jti = ?access.jti(), "Derived access token");
        Ok(access)
    }
}
