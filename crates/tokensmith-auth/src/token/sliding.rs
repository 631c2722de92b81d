//! In-place renewal of sliding tokens.

use tokensmith_core::error::AppError;
use tokensmith_core::result::AppResult;
use tokensmith_core::types::claims::EXP_CLAIM;

use super::kind::TokenKind;
use super::lifecycle::Token;

impl Token {
    /// Pushes `exp` forward by the sliding lifetime, measured from this
    /// token's captured time.
    ///
    /// Fails with a token error once the renewal boundary has passed; the
    /// client must then obtain a new token from scratch.
    pub fn renew_sliding(&mut self) -> AppResult<()> {
        if self.kind() != TokenKind::Sliding {
            return Err(AppError::configuration(format!(
                "Only sliding tokens renew in place, not '{}'",
                self.kind()
            )));
        }

        let boundary = self.engine().settings().sliding_refresh_exp_claim.clone();
        self.check_exp(&boundary, None)?;
        self.set_exp(EXP_CLAIM, None, None)
    }
}
