//! Shared issuance context: settings, backend and clock.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use tokensmith_core::config::TokenSettings;
use tokensmith_core::result::AppResult;
use tokensmith_core::traits::{Clock, SystemClock, TokenBackend};
use tokensmith_core::types::UserId;

use super::kind::{TokenKind, TokenVariant};
use super::lifecycle::Token;
use crate::jwt::JwtBackend;

/// Everything a token needs besides its own payload.
///
/// Cheap to clone; every [`Token`] keeps a handle so it can sign itself.
#[derive(Clone)]
pub struct TokenEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    settings: TokenSettings,
    backend: Arc<dyn TokenBackend>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TokenEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenEngine")
            .field("backend", &self.inner.backend)
            .field("clock", &self.inner.clock)
            .finish()
    }
}

impl TokenEngine {
    /// Creates an engine from explicit collaborators.
    pub fn new(
        settings: TokenSettings,
        backend: Arc<dyn TokenBackend>,
        clock: Arc<dyn Clock>,
    ) -> AppResult<Self> {
        settings.validate()?;
        Ok(Self {
            inner: Arc::new(EngineInner {
                settings,
                backend,
                clock,
            }),
        })
    }

    /// Creates an engine signing with a [`JwtBackend`] on the wall clock.
    pub fn from_settings(settings: TokenSettings) -> AppResult<Self> {
        let backend = Arc::new(JwtBackend::new(&settings)?);
        Self::new(settings, backend, Arc::new(SystemClock))
    }

    /// The token settings.
    pub fn settings(&self) -> &TokenSettings {
        &self.inner.settings
    }

    /// The signing backend.
    pub fn backend(&self) -> &dyn TokenBackend {
        self.inner.backend.as_ref()
    }

    /// Reads the time source.
    pub fn now(&self) -> DateTime<Utc> {
        self.inner.clock.now()
    }

    /// The configured variant for `kind`.
    pub fn variant(&self, kind: TokenKind) -> TokenVariant {
        let settings = &self.inner.settings;
        let lifetime = match kind {
            TokenKind::Access => settings.access_lifetime(),
            TokenKind::Refresh => settings.refresh_lifetime(),
            TokenKind::Sliding => settings.sliding_lifetime(),
        };
        TokenVariant::new(kind, lifetime)
    }

    /// Mints a fresh token of `kind`.
    pub fn create(&self, kind: TokenKind) -> AppResult<Token> {
        Token::construct(self, self.variant(kind), None)
    }

    /// Verifies and validates `encoded` as a token of `kind`.
    pub fn decode(&self, kind: TokenKind, encoded: &str) -> AppResult<Token> {
        Token::construct(self, self.variant(kind), Some(encoded))
    }

    /// Mints a fresh token of `kind` bound to `user`.
    pub fn for_user(&self, kind: TokenKind, user: impl Into<UserId>) -> AppResult<Token> {
        let user = user.into();
        let mut token = self.create(kind)?;
        let claim = self.inner.settings.user_id_claim.clone();
        token.set(&claim, user.to_claim())?;
        Ok(token)
    }
}
