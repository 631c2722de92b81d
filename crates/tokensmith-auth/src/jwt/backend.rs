//! HMAC JWT backend.

use std::str::FromStr;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use tokensmith_core::config::TokenSettings;
use tokensmith_core::error::{AppError, TokenRejection};
use tokensmith_core::result::AppResult;
use tokensmith_core::traits::TokenBackend;
use tokensmith_core::types::RawClaims;

/// Signs and verifies compact JWTs with a shared secret.
///
/// Only the signature and the JWT container are checked here. `exp`, `nbf`
/// and `aud` validation are switched off because claim semantics belong to
/// the token core.
#[derive(Clone)]
pub struct JwtBackend {
    /// HMAC key for signing.
    encoding_key: EncodingKey,
    /// HMAC key for verification.
    decoding_key: DecodingKey,
    /// Header stamped on every token.
    header: Header,
    /// Signature-only validation.
    validation: Validation,
}

impl std::fmt::Debug for JwtBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtBackend")
            .field("algorithm", &self.header.alg)
            .finish()
    }
}

impl JwtBackend {
    /// Creates a backend from token settings.
    pub fn new(settings: &TokenSettings) -> AppResult<Self> {
        let algorithm = Algorithm::from_str(&settings.algorithm).map_err(|e| {
            AppError::configuration(format!(
                "Unknown signing algorithm '{}': {e}",
                settings.algorithm
            ))
        })?;

        Ok(Self::from_secret(settings.signing_key.as_bytes(), algorithm))
    }

    /// Creates a backend from a raw secret.
    pub fn from_secret(secret: &[u8], algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            header: Header::new(algorithm),
            validation,
        }
    }
}

impl TokenBackend for JwtBackend {
    fn encode(&self, claims: &RawClaims) -> AppResult<String> {
        encode(&self.header, claims, &self.encoding_key)
            .map_err(|e| AppError::configuration(format!("Failed to sign token: {e}")))
    }

    fn decode(&self, token: &str) -> AppResult<RawClaims> {
        decode::<RawClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(reason = ?e.kind(), "JWT verification failed");
                AppError::token(TokenRejection::Invalid)
            })
    }
}
