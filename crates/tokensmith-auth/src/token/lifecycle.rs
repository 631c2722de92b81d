//! Token construction, validation and claim access.
//!
//! A token is built in one of two ways:
//!
//! 1. **Fresh**: no encoded string. The type claim and a new `jti` are
//!    stamped and `exp` is computed from the captured time and the variant
//!    lifetime. Sliding tokens also get their renewal boundary.
//! 2. **Decoded**: the backend verifies the signature, then `exp`, the type
//!    claim and `jti` are checked in that order. The first failure rejects
//!    the whole token.
//!
//! Once constructed, claims can be read and mutated freely. Every call to
//! [`Token::encode`] signs the payload as it is at that moment.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use tokensmith_core::error::{AppError, TokenRejection};
use tokensmith_core::result::AppResult;
use tokensmith_core::types::claims::{EXP_CLAIM, JTI_CLAIM, timestamp_from_value};
use tokensmith_core::types::{Claims, RawClaims};

use super::engine::TokenEngine;
use super::kind::{TokenKind, TokenVariant};

/// A validated or freshly minted token.
#[derive(Clone)]
pub struct Token {
    engine: TokenEngine,
    variant: TokenVariant,
    claims: Claims,
    current_time: DateTime<Utc>,
    encoded: Option<String>,
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.claims.to_raw(), f)
    }
}

impl Token {
    /// Builds a token of `variant`, fresh when `encoded` is `None` and
    /// decoded otherwise.
    ///
    /// # Errors
    ///
    /// A configuration error if the variant has no lifetime; a token error
    /// if `encoded` fails verification or validation.
    pub fn construct(
        engine: &TokenEngine,
        variant: TokenVariant,
        encoded: Option<&str>,
    ) -> AppResult<Self> {
        if !variant.is_well_formed() {
            return Err(AppError::configuration(
                "Cannot create token with no type or lifetime",
            ));
        }

        let current_time = engine.now();
        let type_claim = engine.settings().token_type_claim.as_str();

        match encoded {
            None => {
                let mut claims = Claims::new(type_claim);
                claims.set_token_type(variant.kind.tag());
                claims.set_jti(new_jti());

                let mut token = Self {
                    engine: engine.clone(),
                    variant,
                    claims,
                    current_time,
                    encoded: None,
                };
                token.set_exp(EXP_CLAIM, None, None)?;

                if variant.kind == TokenKind::Sliding {
                    let settings = engine.settings();
                    token.set_exp(
                        &settings.sliding_refresh_exp_claim,
                        None,
                        Some(settings.sliding_refresh_lifetime()),
                    )?;
                }

                debug!(kind = %variant.kind, jti = ?token.jti(), "Minted token");
                Ok(token)
            }
            Some(encoded) => {
                let raw = engine.backend().decode(encoded)?;
                let claims = Claims::from_raw(raw, type_claim);

                let token = Self {
                    engine: engine.clone(),
                    variant,
                    claims,
                    current_time,
                    encoded: Some(encoded.to_string()),
                };

                if let Err(e) = token.validate() {
                    debug!(kind = %variant.kind, reason = %e.message, "Rejected token");
                    return Err(e);
                }
                Ok(token)
            }
        }
    }

    fn validate(&self) -> AppResult<()> {
        self.check_exp(EXP_CLAIM, None)?;

        match self.claims.token_type() {
            Some(tag) if tag == self.variant.kind.tag() => {}
            None if !self.claims.is_malformed(self.claims.type_claim()) => {
                return Err(AppError::token(TokenRejection::NoType));
            }
            _ => return Err(AppError::token(TokenRejection::WrongType)),
        }

        if self.claims.jti().is_none() {
            let rejection = if self.claims.is_malformed(JTI_CLAIM) {
                TokenRejection::Invalid
            } else {
                TokenRejection::NoId
            };
            return Err(AppError::token(rejection));
        }

        Ok(())
    }

    /// Stores `from_time + lifetime` as epoch seconds under `claim`.
    ///
    /// `from_time` defaults to the captured construction time and `lifetime`
    /// to the variant lifetime.
    pub fn set_exp(
        &mut self,
        claim: &str,
        from_time: Option<DateTime<Utc>>,
        lifetime: Option<Duration>,
    ) -> AppResult<()> {
        let from_time = from_time.unwrap_or(self.current_time);
        let lifetime = lifetime.unwrap_or(self.variant.lifetime);
        let expires = from_time
            .checked_add_signed(lifetime)
            .ok_or_else(|| AppError::validation(format!("Claim '{claim}' is out of range")))?;
        self.claims.set(claim, Value::from(expires.timestamp()))
    }

    /// Fails unless the timestamp in `claim` is strictly after `current_time`
    /// (the captured construction time by default).
    pub fn check_exp(&self, claim: &str, current_time: Option<DateTime<Utc>>) -> AppResult<()> {
        let current_time = current_time.unwrap_or(self.current_time);

        let value = self
            .claims
            .get(claim)
            .ok_or_else(|| AppError::token(TokenRejection::MissingClaim(claim.to_string())))?;
        let claim_time = timestamp_from_value(&value)
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .ok_or_else(|| AppError::token(TokenRejection::Invalid))?;

        if claim_time <= current_time {
            return Err(AppError::token(TokenRejection::Expired(claim.to_string())));
        }
        Ok(())
    }

    /// Signs the current payload.
    pub fn encode(&self) -> AppResult<String> {
        self.engine.backend().encode(&self.claims.to_raw())
    }

    /// Reads a claim.
    pub fn get(&self, claim: &str) -> Option<Value> {
        self.claims.get(claim)
    }

    /// Writes a claim. No validation is re-run.
    pub fn set(&mut self, claim: &str, value: impl Into<Value>) -> AppResult<()> {
        self.claims.set(claim, value.into())
    }

    /// Removes a claim, returning its previous value.
    pub fn delete(&mut self, claim: &str) -> Option<Value> {
        self.claims.remove(claim)
    }

    /// Whether a claim is present.
    pub fn contains(&self, claim: &str) -> bool {
        self.claims.contains(claim)
    }

    /// The typed payload.
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// The payload as a flat mapping.
    pub fn payload(&self) -> RawClaims {
        self.claims.to_raw()
    }

    /// The token kind.
    pub fn kind(&self) -> TokenKind {
        self.variant.kind
    }

    /// The variant lifetime.
    pub fn lifetime(&self) -> Duration {
        self.variant.lifetime
    }

    /// The time captured at construction.
    pub fn current_time(&self) -> DateTime<Utc> {
        self.current_time
    }

    /// The token id.
    pub fn jti(&self) -> Option<&str> {
        self.claims.jti()
    }

    /// When `exp` runs out.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims.expires_at()
    }

    /// The string this token was decoded from; `None` for fresh tokens.
    pub fn encoded(&self) -> Option<&str> {
        self.encoded.as_deref()
    }

    pub(crate) fn engine(&self) -> &TokenEngine {
        &self.engine
    }
}

/// A 128-bit random id as 32 lowercase hex characters.
fn new_jti() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::{T0, engine_at, epoch, settings};
    use tokensmith_core::config::TokenSettings;
    use tokensmith_core::error::ErrorKind;

    #[test]
    fn test_variant_without_lifetime_is_configuration_error() {
        let (engine, _) = engine_at(T0);
        let variant = TokenVariant::new(TokenKind::Access, Duration::zero());
        let err = Token::construct(&engine, variant, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);

        // Checked before the string is even looked at.
        let err = Token::construct(&engine, variant, Some("garbage")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_unrepresentable_lifetime_is_configuration_error() {
        let settings = TokenSettings {
            access_lifetime_seconds: i64::MAX,
            ..settings()
        };
        let err = TokenEngine::from_settings(settings).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_lifetime_past_calendar_end_is_refused() {
        let (engine, _) = engine_at(T0);
        let variant = TokenVariant::new(TokenKind::Access, Duration::days(100_000_000));
        let err = Token::construct(&engine, variant, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_fresh_token_has_exactly_base_claims() {
        let (engine, _) = engine_at(T0);
        for kind in [TokenKind::Access, TokenKind::Refresh] {
            let token = engine.create(kind).unwrap();
            assert_eq!(token.claims().names(), vec!["token_type", "jti", "exp"]);
            assert_eq!(token.get("token_type"), Some(json!(kind.tag())));
            assert!(token.encoded().is_none());
        }
    }

    #[test]
    fn test_fresh_exp_is_relative_to_captured_time() {
        let (engine, _) = engine_at(T0);
        let token = engine.create(TokenKind::Access).unwrap();
        assert_eq!(token.current_time(), epoch(T0));
        assert_eq!(token.get("exp"), Some(json!(T0 + 300)));
    }

    #[test]
    fn test_jti_is_unique_hex() {
        let (engine, _) = engine_at(T0);
        let a = engine.create(TokenKind::Access).unwrap();
        let b = engine.create(TokenKind::Access).unwrap();
        let jti = a.jti().unwrap();
        assert_eq!(jti.len(), 32);
        assert!(jti.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(a.jti(), b.jti());
    }

    #[test]
    fn test_roundtrip_preserves_payload_for_every_kind() {
        let (engine, _) = engine_at(T0);
        for kind in TokenKind::ALL {
            let mut token = engine.create(kind).unwrap();
            token.set("some_value", "arst").unwrap();
            let encoded = token.encode().unwrap();

            let decoded = engine.decode(kind, &encoded).unwrap();
            assert_eq!(decoded.claims(), token.claims());
            assert_eq!(decoded.encoded(), Some(encoded.as_str()));
        }
    }

    #[test]
    fn test_exp_equal_to_now_is_expired() {
        let (engine, _) = engine_at(T0);
        let mut token = engine.create(TokenKind::Access).unwrap();
        token.set_exp("exp", None, Some(Duration::zero())).unwrap();
        let encoded = token.encode().unwrap();

        let err = engine.decode(TokenKind::Access, &encoded).unwrap_err();
        assert_eq!(
            err.rejection(),
            Some(&TokenRejection::Expired("exp".into()))
        );
    }

    #[test]
    fn test_exp_one_second_ahead_is_accepted() {
        let (engine, _) = engine_at(T0);
        let mut token = engine.create(TokenKind::Access).unwrap();
        token.set_exp("exp", None, Some(Duration::seconds(1))).unwrap();
        let encoded = token.encode().unwrap();

        assert!(engine.decode(TokenKind::Access, &encoded).is_ok());
    }

    #[test]
    fn test_token_expires_as_clock_moves() {
        let (engine, clock) = engine_at(T0);
        let encoded = engine.create(TokenKind::Access).unwrap().encode().unwrap();

        clock.advance(Duration::seconds(299));
        assert!(engine.decode(TokenKind::Access, &encoded).is_ok());

        clock.advance(Duration::seconds(1));
        let err = engine.decode(TokenKind::Access, &encoded).unwrap_err();
        assert_eq!(err.message, "Token 'exp' claim has expired");
    }

    #[test]
    fn test_access_token_presented_as_refresh_is_wrong_type() {
        let (engine, _) = engine_at(T0);
        let encoded = engine.create(TokenKind::Access).unwrap().encode().unwrap();
        let err = engine.decode(TokenKind::Refresh, &encoded).unwrap_err();
        assert_eq!(err.rejection(), Some(&TokenRejection::WrongType));
    }

    #[test]
    fn test_missing_claims_fail_with_matching_condition() {
        let (engine, _) = engine_at(T0);
        let cases = [
            ("exp", TokenRejection::MissingClaim("exp".into())),
            ("token_type", TokenRejection::NoType),
            ("jti", TokenRejection::NoId),
        ];

        for (claim, expected) in cases {
            let mut token = engine.create(TokenKind::Refresh).unwrap();
            assert!(token.delete(claim).is_some());
            let encoded = token.encode().unwrap();

            let err = engine.decode(TokenKind::Refresh, &encoded).unwrap_err();
            assert_eq!(err.rejection(), Some(&expected), "removing {claim}");
        }
    }

    #[test]
    fn test_checks_run_in_order() {
        let (engine, _) = engine_at(T0);
        let mut token = engine.create(TokenKind::Access).unwrap();
        token.set("token_type", "wrong_type").unwrap();
        token.delete("jti");
        token.set_exp("exp", None, Some(Duration::seconds(-1))).unwrap();
        let encoded = token.encode().unwrap();

        let err = engine.decode(TokenKind::Access, &encoded).unwrap_err();
        assert_eq!(
            err.rejection(),
            Some(&TokenRejection::Expired("exp".into()))
        );
    }

    #[test]
    fn test_misshapen_claims_are_rejected_in_check_order() {
        let (engine, _) = engine_at(T0);
        let sign = |exp: i64, token_type: serde_json::Value, jti: serde_json::Value| {
            let mut raw = RawClaims::new();
            raw.insert("token_type".into(), token_type);
            raw.insert("jti".into(), jti);
            raw.insert("exp".into(), json!(exp));
            engine.backend().encode(&raw).unwrap()
        };

        let expired = sign(T0 - 1, json!(5), json!(7));
        let err = engine.decode(TokenKind::Access, &expired).unwrap_err();
        assert_eq!(err.rejection(), Some(&TokenRejection::Expired("exp".into())));

        let numeric_type = sign(T0 + 60, json!(5), json!(7));
        let err = engine.decode(TokenKind::Access, &numeric_type).unwrap_err();
        assert_eq!(err.rejection(), Some(&TokenRejection::WrongType));

        let numeric_jti = sign(T0 + 60, json!("access"), json!(7));
        let err = engine.decode(TokenKind::Access, &numeric_jti).unwrap_err();
        assert_eq!(err.rejection(), Some(&TokenRejection::Invalid));

        let mut raw = RawClaims::new();
        raw.insert("exp".into(), json!("soon"));
        let err = engine
            .decode(TokenKind::Access, &engine.backend().encode(&raw).unwrap())
            .unwrap_err();
        assert_eq!(err.rejection(), Some(&TokenRejection::Invalid));
    }

    #[test]
    fn test_bad_signature_is_generic() {
        let (engine, _) = engine_at(T0);
        let encoded = engine.create(TokenKind::Access).unwrap().encode().unwrap();
        let tampered = format!("{encoded}x");
        let err = engine.decode(TokenKind::Access, &tampered).unwrap_err();
        assert_eq!(err.rejection(), Some(&TokenRejection::Invalid));
        assert_eq!(err.message, "Token is invalid or expired");
    }

    #[test]
    fn test_encode_reflects_mutation() {
        let (engine, _) = engine_at(T0);
        let mut token = engine.create(TokenKind::Access).unwrap();
        let before = token.encode().unwrap();
        assert_eq!(token.encode().unwrap(), before);

        token.set("test", 1234).unwrap();
        assert_ne!(token.encode().unwrap(), before);
    }

    #[test]
    fn test_claim_access() {
        let (engine, _) = engine_at(T0);
        let mut token = engine.create(TokenKind::Access).unwrap();
        token.set("test", 1234).unwrap();
        assert_eq!(token.get("test"), Some(json!(1234)));
        assert!(token.contains("exp"));
        assert_eq!(token.delete("test"), Some(json!(1234)));
        assert!(!token.contains("test"));
    }

    #[test]
    fn test_set_exp_defaults_and_overrides() {
        let (engine, _) = engine_at(T0);
        let mut token = engine.create(TokenKind::Refresh).unwrap();
        let base = epoch(T0 - 3_600);

        token.set_exp("exp", Some(base), None).unwrap();
        assert_eq!(token.get("exp"), Some(json!(T0 - 3_600 + 86_400)));

        token
            .set_exp("refresh_exp", Some(base), Some(Duration::days(2)))
            .unwrap();
        assert_eq!(token.get("refresh_exp"), Some(json!(T0 - 3_600 + 2 * 86_400)));
    }

    #[test]
    fn test_check_exp() {
        let (engine, _) = engine_at(T0);
        let mut token = engine.create(TokenKind::Access).unwrap();

        let err = token.check_exp("non_existent_claim", None).unwrap_err();
        assert_eq!(
            err.rejection(),
            Some(&TokenRejection::MissingClaim("non_existent_claim".into()))
        );

        token.set_exp("exp", None, Some(Duration::days(1))).unwrap();
        let exp = epoch(T0) + Duration::days(1);

        assert!(token.check_exp("exp", None).is_ok());
        assert!(token.check_exp("exp", Some(exp)).is_err());
        assert!(token.check_exp("exp", Some(exp + Duration::seconds(1))).is_err());
        assert!(token.check_exp("exp", Some(exp - Duration::seconds(1))).is_ok());
    }
}
