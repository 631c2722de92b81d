//! Typed view over a token payload.
//!
//! The three claims every token carries (`exp`, `jti` and the type claim) are
//! held as typed fields; everything else lives in an ordered open map. The
//! wire form handed to and returned by a token backend is [`RawClaims`].
//!
//! A decoded well-known claim whose value has the wrong shape is kept
//! verbatim outside the typed fields. It still counts as present, so token
//! validation can reject it at its own step.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::AppError;

/// The claims mapping as it travels through a token backend.
pub type RawClaims = serde_json::Map<String, Value>;

/// Expiry claim name.
pub const EXP_CLAIM: &str = "exp";

/// Token id claim name.
pub const JTI_CLAIM: &str = "jti";

/// A token payload with typed well-known claims and open extras.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    /// Name of the claim carrying the token kind.
    type_claim: String,
    token_type: Option<String>,
    jti: Option<String>,
    exp: Option<i64>,
    /// Well-known claims whose decoded value has the wrong shape.
    malformed: RawClaims,
    extra: RawClaims,
}

impl Claims {
    /// Creates an empty claim set using `type_claim` as the kind claim name.
    pub fn new(type_claim: impl Into<String>) -> Self {
        Self {
            type_claim: type_claim.into(),
            token_type: None,
            jti: None,
            exp: None,
            malformed: RawClaims::new(),
            extra: RawClaims::new(),
        }
    }

    /// Splits a decoded mapping into typed claims.
    ///
    /// Never fails: a well-known claim of the wrong shape is kept aside and
    /// reported by [`Claims::is_malformed`].
    pub fn from_raw(mut raw: RawClaims, type_claim: &str) -> Self {
        let mut malformed = RawClaims::new();

        let token_type = match raw.shift_remove(type_claim) {
            Some(Value::String(s)) => Some(s),
            Some(other) => {
                malformed.insert(type_claim.to_string(), other);
                None
            }
            None => None,
        };
        let jti = match raw.shift_remove(JTI_CLAIM) {
            Some(Value::String(s)) => Some(s),
            Some(other) => {
                malformed.insert(JTI_CLAIM.to_string(), other);
                None
            }
            None => None,
        };
        let exp = match raw.shift_remove(EXP_CLAIM) {
            Some(value) => match timestamp_from_value(&value) {
                Some(ts) => Some(ts),
                None => {
                    malformed.insert(EXP_CLAIM.to_string(), value);
                    None
                }
            },
            None => None,
        };

        Self {
            type_claim: type_claim.to_string(),
            token_type,
            jti,
            exp,
            malformed,
            extra: raw,
        }
    }

    /// Flattens the claims into the mapping a backend signs.
    pub fn to_raw(&self) -> RawClaims {
        let mut raw = RawClaims::new();
        for name in [self.type_claim.as_str(), JTI_CLAIM, EXP_CLAIM] {
            if let Some(value) = self.get(name) {
                raw.insert(name.to_string(), value);
            }
        }
        for (name, value) in &self.extra {
            raw.insert(name.clone(), value.clone());
        }
        raw
    }

    /// Name of the claim carrying the token kind.
    pub fn type_claim(&self) -> &str {
        &self.type_claim
    }

    /// The token kind tag, if present.
    pub fn token_type(&self) -> Option<&str> {
        self.token_type.as_deref()
    }

    /// Sets the token kind tag.
    pub fn set_token_type(&mut self, token_type: impl Into<String>) {
        self.malformed.shift_remove(&self.type_claim);
        self.token_type = Some(token_type.into());
    }

    /// The token id, if present.
    pub fn jti(&self) -> Option<&str> {
        self.jti.as_deref()
    }

    /// Sets the token id.
    pub fn set_jti(&mut self, jti: impl Into<String>) {
        self.malformed.shift_remove(JTI_CLAIM);
        self.jti = Some(jti.into());
    }

    /// The expiry as epoch seconds, if present.
    pub fn exp(&self) -> Option<i64> {
        self.exp
    }

    /// Sets the expiry as epoch seconds.
    pub fn set_exp(&mut self, exp: i64) {
        self.malformed.shift_remove(EXP_CLAIM);
        self.exp = Some(exp);
    }

    /// The expiry as a UTC timestamp, if present and representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Whether the well-known claim `name` was decoded with a value of the
    /// wrong shape.
    pub fn is_malformed(&self, name: &str) -> bool {
        self.malformed.contains_key(name)
    }

    /// Caller-supplied claims outside the well-known set.
    pub fn extra(&self) -> &RawClaims {
        &self.extra
    }

    /// Looks up a claim by name.
    pub fn get(&self, name: &str) -> Option<Value> {
        let typed = match name {
            EXP_CLAIM => self.exp.map(Value::from),
            JTI_CLAIM => self.jti.clone().map(Value::String),
            n if n == self.type_claim => self.token_type.clone().map(Value::String),
            _ => return self.extra.get(name).cloned(),
        };
        typed.or_else(|| self.malformed.get(name).cloned())
    }

    /// Sets a claim by name.
    ///
    /// Fails with a validation error if a well-known claim is given a value
    /// of the wrong shape.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), AppError> {
        match name {
            EXP_CLAIM => {
                let exp = timestamp_from_value(&value).ok_or_else(|| {
                    AppError::validation("Claim 'exp' must be an epoch timestamp")
                })?;
                self.set_exp(exp);
            }
            JTI_CLAIM => match value {
                Value::String(s) => self.set_jti(s),
                _ => return Err(AppError::validation("Claim 'jti' must be a string")),
            },
            n if n == self.type_claim => match value {
                Value::String(s) => self.set_token_type(s),
                _ => {
                    return Err(AppError::validation(format!(
                        "Claim '{n}' must be a string"
                    )));
                }
            },
            _ => {
                self.extra.insert(name.to_string(), value);
            }
        }
        Ok(())
    }

    /// Removes a claim by name, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let typed = match name {
            EXP_CLAIM => self.exp.take().map(Value::from),
            JTI_CLAIM => self.jti.take().map(Value::String),
            n if n == self.type_claim => self.token_type.take().map(Value::String),
            _ => return self.extra.shift_remove(name),
        };
        typed.or_else(|| self.malformed.shift_remove(name))
    }

    /// Whether a claim is present.
    pub fn contains(&self, name: &str) -> bool {
        let typed = match name {
            EXP_CLAIM => self.exp.is_some(),
            JTI_CLAIM => self.jti.is_some(),
            n if n == self.type_claim => self.token_type.is_some(),
            _ => return self.extra.contains_key(name),
        };
        typed || self.malformed.contains_key(name)
    }

    /// Number of claims present.
    pub fn len(&self) -> usize {
        usize::from(self.token_type.is_some())
            + usize::from(self.jti.is_some())
            + usize::from(self.exp.is_some())
            + self.malformed.len()
            + self.extra.len()
    }

    /// Whether no claim is present.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of all present claims, well-known first.
    pub fn names(&self) -> Vec<String> {
        self.to_raw().keys().cloned().collect()
    }
}

/// Reads an epoch timestamp from an integer or a finite float.
pub fn timestamp_from_value(value: &Value) -> Option<i64> {
    if let Some(ts) = value.as_i64() {
        return Some(ts);
    }
    value
        .as_f64()
        .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
        .map(|f| f.floor() as i64)
}
