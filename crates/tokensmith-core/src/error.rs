//! Unified application error types for Tokensmith.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A token was rejected (bad signature, expired, wrong type, revoked, ...).
    Token,
    /// A token kind or the token settings are misdefined. Programmer error.
    Configuration,
    /// The revocation ledger could not be reached or failed an operation.
    Ledger,
    /// A claim was given a value of the wrong shape.
    Validation,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token => write!(f, "TOKEN"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Ledger => write!(f, "LEDGER"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The reason an encoded token was refused.
///
/// The `Display` form is the user-facing message. Backend verification
/// failures all collapse into [`TokenRejection::Invalid`] so callers can never
/// learn which part of a forged token was wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenRejection {
    /// Signature or structure verification failed.
    #[error("Token is invalid or expired")]
    Invalid,
    /// A required timestamp claim is absent.
    #[error("Token has no '{0}' claim")]
    MissingClaim(String),
    /// A timestamp claim is not strictly in the future.
    #[error("Token '{0}' claim has expired")]
    Expired(String),
    /// The token type claim is absent.
    #[error("Token has no type")]
    NoType,
    /// The token type claim names a different kind.
    #[error("Token has wrong type")]
    WrongType,
    /// The `jti` claim is absent.
    #[error("Token has no id")]
    NoId,
    /// The token id is on the blacklist.
    #[error("Token is blacklisted")]
    Blacklisted,
}

/// The unified application error used throughout Tokensmith.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Set when `kind` is [`ErrorKind::Token`].
    pub rejection: Option<TokenRejection>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            rejection: None,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            rejection: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a token rejection error.
    pub fn token(rejection: TokenRejection) -> Self {
        Self {
            kind: ErrorKind::Token,
            message: rejection.to_string(),
            rejection: Some(rejection),
            source: None,
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a ledger error.
    pub fn ledger(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Ledger, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Returns the token rejection reason, if this error is one.
    pub fn rejection(&self) -> Option<&TokenRejection> {
        self.rejection.as_ref()
    }

    /// Whether this error means "the presented token must not be trusted".
    pub fn is_token_error(&self) -> bool {
        self.kind == ErrorKind::Token
    }

    /// Whether this error came from the revocation ledger.
    pub fn is_ledger_error(&self) -> bool {
        self.kind == ErrorKind::Ledger
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            rejection: self.rejection.clone(),
            source: None,
        }
    }
}

impl From<TokenRejection> for AppError {
    fn from(rejection: TokenRejection) -> Self {
        Self::token(rejection)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
