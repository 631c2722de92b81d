//! Shared test helpers for integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use tokensmith::{
    AppError, AppResult, FixedClock, JwtBackend, LedgerIssuer, OutstandingToken,
    RevocationLedger, TokenEngine, TokenSettings, UserId,
};
use tokensmith_ledger::memory::MemoryLedger;

/// 2000-01-01T00:00:00Z.
pub const T0: i64 = 946_684_800;

/// Test application context
pub struct TestApp {
    /// Engine on a frozen clock
    pub engine: TokenEngine,
    /// The frozen clock
    pub clock: Arc<FixedClock>,
    /// In-memory ledger behind `issuer`
    pub ledger: Arc<MemoryLedger>,
    /// Issuer with revocation hooks
    pub issuer: LedgerIssuer,
}

impl TestApp {
    /// Create a test application with default lifetimes
    pub fn new() -> Self {
        Self::with_settings(settings())
    }

    /// Create a test application with custom settings
    pub fn with_settings(settings: TokenSettings) -> Self {
        let clock = Arc::new(FixedClock::new(epoch(T0)));
        let engine = engine(settings, clock.clone());
        let ledger = Arc::new(MemoryLedger::new());
        let issuer = LedgerIssuer::new(engine.clone(), ledger.clone());
        Self {
            engine,
            clock,
            ledger,
            issuer,
        }
    }

    /// Move the clock forward
    pub fn advance(&self, seconds: i64) {
        self.clock.advance(Duration::seconds(seconds));
    }
}

/// Settings with a test key and default lifetimes
pub fn settings() -> TokenSettings {
    TokenSettings {
        signing_key: "integration-secret".into(),
        ..Default::default()
    }
}

/// Engine signing with `settings` on `clock`
pub fn engine(settings: TokenSettings, clock: Arc<FixedClock>) -> TokenEngine {
    let backend = Arc::new(JwtBackend::new(&settings).expect("backend"));
    TokenEngine::new(settings, backend, clock).expect("engine")
}

pub fn epoch(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).expect("valid timestamp")
}

/// A ledger whose backing store is unreachable.
#[derive(Debug)]
pub struct FailingLedger;

fn outage() -> AppError {
    AppError::ledger("connection refused")
}

#[async_trait]
impl RevocationLedger for FailingLedger {
    async fn record_outstanding(&self, _token: OutstandingToken) -> AppResult<()> {
        Err(outage())
    }

    async fn is_blacklisted(&self, _jti: &str) -> AppResult<bool> {
        Err(outage())
    }

    async fn blacklist(&self, _jti: &str, _expires_at: DateTime<Utc>) -> AppResult<bool> {
        Err(outage())
    }

    async fn find_outstanding(&self, _jti: &str) -> AppResult<Option<OutstandingToken>> {
        Err(outage())
    }

    async fn outstanding_for_user(&self, _user: &UserId) -> AppResult<Vec<OutstandingToken>> {
        Err(outage())
    }

    async fn flush_expired(&self, _now: DateTime<Utc>) -> AppResult<u64> {
        Err(outage())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Err(outage())
    }
}
