//! Shared fixtures for unit tests.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use tokensmith_core::config::TokenSettings;
use tokensmith_core::traits::FixedClock;

use crate::jwt::JwtBackend;
use crate::token::TokenEngine;

/// 2000-01-01T00:00:00Z.
pub const T0: i64 = 946_684_800;

pub fn epoch(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).expect("valid timestamp")
}

pub fn settings() -> TokenSettings {
    TokenSettings {
        signing_key: "unit-test-secret".into(),
        ..Default::default()
    }
}

/// An engine with default lifetimes on a clock frozen at `ts`.
pub fn engine_at(ts: i64) -> (TokenEngine, Arc<FixedClock>) {
    let settings = settings();
    let clock = Arc::new(FixedClock::new(epoch(ts)));
    let backend = Arc::new(JwtBackend::new(&settings).expect("backend"));
    let engine = TokenEngine::new(settings, backend, clock.clone()).expect("engine");
    (engine, clock)
}
