//! Freshness policy for log-derived timestamps.
//!
//! Log lines only carry a time of day, and a restarted ingester may be fed an
//! old log from the start.  Messages whose timestamp lies too far in the past
//! or the future are dropped instead of being re-announced in chat.

use std::time::Duration;

use chrono::NaiveDateTime;
use thiserror::Error;

/// A message fell outside the freshness window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("message at {timestamp} is {skew:?} away from {now}, beyond the {tolerance:?} window")]
pub struct StaleMessageError {
    pub timestamp: NaiveDateTime,
    pub now: NaiveDateTime,
    pub skew: Duration,
    pub tolerance: Duration,
}

/// Accepts timestamps with `|now - timestamp| <= tolerance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessWindow {
    tolerance: Duration,
}

impl FreshnessWindow {
    pub fn new(tolerance: Duration) -> Self {
        Self { tolerance }
    }

    /// Checks `timestamp` against `now`.  Both bounds are inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`StaleMessageError`] when the skew exceeds the tolerance.
    pub fn check(&self, timestamp: NaiveDateTime, now: NaiveDateTime) -> Result<(), StaleMessageError> {
        // `abs()` is never negative, so `to_std` cannot fail.
        let skew = (now - timestamp).abs().to_std().unwrap_or(Duration::ZERO);
        if skew <= self.tolerance {
            Ok(())
        } else {
            Err(StaleMessageError {
                timestamp,
                now,
                skew,
                tolerance: self.tolerance,
            })
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
