//! Transaction timestamp type
//!
//! Every transaction carries a timestamp assigned by the ordering service.
//! It is the only time source a handler may use: each endorsing peer
//! re-executes the handler independently, and the write sets must match
//! byte-for-byte.
//!
//! ## Representation
//!
//! Seconds and nanoseconds since Unix epoch (1970-01-01 00:00:00 UTC), the
//! same shape the host uses on the wire. Rendering goes through `chrono`, so
//! a malformed instant (nanos out of range, year outside chrono's range) is
//! surfaced as a [`StubError::Timestamp`] instead of panicking.
//!
//! ## Usage
//!
//! ```
//! use agri_core::TxTimestamp;
//!
//! let ts = TxTimestamp::from_secs(1_704_067_200);
//! assert_eq!(ts.to_rfc3339().unwrap(), "2024-01-01T00:00:00.000000000Z");
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::stub::{StubError, StubResult};

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Seconds + nanoseconds instant assigned to a transaction.
///
/// ## Invariants
///
/// - Comparable and orderable (seconds first, then nanos)
/// - Rendering is deterministic: the same instant always yields the same text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TxTimestamp {
    seconds: i64,
    nanos: i32,
}

impl TxTimestamp {
    /// Unix epoch (1970-01-01 00:00:00 UTC)
    pub const EPOCH: TxTimestamp = TxTimestamp {
        seconds: 0,
        nanos: 0,
    };

    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a timestamp from raw parts.
    ///
    /// Parts are taken as-is; validation happens when the instant is rendered.
    #[inline]
    pub const fn new(seconds: i64, nanos: i32) -> Self {
        TxTimestamp { seconds, nanos }
    }

    /// Create a timestamp from seconds since epoch
    #[inline]
    pub const fn from_secs(secs: i64) -> Self {
        TxTimestamp {
            seconds: secs,
            nanos: 0,
        }
    }

    /// Create a timestamp from milliseconds since epoch
    pub const fn from_millis(millis: i64) -> Self {
        TxTimestamp {
            seconds: millis.div_euclid(1_000),
            nanos: (millis.rem_euclid(1_000) * 1_000_000) as i32,
        }
    }

    /// Create a timestamp from a `chrono` instant
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        TxTimestamp {
            seconds: instant.timestamp(),
            nanos: instant.timestamp_subsec_nanos() as i32,
        }
    }

    /// Parse an RFC 3339 instant (e.g. `2024-01-01T00:00:00Z`)
    pub fn parse_rfc3339(text: &str) -> StubResult<Self> {
        let parsed = DateTime::parse_from_rfc3339(text).map_err(|e| StubError::Timestamp {
            reason: format!("'{}' is not an RFC 3339 instant: {}", text, e),
        })?;
        Ok(Self::from_datetime(parsed.with_timezone(&Utc)))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Whole seconds since Unix epoch
    #[inline]
    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Sub-second nanoseconds
    #[inline]
    pub const fn nanos(&self) -> i32 {
        self.nanos
    }

    // =========================================================================
    // Conversions
    // =========================================================================

    /// Convert to a `chrono` instant.
    ///
    /// Fails when nanos are outside `0..1_000_000_000` or the instant is
    /// outside the range `chrono` can represent.
    pub fn to_datetime(&self) -> StubResult<DateTime<Utc>> {
        if self.nanos < 0 || i64::from(self.nanos) >= NANOS_PER_SEC {
            return Err(StubError::Timestamp {
                reason: format!("nanos {} out of range", self.nanos),
            });
        }
        DateTime::from_timestamp(self.seconds, self.nanos as u32).ok_or_else(|| {
            StubError::Timestamp {
                reason: format!("seconds {} out of range", self.seconds),
            }
        })
    }

    /// Render as RFC 3339 UTC with nanosecond precision.
    ///
    /// This is the text stamped into every record's `timestamp` field.
    pub fn to_rfc3339(&self) -> StubResult<String> {
        Ok(self
            .to_datetime()?
            .to_rfc3339_opts(SecondsFormat::Nanos, true))
    }

    /// Add a duration, saturating at the maximum representable instant.
    pub fn saturating_add(&self, duration: Duration) -> Self {
        let total = i128::from(self.seconds) * i128::from(NANOS_PER_SEC)
            + i128::from(self.nanos)
            + duration.as_nanos() as i128;
        let max = i128::from(i64::MAX) * i128::from(NANOS_PER_SEC);
        let total = total.min(max);
        TxTimestamp {
            seconds: total.div_euclid(i128::from(NANOS_PER_SEC)) as i64,
            nanos: total.rem_euclid(i128::from(NANOS_PER_SEC)) as i32,
        }
    }
}

impl Default for TxTimestamp {
    fn default() -> Self {
        TxTimestamp::EPOCH
    }
}

impl std::fmt::Display for TxTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_rfc3339() {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "{}s+{}ns", self.seconds, self.nanos),
        }
    }
}

impl From<DateTime<Utc>> for TxTimestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        TxTimestamp::from_datetime(instant)
    }
}

// ============================================================================
// Tests
// ============================================================================
