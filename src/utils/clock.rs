//! Wall-clock reading for the tick cadence

use chrono::{DateTime, Utc};

/// Seconds since the UNIX epoch, with sub-second fraction
pub fn unix_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp() as f64 + f64::from(at.timestamp_subsec_micros()) / 1_000_000.0
}

/// Current wall-clock instant as fractional UNIX seconds
pub fn now_seconds() -> f64 {
    unix_seconds(Utc::now())
}
