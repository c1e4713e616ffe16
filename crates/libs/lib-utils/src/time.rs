//! # Time Utilities
//!
//! Utilities for timestamps using chrono.

use chrono::{DateTime, Utc};

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Current UTC time as milliseconds since the Unix epoch.
///
/// Used for transaction record timestamps.
pub fn now_millis() -> i64 {
    now_utc().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_millis_is_positive() {
        assert!(now_millis() > 0);
    }

    #[test]
    fn test_now_millis_tracks_now_utc() {
        let before = now_utc().timestamp_millis();
        let millis = now_millis();
        let after = now_utc().timestamp_millis();
        assert!(before <= millis && millis <= after);
    }
}
