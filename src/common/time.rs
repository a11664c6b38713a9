//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get the current time as an ISO 8601 / RFC 3339 string in UTC
    /// with millisecond precision (e.g. `2024-01-01T12:00:00.000Z`).
    fn now_rfc3339(&self) -> String;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_rfc3339(&self) -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time_millis: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given Unix timestamp (milliseconds)
    pub fn new(fixed_time_millis: i64) -> Self {
        Self { fixed_time_millis }
    }
}

impl Clock for FixedClock {
    fn now_rfc3339(&self) -> String {
        let dt: DateTime<Utc> = Utc
            .timestamp_millis_opt(self.fixed_time_millis)
            .single()
            .unwrap_or_default();
        dt.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_produces_utc_rfc3339() {
        // given:
        let clock = SystemClock;

        // when:
        let now = clock.now_rfc3339();

        // then:
        assert!(now.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&now).is_ok());
    }

    #[test]
    fn test_fixed_clock_returns_fixed_timestamp() {
        // given:
        // 2023-01-01 00:00:00 UTC in milliseconds
        let clock = FixedClock::new(1672531200000);

        // when:
        let now = clock.now_rfc3339();

        // then:
        assert_eq!(now, "2023-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_fixed_clock_is_consistent_across_calls() {
        // given:
        let clock = FixedClock::new(1672531200123);

        // when:
        let first = clock.now_rfc3339();
        let second = clock.now_rfc3339();

        // then:
        assert_eq!(first, second);
        assert_eq!(first, "2023-01-01T00:00:00.123Z");
    }
}
