//! Shared utility functions

use chrono::{DateTime, Utc};

/// Parse a stored RFC3339 timestamp, falling back to the current time
///
/// Rows are always written with `to_rfc3339()`, so the fallback only
/// triggers for rows edited by hand.
pub fn parse_datetime_or_now(s: &str) -> DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Current time as stored in the database
pub fn now_rfc3339() -> (DateTime<Utc>, String) {
    let now = Utc::now();
    (now, now.to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_or_now() {
        let parsed = parse_datetime_or_now("2024-01-01T12:00:00Z");
        assert_eq!(parsed.to_rfc3339(), "2024-01-01T12:00:00+00:00");

        let before = Utc::now();
        let parsed = parse_datetime_or_now("invalid");
        let after = Utc::now();
        assert!(parsed >= before && parsed <= after);
    }

    #[test]
    fn test_now_rfc3339_round_trips() {
        let (now, stored) = now_rfc3339();
        assert_eq!(parse_datetime_or_now(&stored), now);
    }
}
