//! Pure expiry policy.
//!
//! Expiry is evaluated against an injected clock so the policy stays
//! deterministic and testable; nothing here reads the system time.

use time::OffsetDateTime;

/// Returns `true` if a credential with deadline `valid_until` is expired
/// at `now`.
///
/// An absent deadline never expires. A present deadline is expired the
/// instant `now` reaches it (`now >= valid_until`).
#[must_use]
pub fn is_expired(valid_until: Option<OffsetDateTime>, now: OffsetDateTime) -> bool {
    match valid_until {
        None => false,
        Some(deadline) => now >= deadline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    #[test]
    fn test_absent_deadline_never_expires() {
        let now = OffsetDateTime::now_utc();
        assert!(!is_expired(None, now));
        assert!(!is_expired(None, now + Duration::days(365 * 1000)));
        assert!(!is_expired(None, OffsetDateTime::UNIX_EPOCH));
    }

    #[test]
    fn test_future_deadline_not_expired() {
        let now = OffsetDateTime::now_utc();
        assert!(!is_expired(Some(now + Duration::seconds(1)), now));
        assert!(!is_expired(Some(now + Duration::days(30)), now));
    }

    #[test]
    fn test_reached_deadline_expired() {
        let now = OffsetDateTime::now_utc();
        // Inclusive at the boundary.
        assert!(is_expired(Some(now), now));
        assert!(is_expired(Some(now - Duration::seconds(1)), now));
        assert!(is_expired(Some(now - Duration::days(30)), now));
    }
}
