use chrono::{DateTime, Duration, Utc};

/// Decide whether a token with the given recorded absolute expiry is expired.
///
/// `expires_at` is an RFC 3339 instant as stored in the session token bag.
/// A missing or unparseable value counts as expired: refreshing a token we
/// can't reason about beats trusting it.
pub fn is_expired(expires_at: Option<&str>, skew: Duration, now: DateTime<Utc>) -> bool {
    match expires_at.and_then(|raw| DateTime::parse_from_rfc3339(raw).ok()) {
        Some(at) => now >= at.with_timezone(&Utc) - skew,
        None => true,
    }
}
