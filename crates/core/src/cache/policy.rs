//! Hit/miss decisions for cached analyses.

use std::time::Duration;

use serde::Serialize;

use super::fingerprint::fingerprint;
use super::store::CacheEntry;
use crate::cookie::CookieRecord;

/// Validity window of a cache entry unless configured otherwise.
pub const DEFAULT_TTL: Duration = Duration::from_millis(24 * 60 * 60 * 1000);

/// Why a lookup did not produce cached text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissReason {
    Absent,
    Expired,
    FingerprintMismatch,
}

/// Outcome of [`CachePolicy::lookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Hit(String),
    Miss(MissReason),
}

/// Time-to-live and fingerprint rules for the analysis cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl CachePolicy {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn ttl_ms(&self) -> i64 {
        i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX)
    }

    /// An entry is expired once strictly more than one TTL has elapsed.
    pub fn is_expired(&self, entry: &CacheEntry, now_ms: i64) -> bool {
        now_ms.saturating_sub(entry.created_at_ms) > self.ttl_ms()
    }

    /// Decide whether `entry` answers for `live` cookies on `domain`.
    ///
    /// Expiry is checked before the fingerprint: an old entry is a miss even
    /// when the cookies still match. A mismatch leaves the entry alone; the
    /// caller only deletes on [`MissReason::Expired`].
    pub fn lookup(&self, domain: &str, live: &[CookieRecord], entry: Option<&CacheEntry>, now_ms: i64) -> Lookup {
        let Some(entry) = entry else {
            return Lookup::Miss(MissReason::Absent);
        };

        if self.is_expired(entry, now_ms) {
            tracing::debug!(domain, age_ms = now_ms.saturating_sub(entry.created_at_ms), "cache entry expired");
            return Lookup::Miss(MissReason::Expired);
        }

        if fingerprint(live) != entry.fingerprint {
            tracing::debug!(domain, "cookie set changed since analysis was cached");
            return Lookup::Miss(MissReason::FingerprintMismatch);
        }

        tracing::info!(domain, "cache hit");
        Lookup::Hit(entry.analysis_text.clone())
    }

    /// Build the entry recording `text` as the analysis of `cookies`.
    /// Persisting it is the store's job.
    pub fn write(&self, domain: &str, cookies: &[CookieRecord], text: &str, now_ms: i64) -> CacheEntry {
        CacheEntry {
            domain: domain.to_string(),
            fingerprint: fingerprint(cookies),
            analysis_text: text.to_string(),
            created_at_ms: now_ms,
            cookie_count: cookies.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookie::SameSite;

    const TTL_MS: i64 = 86_400_000;

    fn cookies() -> Vec<CookieRecord> {
        let mut a = CookieRecord::new("a", "example.com");
        a.secure = true;
        a.same_site = SameSite::Lax;
        vec![a]
    }

    #[test]
    fn test_absent() {
        let policy = CachePolicy::default();
        assert_eq!(policy.lookup("example.com", &cookies(), None, 0), Lookup::Miss(MissReason::Absent));
    }

    #[test]
    fn test_hit() {
        let policy = CachePolicy::default();
        let entry = policy.write("example.com", &cookies(), "Summary A", 0);
        assert_eq!(
            policy.lookup("example.com", &cookies(), Some(&entry), 1000),
            Lookup::Hit("Summary A".to_string())
        );
    }

    #[test]
    fn test_ttl_boundary_is_inclusive() {
        let policy = CachePolicy::default();
        let entry = policy.write("example.com", &cookies(), "Summary A", 0);
        assert!(matches!(policy.lookup("example.com", &cookies(), Some(&entry), TTL_MS), Lookup::Hit(_)));
        assert_eq!(
            policy.lookup("example.com", &cookies(), Some(&entry), TTL_MS + 1),
            Lookup::Miss(MissReason::Expired)
        );
    }

    #[test]
    fn test_expiry_checked_before_fingerprint() {
        let policy = CachePolicy::default();
        let now = 10 * TTL_MS;
        let entry = policy.write("example.com", &cookies(), "old", now - TTL_MS - 1);
        assert_eq!(policy.lookup("example.com", &cookies(), Some(&entry), now), Lookup::Miss(MissReason::Expired));

        let mut other = cookies();
        other[0].http_only = true;
        assert_eq!(policy.lookup("example.com", &other, Some(&entry), now), Lookup::Miss(MissReason::Expired));
    }

    #[test]
    fn test_mismatch() {
        let policy = CachePolicy::default();
        let entry = policy.write("example.com", &cookies(), "Summary A", 0);
        let mut changed = cookies();
        changed.push(CookieRecord::new("b", "example.com"));
        assert_eq!(
            policy.lookup("example.com", &changed, Some(&entry), 1),
            Lookup::Miss(MissReason::FingerprintMismatch)
        );
    }

    #[test]
    fn test_write_fields() {
        let policy = CachePolicy::new(Duration::from_secs(60));
        let entry = policy.write("example.com", &cookies(), "text", 123);
        assert_eq!(entry.domain, "example.com");
        assert_eq!(entry.fingerprint, fingerprint(&cookies()));
        assert_eq!(entry.analysis_text, "text");
        assert_eq!(entry.created_at_ms, 123);
        assert_eq!(entry.cookie_count, 1);
        assert_eq!(policy.ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_custom_ttl() {
        let policy = CachePolicy::new(Duration::from_millis(10));
        let entry = policy.write("example.com", &cookies(), "text", 0);
        assert!(!policy.is_expired(&entry, 10));
        assert!(policy.is_expired(&entry, 11));
    }
}
