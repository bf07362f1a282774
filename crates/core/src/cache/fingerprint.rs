//! Order-independent identity of a cookie set.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::cookie::{CookieRecord, SameSite};

/// Fingerprint of the empty cookie set: sha256 of `[]`.
pub const EMPTY_FINGERPRINT: &str = "4f53cda18c2baa0c0354bb5f9a3ecbe5ed12ab4d8e11ba873c2f11161202b945";

/// The fingerprinted view of a cookie. `value` is deliberately absent.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
struct Projection<'a> {
    name: &'a str,
    domain: &'a str,
    secure: bool,
    #[serde(rename = "httpOnly")]
    http_only: bool,
    #[serde(rename = "sameSite")]
    same_site: &'static str,
}

impl<'a> From<&'a CookieRecord> for Projection<'a> {
    fn from(cookie: &'a CookieRecord) -> Self {
        let same_site = match cookie.same_site {
            SameSite::Unspecified => SameSite::None,
            other => other,
        };
        Self {
            name: &cookie.name,
            domain: &cookie.domain,
            secure: cookie.secure,
            http_only: cookie.http_only,
            same_site: same_site.as_str(),
        }
    }
}

/// Compute the fingerprint of a cookie set.
///
/// Cookies are sorted by their projection (name first) before being
/// serialized to compact JSON and hashed, so input order never matters.
pub fn fingerprint(cookies: &[CookieRecord]) -> String {
    let mut projected: Vec<Projection<'_>> = cookies.iter().map(Projection::from).collect();
    projected.sort();

    // Serializing borrowed strings and bools into a Vec cannot fail.
    let canonical = serde_json::to_vec(&projected).unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie(name: &str, domain: &str) -> CookieRecord {
        CookieRecord::new(name, domain)
    }

    #[test]
    fn test_empty_is_constant() {
        assert_eq!(fingerprint(&[]), EMPTY_FINGERPRINT);
    }

    #[test]
    fn test_order_independent() {
        let a = vec![cookie("b", "example.com"), cookie("a", "example.com"), cookie("c", "cdn.example.com")];
        let mut b = a.clone();
        b.reverse();
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_order_independent_with_shared_names() {
        let a = vec![cookie("sid", "example.com"), cookie("sid", ".example.com")];
        let b = vec![cookie("sid", ".example.com"), cookie("sid", "example.com")];
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_value_ignored() {
        let mut a = cookie("sid", "example.com");
        a.value = "one".into();
        let mut b = a.clone();
        b.value = "two".into();
        assert_eq!(fingerprint(&[a]), fingerprint(&[b]));
    }

    #[test]
    fn test_sensitive_to_attributes() {
        let mut base = cookie("sid", "example.com");
        base.same_site = SameSite::Lax;
        let original = fingerprint(std::slice::from_ref(&base));

        let mut changed = base.clone();
        changed.name = "sid2".into();
        assert_ne!(fingerprint(&[changed]), original);

        let mut changed = base.clone();
        changed.domain = "other.com".into();
        assert_ne!(fingerprint(&[changed]), original);

        let mut changed = base.clone();
        changed.secure = true;
        assert_ne!(fingerprint(&[changed]), original);

        let mut changed = base.clone();
        changed.http_only = true;
        assert_ne!(fingerprint(&[changed]), original);

        let mut changed = base.clone();
        changed.same_site = SameSite::Strict;
        assert_ne!(fingerprint(&[changed]), original);
    }

    #[test]
    fn test_unspecified_same_site_reads_as_none() {
        let mut a = cookie("sid", "example.com");
        a.same_site = SameSite::Unspecified;
        let mut b = a.clone();
        b.same_site = SameSite::None;
        assert_eq!(fingerprint(&[a]), fingerprint(&[b]));
    }

    #[test]
    fn test_hash_format() {
        let hash = fingerprint(&[cookie("a", "example.com")]);
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
