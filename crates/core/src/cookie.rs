//! Cookie records as reported by the browser.
//!
//! Field names follow the browser cookie export format (camelCase) so that a
//! jar dumped from the browser deserializes without mapping.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Cross-site sending policy of a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SameSite {
    Strict,
    Lax,
    /// Browsers report this as `no_restriction`.
    #[serde(alias = "no_restriction")]
    None,
    #[default]
    Unspecified,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "strict",
            SameSite::Lax => "lax",
            SameSite::None => "none",
            SameSite::Unspecified => "unspecified",
        }
    }
}

/// A single cookie visible to the active tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    pub name: String,

    /// Never fingerprinted, cached or sent to the model.
    #[serde(default)]
    pub value: String,

    pub domain: String,

    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default)]
    pub secure: bool,

    #[serde(default)]
    pub http_only: bool,

    #[serde(default, deserialize_with = "same_site_or_default")]
    #[schemars(with = "Option<SameSite>")]
    pub same_site: SameSite,

    #[serde(default)]
    pub host_only: bool,

    #[serde(default)]
    pub session: bool,

    /// Seconds since epoch; absent for session cookies.
    #[serde(default)]
    pub expiration_date: Option<f64>,
}

fn default_path() -> String {
    "/".into()
}

/// Exports write `"sameSite": null` for cookies without a policy.
fn same_site_or_default<'de, D>(deserializer: D) -> Result<SameSite, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<SameSite>::deserialize(deserializer)?.unwrap_or_default())
}

/// RFC 6265 path-match: equal, or a prefix ending at a `/` boundary.
fn path_matches(request_path: &str, cookie_path: &str) -> bool {
    match request_path.strip_prefix(cookie_path) {
        Some("") => true,
        Some(rest) => cookie_path.ends_with('/') || rest.starts_with('/'),
        None => false,
    }
}

impl CookieRecord {
    /// Minimal record, mostly for tests and tool input.
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            domain: domain.into(),
            path: default_path(),
            secure: false,
            http_only: false,
            same_site: SameSite::Unspecified,
            host_only: false,
            session: true,
            expiration_date: None,
        }
    }

    /// Whether this cookie would be sent to `host`.
    ///
    /// Host-only cookies need an exact match, others also match subdomains.
    pub fn applies_to_host(&self, host: &str) -> bool {
        let cookie_domain = self.domain.trim_start_matches('.').to_ascii_lowercase();
        let host = host.to_ascii_lowercase();

        if host == cookie_domain {
            return true;
        }

        !self.host_only && host.ends_with(&format!(".{cookie_domain}"))
    }

    /// Whether this cookie passes a `getAll`-style filter.
    pub fn matches(&self, filter: &CookieFilter) -> bool {
        if let Some(domain) = &filter.domain {
            let domain = domain.trim_start_matches('.').to_ascii_lowercase();
            let cookie_domain = self.domain.trim_start_matches('.').to_ascii_lowercase();
            if cookie_domain != domain && !cookie_domain.ends_with(&format!(".{domain}")) {
                return false;
            }
        }

        if let Some(raw) = &filter.url {
            let Ok(url) = url::Url::parse(raw) else {
                return false;
            };
            let Some(host) = url.host_str() else {
                return false;
            };
            if !self.applies_to_host(host) {
                return false;
            }
            if self.secure && url.scheme() != "https" {
                return false;
            }
            if !path_matches(url.path(), &self.path) {
                return false;
            }
        }

        true
    }
}

/// Query for a cookie source, mirroring the browser's `cookies.getAll` filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieFilter {
    /// Cookies that would be sent with a request to this URL.
    pub url: Option<String>,
    /// Cookies whose domain is this domain or a subdomain of it.
    pub domain: Option<String>,
}

impl CookieFilter {
    pub fn for_url(url: impl Into<String>) -> Self {
        Self { url: Some(url.into()), domain: None }
    }

    pub fn for_domain(domain: impl Into<String>) -> Self {
        Self { url: None, domain: Some(domain.into()) }
    }
}

/// Drop repeated (name, domain) pairs, keeping the first occurrence.
pub fn dedupe_cookies(cookies: impl IntoIterator<Item = CookieRecord>) -> Vec<CookieRecord> {
    let mut seen = std::collections::HashSet::new();
    cookies
        .into_iter()
        .filter(|c| seen.insert((c.name.clone(), c.domain.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_browser_export() {
        let json = r#"{
            "name": "_ga",
            "value": "GA1.1.123",
            "domain": ".example.com",
            "path": "/",
            "secure": true,
            "httpOnly": false,
            "sameSite": "no_restriction",
            "hostOnly": false,
            "session": false,
            "expirationDate": 1767225600.5,
            "storeId": "0"
        }"#;

        let cookie: CookieRecord = serde_json::from_str(json).unwrap();
        assert_eq!(cookie.name, "_ga");
        assert_eq!(cookie.same_site, SameSite::None);
        assert!(cookie.secure);
        assert!(!cookie.http_only);
        assert_eq!(cookie.expiration_date, Some(1767225600.5));
    }

    #[test]
    fn test_missing_same_site_is_unspecified() {
        let cookie: CookieRecord = serde_json::from_str(r#"{"name":"a","domain":"example.com"}"#).unwrap();
        assert_eq!(cookie.same_site, SameSite::Unspecified);
        assert_eq!(cookie.path, "/");
    }

    #[test]
    fn test_null_same_site_is_unspecified() {
        let json = r#"[
            {"name":"a","domain":"example.com","sameSite":null},
            {"name":"b","domain":"example.com","sameSite":"strict"}
        ]"#;
        let cookies: Vec<CookieRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(cookies[0].same_site, SameSite::Unspecified);
        assert_eq!(cookies[1].same_site, SameSite::Strict);
    }

    #[test]
    fn test_applies_to_host() {
        let mut cookie = CookieRecord::new("sid", ".example.com");
        assert!(cookie.applies_to_host("example.com"));
        assert!(cookie.applies_to_host("www.example.com"));
        assert!(!cookie.applies_to_host("badexample.com"));

        cookie.domain = "example.com".into();
        cookie.host_only = true;
        assert!(cookie.applies_to_host("example.com"));
        assert!(!cookie.applies_to_host("www.example.com"));
    }

    #[test]
    fn test_matches_url_filter() {
        let mut cookie = CookieRecord::new("sid", ".example.com");
        cookie.secure = true;
        cookie.path = "/app".into();

        assert!(cookie.matches(&CookieFilter::for_url("https://www.example.com/app/home")));
        assert!(!cookie.matches(&CookieFilter::for_url("http://www.example.com/app/home")));
        assert!(!cookie.matches(&CookieFilter::for_url("https://www.example.com/other")));
        assert!(cookie.matches(&CookieFilter::for_url("https://www.example.com/app")));
        assert!(!cookie.matches(&CookieFilter::for_url("https://www.example.com/application")));
        assert!(!cookie.matches(&CookieFilter::for_url("not a url")));
    }

    #[test]
    fn test_path_matches_boundary() {
        assert!(path_matches("/", "/"));
        assert!(path_matches("/docs/intro", "/"));
        assert!(path_matches("/app", "/app"));
        assert!(path_matches("/app/", "/app"));
        assert!(path_matches("/app/x", "/app/"));
        assert!(!path_matches("/application", "/app"));
        assert!(!path_matches("/ap", "/app"));
    }

    #[test]
    fn test_matches_domain_filter() {
        let cookie = CookieRecord::new("pref", "shop.example.com");
        assert!(cookie.matches(&CookieFilter::for_domain("example.com")));
        assert!(cookie.matches(&CookieFilter::for_domain("shop.example.com")));
        assert!(!cookie.matches(&CookieFilter::for_domain("other.com")));
        assert!(cookie.matches(&CookieFilter::default()));
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let mut first = CookieRecord::new("a", "example.com");
        first.value = "1".into();
        let mut second = CookieRecord::new("a", "example.com");
        second.value = "2".into();
        let other_domain = CookieRecord::new("a", ".example.com");

        let deduped = dedupe_cookies(vec![first, second, other_domain]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].value, "1");
        assert_eq!(deduped[1].domain, ".example.com");
    }
}
