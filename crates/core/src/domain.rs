//! Cache partition keys derived from tab URLs.

use crate::Error;

/// Domain used when a tab URL cannot be parsed.
pub const UNKNOWN_DOMAIN: &str = "unknown-domain";

/// Extract the cache domain from a URL: lowercase host with one leading
/// `www.` removed.
pub fn try_domain_from_url(input: &str) -> Result<String, Error> {
    let parsed = url::Url::parse(input.trim()).map_err(|e| Error::InvalidUrl(format!("{input}: {e}")))?;

    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| Error::InvalidUrl(format!("{input}: no host")))?
        .to_ascii_lowercase();

    Ok(host.strip_prefix("www.").map(str::to_string).unwrap_or(host))
}

/// Like [`try_domain_from_url`], but degrades to [`UNKNOWN_DOMAIN`].
pub fn domain_from_url(input: &str) -> String {
    match try_domain_from_url(input) {
        Ok(domain) => domain,
        Err(e) => {
            tracing::warn!(url = input, error = %e, "could not extract domain, using sentinel");
            UNKNOWN_DOMAIN.to_string()
        }
    }
}
