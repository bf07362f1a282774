//! Prompt construction for cookie analyses.
//!
//! Only cookie names and domains reach the model. Values, paths and flags
//! stay on the machine that owns them.

use serde::Serialize;

use crumbwise_core::CookieRecord;

/// Instructions preceding the cookie list.
pub const ANALYSIS_INSTRUCTIONS: &str = r#"You explain to a non-technical reader what the cookies on a website are for.

Work ONLY from the cookies listed at the end. Do not invent cookies and do not guess from partial name matches. Where a cookie is well known (see https://github.com/privacy/cookies), use that known behavior.

Write:
1. A summary of three or four sentences describing what the cookies are used for overall (sign-in, preferences, performance, advertising, ...).
2. One line per cookie, in the form `name: explanation`, at most 12 words, starting with a verb or noun.

Prefix a line with ⚠️ only when the cookie's domain differs from the site, its name matches a known tracker (_ga, _fbp, _gid, ...), or it plainly belongs to an ad or analytics network. Never flag session, theme or timezone cookies that are first-party.

No jargon, no multi-sentence explanations per cookie.

"cookies": "#;

#[derive(Serialize)]
struct PromptCookie<'a> {
    name: &'a str,
    domain: &'a str,
}

/// Build the model prompt for `cookies`.
pub fn build_prompt(cookies: &[CookieRecord]) -> String {
    let listed: Vec<PromptCookie<'_>> =
        cookies.iter().map(|c| PromptCookie { name: &c.name, domain: &c.domain }).collect();

    // A list of borrowed strings always serializes.
    let json = serde_json::to_string_pretty(&listed).unwrap_or_else(|_| "[]".to_string());
    format!("{ANALYSIS_INSTRUCTIONS}{json}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_names_and_domains() {
        let mut cookie = CookieRecord::new("_ga", ".example.com");
        cookie.value = "GA1.2.secret-value".into();
        cookie.path = "/private".into();

        let prompt = build_prompt(&[cookie]);
        assert!(prompt.starts_with(ANALYSIS_INSTRUCTIONS));
        assert!(prompt.contains("\"name\": \"_ga\""));
        assert!(prompt.contains("\"domain\": \".example.com\""));
        assert!(!prompt.contains("secret-value"));
        assert!(!prompt.contains("/private"));
    }

    #[test]
    fn test_prompt_empty_list() {
        assert!(build_prompt(&[]).ends_with("[]"));
    }
}
