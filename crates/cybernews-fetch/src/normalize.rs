//! URL canonicalization and dedupe-key derivation.

use sha2::{Digest, Sha256};
use url::Url;

/// Query parameters dropped during canonicalization, besides any `utm_*` key.
const TRACKING_PARAMS: [&str; 4] = ["gclid", "fbclid", "mc_cid", "mc_eid"];

fn is_tracking_param(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key.as_str())
}

fn parse_lenient(raw: &str) -> Option<Url> {
    match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{}", raw.trim_start_matches('/'))).ok()
        }
        Err(_) => None,
    }
}

/// Canonicalize a URL so that the same logical resource always maps to the
/// same string.
///
/// Lower-cases scheme and host (a missing scheme becomes `https`), drops the
/// fragment and tracking parameters, and sorts the remaining query pairs.
/// Input that cannot be parsed at all is returned trimmed but otherwise
/// untouched, which keeps the function idempotent.
#[must_use]
pub fn canonicalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(mut url) = parse_lenient(trimmed) else {
        return trimmed.to_string();
    };

    url.set_fragment(None);

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !is_tracking_param(k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.sort();

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    url.to_string()
}

/// Lower-cased network location (`host[:port]`) of `raw`, or an empty string
/// when it cannot be parsed.
#[must_use]
pub fn domain_of(raw: &str) -> String {
    let Ok(url) = Url::parse(raw.trim()) else {
        return String::new();
    };
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{port}", host.to_lowercase()),
        (Some(host), None) => host.to_lowercase(),
        _ => String::new(),
    }
}

/// `scheme://host[:port]` of an http(s) URL, the unit of robots.txt caching.
#[must_use]
pub fn origin_of(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    Some(url.origin().ascii_serialization())
}

/// Secondary duplicate signal: SHA-256 over
/// `lower(trim(title)) | lower(trim(domain)) | date`.
///
/// `date_iso` is the `YYYY-MM-DD` publication date, or `None` when the item
/// carried no timestamp.
#[must_use]
pub fn dedupe_key(title: &str, domain: &str, date_iso: Option<&str>) -> String {
    let base = format!(
        "{}|{}|{}",
        title.trim().to_lowercase(),
        domain.trim().to_lowercase(),
        date_iso.unwrap_or("")
    );
    format!("{:x}", Sha256::digest(base.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_reference_example() {
        assert_eq!(
            canonicalize("HTTP://Example.com/a?b=2&utm_source=x&a=1#frag"),
            "http://example.com/a?a=1&b=2"
        );
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let inputs = [
            "HTTP://Example.com/a?b=2&utm_source=x&a=1#frag",
            "https://news.example.org/path/?q=hello%20world&gclid=abc",
            "example.com/story?id=7",
            "https://example.com/?",
            "https://example.com/a?flag&x=%2F",
            "not a url at all",
            "",
        ];
        for input in inputs {
            let once = canonicalize(input);
            assert_eq!(canonicalize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn canonicalize_ignores_parameter_order_and_tracking_noise() {
        let a = canonicalize("https://example.com/post?id=5&page=2&utm_medium=email");
        let b = canonicalize("https://EXAMPLE.com/post?fbclid=zzz&page=2&id=5#comments");
        assert_eq!(a, b);
        assert_eq!(a, "https://example.com/post?id=5&page=2");
    }

    #[test]
    fn canonicalize_strips_all_tracking_params() {
        let url = canonicalize(
            "https://example.com/x?utm_campaign=c&utm_term=t&utm_content=q&gclid=1&fbclid=2&mc_cid=3&mc_eid=4",
        );
        assert_eq!(url, "https://example.com/x");
    }

    #[test]
    fn canonicalize_defaults_missing_scheme_to_https() {
        assert_eq!(
            canonicalize("Example.com/story?id=7"),
            "https://example.com/story?id=7"
        );
    }

    #[test]
    fn domain_of_lowercases_host() {
        assert_eq!(domain_of("https://WWW.Example.COM/a"), "www.example.com");
        assert_eq!(domain_of("http://example.com:8080/a"), "example.com:8080");
    }

    #[test]
    fn domain_of_unparsable_is_empty() {
        assert_eq!(domain_of("::nope::"), "");
        assert_eq!(domain_of(""), "");
    }

    #[test]
    fn origin_of_strips_path() {
        assert_eq!(
            origin_of("https://krebsonsecurity.com/feed/").as_deref(),
            Some("https://krebsonsecurity.com")
        );
        assert_eq!(origin_of("mailto:someone@example.com"), None);
    }

    #[test]
    fn dedupe_key_is_pure() {
        let a = dedupe_key("Big Breach", "example.com", Some("2024-05-01"));
        let b = dedupe_key("Big Breach", "example.com", Some("2024-05-01"));
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn dedupe_key_normalizes_case_and_whitespace() {
        let a = dedupe_key("  Big Breach ", "EXAMPLE.com", Some("2024-05-01"));
        let b = dedupe_key("big breach", "example.com ", Some("2024-05-01"));
        assert_eq!(a, b);
    }

    #[test]
    fn dedupe_key_distinguishes_dates() {
        let dated = dedupe_key("t", "d", Some("2024-05-01"));
        let undated = dedupe_key("t", "d", None);
        assert_ne!(dated, undated);
        assert_eq!(
            undated,
            format!("{:x}", Sha256::digest("t|d|".as_bytes()))
        );
    }
}
