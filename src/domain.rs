/// Domain extraction and filtering for the recent-domains strip
use url::Url;

/// Substrings that mark a host as one of the browser's or our own pages
const INTERNAL_MARKERS: [&str; 2] = ["chrome", "newtab"];

/// Hosts that always point back at this machine
const LOOPBACK_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "[::1]"];

/// Extract the normalized domain from a full URL
///
/// Algorithm:
/// 1. Parse the URL (malformed input → None)
/// 2. Take the host component, lower-cased
/// 3. Strip a single leading "www."
///
/// Examples:
/// - https://www.Example.COM/path → example.com
/// - https://mail.example.co/inbox → mail.example.co
/// - not a url → None
pub fn extract_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    let host = host.trim_end_matches('.');
    let domain = host.strip_prefix("www.").unwrap_or(host);

    if domain.is_empty() {
        None
    } else {
        Some(domain.to_string())
    }
}

/// The bare-domain URL stored for a record
pub fn canonical_url(domain: &str) -> String {
    format!("https://{}", domain)
}

/// Check whether a domain belongs to the browser, the extension, or loopback.
///
/// This is a substring match, so an unrelated site such as `chromereviews.com`
/// is excluded as well.
pub fn is_internal(domain: &str) -> bool {
    LOOPBACK_HOSTS.contains(&domain)
        || domain.starts_with("127.")
        || INTERNAL_MARKERS.iter().any(|marker| domain.contains(marker))
}

/// Domain for a URL that may be recorded as a shortcut.
///
/// Only web pages count; extension pages, `file://`, `about:` and the like
/// are never recorded.
pub fn trackable_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }

    extract_domain(url).filter(|domain| !is_internal(domain))
}
