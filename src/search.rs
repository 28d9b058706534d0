/// Search box handling
use url::Url;

const SEARCH_ENDPOINT: &str = "https://www.google.com/search";

/// The URL to open for a query typed into the search box.
///
/// Returns None for a blank query.
pub fn search_url(query: &str) -> Option<String> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    Url::parse_with_params(SEARCH_ENDPOINT, &[("q", query)])
        .ok()
        .map(String::from)
}
