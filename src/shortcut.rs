/// What a recent-domain shortcut shows: link, label and icon

use crate::domain::canonical_url;
use crate::recent::DomainRecord;

const FAVICON_SIZE: u32 = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct ShortcutView {
    pub domain: String,
    pub href: String,
    pub label: String,
    pub favicon_url: String,
    pub fallback_icon: String,
}

impl ShortcutView {
    pub fn from_record(record: &DomainRecord) -> ShortcutView {
        ShortcutView {
            domain: record.domain.clone(),
            href: canonical_url(&record.domain),
            label: display_label(&record.domain),
            favicon_url: favicon_url(&record.domain),
            fallback_icon: fallback_glyph(&record.domain),
        }
    }
}

/// Project the current list into shortcuts, most recent first
pub fn shortcut_views(records: &[DomainRecord]) -> Vec<ShortcutView> {
    records.iter().map(ShortcutView::from_record).collect()
}

/// The second-to-last label of the domain, or the whole domain if it has only one
///
/// Examples:
/// - mail.example.co → example
/// - github.com → github
/// - localhost → localhost
pub fn display_label(domain: &str) -> String {
    let parts: Vec<&str> = domain.split('.').collect();
    if parts.len() > 1 {
        parts[parts.len() - 2].to_string()
    } else {
        domain.to_string()
    }
}

pub fn favicon_url(domain: &str) -> String {
    format!("https://www.google.com/s2/favicons?domain={}&sz={}", domain, FAVICON_SIZE)
}

/// An SVG data URI: a circle with the domain's first character, upper-cased
pub fn fallback_glyph(domain: &str) -> String {
    let initial = domain
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect::<String>())
        .unwrap_or_else(|| "?".to_string());

    let svg = format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='{size}' height='{size}' viewBox='0 0 64 64'>\
         <circle cx='32' cy='32' r='32' fill='#9e9e9e'/>\
         <text x='32' y='42' font-size='28' font-family='sans-serif' text-anchor='middle' fill='#ffffff'>{initial}</text>\
         </svg>",
        size = FAVICON_SIZE,
        initial = escape_xml(&initial),
    );

    format!("data:image/svg+xml,{}", encode_data_uri(&svg))
}

fn escape_xml(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '&' => "&amp;".to_string(),
            '\'' => "&apos;".to_string(),
            '"' => "&quot;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Percent-encode the characters that break an unquoted data URI
fn encode_data_uri(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '%' => "%25".to_string(),
            '#' => "%23".to_string(),
            '<' => "%3C".to_string(),
            '>' => "%3E".to_string(),
            '"' => "%22".to_string(),
            ' ' => "%20".to_string(),
            _ => c.to_string(),
        })
        .collect()
}
