//! HTML helper functions

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape a value placed inside a double-quoted attribute
pub fn escape_attr(s: &str) -> String {
    html_escape(s).replace('\n', "&#10;")
}

/// Whether a URL may be used as `href` / `src`.
///
/// Relative URLs and the http(s) / mailto schemes are allowed; anything
/// else with a scheme (`javascript:`, `data:`, ...) is rejected.
pub fn is_safe_href(url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() {
        return false;
    }
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("mailto:")
    {
        return true;
    }
    // No scheme before the first path/query/fragment delimiter
    match lower.find(|c| matches!(c, ':' | '/' | '?' | '#')) {
        Some(pos) => !lower[pos..].starts_with(':'),
        None => true,
    }
}
