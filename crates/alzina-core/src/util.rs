//! Input cleanup shared by the form, the bootstrap link and the client.

use url::Url;

/// Trimmed `value`, or `None` when nothing but whitespace is left.
pub fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Base URL in stored form: trimmed, with every trailing slash removed.
pub fn normalize_base_url(value: &str) -> Option<String> {
    non_blank(value.trim().trim_end_matches('/'))
}

/// Whether `value` parses as an `http`/`https` URL with a host.
pub fn is_backend_url(value: &str) -> bool {
    Url::parse(value.trim()).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some()
    })
}
