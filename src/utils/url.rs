//! Endpoint URL helpers.
//!
//! Base URLs come from user config, so they may or may not carry a trailing
//! slash. These helpers keep endpoint construction free of `//`.

/// Strip trailing slashes from a configured base URL.
///
/// ```
/// use guruchat::utils::url::normalize_base_url;
///
/// assert_eq!(
///     normalize_base_url("https://generativelanguage.googleapis.com/v1beta/"),
///     "https://generativelanguage.googleapis.com/v1beta"
/// );
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash.
///
/// ```
/// use guruchat::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://example.test/v1beta/", "/models/gemini-1.5-flash:generateContent"),
///     "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalize_base_url(base_url), endpoint)
}
