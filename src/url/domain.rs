use url::Url;

/// Returns the origin (`scheme://host[:port]`) a URL's robots.txt lives under
///
/// Default ports are omitted, matching how browsers serialise origins. URLs
/// without a host (e.g. `data:` or `mailto:`) have no robots origin.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use kumo_search::url::robots_origin;
///
/// let url = Url::parse("https://example.com/path?q=1").unwrap();
/// assert_eq!(robots_origin(&url), Some("https://example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/page").unwrap();
/// assert_eq!(robots_origin(&url), Some("http://127.0.0.1:8080".to_string()));
/// ```
pub fn robots_origin(url: &Url) -> Option<String> {
    url.host_str()?;
    Some(url.origin().ascii_serialization())
}
