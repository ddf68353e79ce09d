use url::Url;

/// Resolves an `href` attribute value against the page it was found on
///
/// Returns `None` if the link should not be followed:
/// - empty hrefs
/// - same-page fragments (`#section`)
/// - `javascript:` and `mailto:` links
/// - hrefs that cannot be resolved
/// - anything that does not resolve to `http` or `https`
///
/// Absolute hrefs pass through the URL parser unchanged in meaning; no
/// further canonicalisation (trailing slashes, query order) is applied.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use kumo_search::url::resolve_href;
///
/// let base = Url::parse("https://example.com/docs/page").unwrap();
/// assert_eq!(
///     resolve_href("other", &base),
///     Some("https://example.com/docs/other".to_string())
/// );
/// assert_eq!(resolve_href("javascript:void(0)", &base), None);
/// ```
pub fn resolve_href(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:") || href.starts_with("mailto:") {
        return None;
    }

    let resolved = base.join(href).ok()?;

    match resolved.scheme() {
        "http" | "https" => Some(resolved.into()),
        _ => None,
    }
}
