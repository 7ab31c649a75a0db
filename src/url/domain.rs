use url::Url;

/// Returns the authority of a URL: its host plus an explicit non-default port
///
/// The host is already lowercased by the URL parser. URLs without a host
/// (`mailto:`, `javascript:`, `data:`) have an empty authority and never match
/// a crawl boundary.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_crawler::url::authority;
///
/// let url = Url::parse("https://EXAMPLE.com/path").unwrap();
/// assert_eq!(authority(&url), "example.com");
///
/// let url = Url::parse("http://localhost:8080/").unwrap();
/// assert_eq!(authority(&url), "localhost:8080");
/// ```
pub fn authority(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

/// Returns true when `url` lies inside the crawl boundary `base_authority`
///
/// Matching is exact; subdomains are outside the boundary.
pub fn is_same_authority(url: &Url, base_authority: &str) -> bool {
    !base_authority.is_empty() && authority(url) == base_authority
}
