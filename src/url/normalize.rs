use crate::url::domain::authority;
use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes a URL into the identity used to deduplicate pages
///
/// # Normalization Steps
///
/// 1. Reject empty input
/// 2. Parse the URL; reject if malformed
/// 3. Keep the authority (lowercased host plus any non-default port)
/// 4. Keep the path with one trailing slash removed (`/` becomes empty)
/// 5. Drop the scheme, query string and fragment
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(String)` - The page identity, e.g. `example.com/page`
/// * `Err(UrlError)` - The input was empty or could not be parsed
///
/// # Examples
///
/// ```
/// use site_crawler::url::normalize_url;
///
/// assert_eq!(normalize_url("https://blog.example.com/path/").unwrap(), "blog.example.com/path");
/// assert_eq!(normalize_url("http://blog.example.com/path?q=1#top").unwrap(), "blog.example.com/path");
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<String> {
    if url_str.is_empty() {
        return Err(UrlError::Empty);
    }

    let url = Url::parse(url_str).map_err(|e| UrlError::Malformed {
        url: url_str.to_string(),
        reason: e.to_string(),
    })?;

    let path = url.path();
    let path = path.strip_suffix('/').unwrap_or(path);

    Ok(format!("{}{}", authority(&url), path))
}
