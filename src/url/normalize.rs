use crate::UrlError;
use url::Url;

/// Normalizes a raw link into the absolute form used as a dedup key
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject empty links
/// 2. Reject non-page schemes (`mailto:`, `tel:`, `javascript:`, ...)
/// 3. Parse as absolute (no base) or resolve against `base` (RFC 3986)
/// 4. Reject anything that is not HTTP(S) or has no host
/// 5. Remove fragment (everything after #)
///
/// Non-ASCII characters are percent-encoded by the parser and existing
/// `%XX` escapes are kept as they are, so normalizing an already
/// normalized URL returns it unchanged.
///
/// # Arguments
///
/// * `raw` - The link as found in the document (or the seed argument)
/// * `base` - The page the link was found on; `None` for the seed
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - The link does not denote a crawlable page
///
/// # Examples
///
/// ```
/// use site_indexer::url::normalize_url;
/// use url::Url;
///
/// let base = Url::parse("http://a.test/x/y").unwrap();
/// let url = normalize_url("../b#top", Some(&base)).unwrap();
/// assert_eq!(url.as_str(), "http://a.test/b");
/// ```
pub fn normalize_url(raw: &str, base: Option<&Url>) -> Result<Url, UrlError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(UrlError::Empty);
    }

    if is_non_page_scheme(raw) {
        return Err(UrlError::NotPageLink(raw.to_string()));
    }

    let mut url = match base {
        Some(base) => base.join(raw),
        None => Url::parse(raw),
    }
    .map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(raw.to_string()));
    }

    url.set_fragment(None);

    Ok(url)
}

/// Checks for a `scheme:` prefix that is not HTTP(S) and is not followed by `/`
///
/// This catches `mailto:a@b`, `tel:123` and `javascript:void(0)` before they
/// reach the resolver, which would otherwise accept them as opaque URLs.
fn is_non_page_scheme(raw: &str) -> bool {
    let Some((scheme, rest)) = raw.split_once(':') else {
        return false;
    };

    let mut chars = scheme.chars();
    let well_formed = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !well_formed {
        // Not a scheme at all, e.g. "page?time=10:30"
        return false;
    }

    let scheme = scheme.to_ascii_lowercase();
    scheme != "http" && scheme != "https" && !rest.starts_with('/')
}
