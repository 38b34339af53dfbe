use url::{Host, Url};

/// Second-level labels that commonly sit under a country-code TLD
/// (`example.co.uk`, `example.com.au`, `example.ne.jp`)
const SHARED_SECOND_LEVEL: &[&str] = &[
    "ac", "co", "com", "edu", "gov", "go", "ne", "net", "or", "org",
];

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_indexer::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Reduces a host to its registrable domain
///
/// No public suffix list is consulted. IP addresses and single-label hosts
/// are returned unchanged; otherwise the last two labels are kept, or the
/// last three when the host ends in a shared second level under a
/// two-letter country code (`co.uk`).
///
/// # Examples
///
/// ```
/// use site_indexer::url::registrable_domain;
///
/// assert_eq!(registrable_domain("blog.example.com"), "example.com");
/// assert_eq!(registrable_domain("www.example.co.uk"), "example.co.uk");
/// assert_eq!(registrable_domain("127.0.0.1"), "127.0.0.1");
/// ```
pub fn registrable_domain(host: &str) -> String {
    let host = host.trim_end_matches('.').to_lowercase();

    if matches!(Host::parse(&host), Ok(Host::Ipv4(_)) | Ok(Host::Ipv6(_))) {
        return host;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 2 {
        return host;
    }

    let tld = labels[labels.len() - 1];
    let second = labels[labels.len() - 2];
    let keep = if tld.len() == 2 && SHARED_SECOND_LEVEL.contains(&second) {
        3
    } else {
        2
    };

    labels[labels.len() - keep..].join(".")
}

/// Returns true if both URLs belong to the same registrable domain
///
/// Ports and schemes are ignored.
pub fn same_site(a: &Url, b: &Url) -> bool {
    match (extract_domain(a), extract_domain(b)) {
        (Some(a), Some(b)) => registrable_domain(&a) == registrable_domain(&b),
        _ => false,
    }
}
