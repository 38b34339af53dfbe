//! HTML parser for extracting links and the canonical hint
//!
//! Parsing only pulls raw attribute values out of the document; resolving
//! and scoping them is left to the page builder.

use scraper::{Html, Selector};

/// Raw values extracted from an HTML document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    /// `href` values of anchors, in document order, untrimmed
    pub hrefs: Vec<String>,

    /// The canonical hint, if the document declares one
    pub canonical: Option<String>,
}

/// Parses an HTML document and extracts anchors and the canonical hint
///
/// # Extraction Rules
///
/// **Anchors:** every `<a href="...">` except those carrying a `download`
/// attribute. Values are returned as written; filtering of `mailto:` and
/// friends happens during normalization.
///
/// **Canonical:** `<link rel="canonical" href="...">` takes precedence over
/// `<meta name="canonical" content="...">`. The `rel` and `name` attributes
/// are matched case-insensitively.
///
/// # Example
///
/// ```
/// use site_indexer::crawler::parse_html;
///
/// let html = r#"<html><head><link rel="canonical" href="/home"></head>
///               <body><a href="/about">About</a></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.hrefs, vec!["/about".to_string()]);
/// assert_eq!(parsed.canonical.as_deref(), Some("/home"));
/// ```
pub fn parse_html(html: &str) -> ParsedDocument {
    let document = Html::parse_document(html);

    ParsedDocument {
        hrefs: extract_hrefs(&document),
        canonical: extract_canonical(&document),
    }
}

fn extract_hrefs(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

fn extract_canonical(document: &Html) -> Option<String> {
    let non_empty = |value: &str| {
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    };

    if let Ok(selector) = Selector::parse("link[rel][href]") {
        let found = document
            .select(&selector)
            .filter(|element| {
                element
                    .value()
                    .attr("rel")
                    .is_some_and(|rel| rel.split_whitespace().any(|r| r.eq_ignore_ascii_case("canonical")))
            })
            .find_map(|element| element.value().attr("href").and_then(non_empty));
        if found.is_some() {
            return found;
        }
    }

    let selector = Selector::parse("meta[name][content]").ok()?;
    document
        .select(&selector)
        .filter(|element| {
            element
                .value()
                .attr("name")
                .is_some_and(|name| name.trim().eq_ignore_ascii_case("canonical"))
        })
        .find_map(|element| element.value().attr("content").and_then(non_empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_anchor_hrefs_in_order() {
        let html = r#"
            <html><body>
                <a href="/page1">Link 1</a>
                <a href="page2">Link 2</a>
                <a href="https://other.test/page3">Link 3</a>
            </body></html>
        "#;
        let parsed = parse_html(html);
        assert_eq!(parsed.hrefs, vec!["/page1", "page2", "https://other.test/page3"]);
    }

    #[test]
    fn test_anchor_without_href_ignored() {
        let html = r#"<html><body><a name="top">Top</a></body></html>"#;
        assert!(parse_html(html).hrefs.is_empty());
    }

    #[test]
    fn test_skip_download_link() {
        let html = r#"<html><body><a href="/file.pdf" download>Download</a></body></html>"#;
        assert!(parse_html(html).hrefs.is_empty());
    }

    #[test]
    fn test_non_page_hrefs_kept_raw() {
        let html = r#"<html><body><a href="mailto:x@a.test">Mail</a></body></html>"#;
        assert_eq!(parse_html(html).hrefs, vec!["mailto:x@a.test"]);
    }

    #[test]
    fn test_canonical_link_element() {
        let html = r#"<html><head><link rel="canonical" href="https://a.test/canonical" /></head></html>"#;
        assert_eq!(
            parse_html(html).canonical.as_deref(),
            Some("https://a.test/canonical")
        );
    }

    #[test]
    fn test_canonical_meta_element() {
        let html = r#"<html><head><meta name="Canonical" content="/canon"></head></html>"#;
        assert_eq!(parse_html(html).canonical.as_deref(), Some("/canon"));
    }

    #[test]
    fn test_link_element_preferred_over_meta() {
        let html = r#"<html><head>
            <meta name="canonical" content="/from-meta">
            <link rel="CANONICAL" href="/from-link">
        </head></html>"#;
        assert_eq!(parse_html(html).canonical.as_deref(), Some("/from-link"));
    }

    #[test]
    fn test_stylesheet_link_not_canonical() {
        let html = r#"<html><head><link rel="stylesheet" href="/style.css"></head></html>"#;
        assert_eq!(parse_html(html).canonical, None);
    }

    #[test]
    fn test_blank_canonical_ignored() {
        let html = r#"<html><head><link rel="canonical" href="  "></head></html>"#;
        assert_eq!(parse_html(html).canonical, None);
    }
}
