//! Book manifest discovery and parsing.
//!
//! The details page of a borrowed book embeds the URL of a JSON manifest
//! (`BookReaderJSIA.php`). The manifest lists page images grouped into
//! spreads under `data.brOptions.data`; flattening the groups yields one URI
//! per page in reading order.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use url::Url;

#[allow(clippy::expect_used)]
static MANIFEST_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""url"\s*:\s*"([^"]*BookReaderJSIA\.php[^"]*)""#)
        .expect("manifest URL regex is valid")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    data: ManifestData,
}

#[derive(Debug, Deserialize)]
struct ManifestData {
    #[serde(rename = "brOptions")]
    br_options: ReaderOptions,
}

#[derive(Debug, Deserialize)]
struct ReaderOptions {
    data: Vec<Vec<PageEntry>>,
}

#[derive(Debug, Deserialize)]
struct PageEntry {
    uri: String,
}

/// Finds the manifest URL embedded in a details page.
///
/// JSON escapes (`&`, `\/`) are undone and the URL is resolved against
/// `base`; protocol-relative URLs get `https:`.
#[must_use]
pub(crate) fn find_manifest_url(details_html: &str, base: &Url) -> Option<Url> {
    let raw = MANIFEST_URL_RE
        .captures(details_html)
        .and_then(|caps| caps.get(1))?
        .as_str();
    resolve_url(&unescape_json_url(raw), base)
}

/// Extracts page image URLs from a manifest body.
///
/// # Errors
///
/// Returns a human-readable reason when the body is not a manifest, or when
/// it lists no pages.
pub(crate) fn parse_page_urls(manifest_json: &str, base: &Url) -> Result<Vec<Url>, String> {
    let manifest: Manifest = serde_json::from_str(manifest_json)
        .map_err(|error| format!("unexpected manifest format: {error}"))?;

    let mut pages = Vec::new();
    for entry in manifest.data.br_options.data.into_iter().flatten() {
        let url = resolve_url(&entry.uri, base)
            .ok_or_else(|| format!("invalid page URL in manifest: {}", entry.uri))?;
        pages.push(url);
    }

    if pages.is_empty() {
        return Err("manifest lists no pages".to_string());
    }
    Ok(pages)
}

/// Appends the rotation and scale parameters the image server expects.
#[must_use]
pub(crate) fn page_request_url(page: &Url, scale: u32) -> Url {
    let mut url = page.clone();
    url.query_pairs_mut()
        .append_pair("rotate", "0")
        .append_pair("scale", &scale.to_string());
    url
}

fn unescape_json_url(raw: &str) -> String {
    raw.replace("\\u0026", "&").replace("\\/", "/")
}

fn resolve_url(raw: &str, base: &Url) -> Option<Url> {
    if let Some(rest) = raw.strip_prefix("//") {
        return Url::parse(&format!("https://{rest}")).ok();
    }
    base.join(raw).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://archive.org/").unwrap()
    }

    #[test]
    fn test_find_manifest_url_unescapes_and_adds_scheme() {
        let html = r#"<script>var opts = {"url":"\/\/ia800.us.archive.org\/BookReader\/BookReaderJSIA.php?id=someBook00&itemPath=\/27\/items"};</script>"#;

        let url = find_manifest_url(html, &base()).unwrap();

        assert_eq!(
            url.as_str(),
            "https://ia800.us.archive.org/BookReader/BookReaderJSIA.php?id=someBook00&itemPath=/27/items"
        );
    }

    #[test]
    fn test_find_manifest_url_resolves_relative_path() {
        let base = Url::parse("http://127.0.0.1:8080/").unwrap();
        let html = r#"{"url": "/BookReaderJSIA.php?id=x"}"#;

        let url = find_manifest_url(html, &base).unwrap();

        assert_eq!(url.as_str(), "http://127.0.0.1:8080/BookReaderJSIA.php?id=x");
    }

    #[test]
    fn test_find_manifest_url_ignores_other_urls() {
        let html = r#"{"url":"https://archive.org/about"}"#;
        assert!(find_manifest_url(html, &base()).is_none());
    }

    #[test]
    fn test_parse_page_urls_flattens_spreads_in_order() {
        let json = r#"{"data":{"brOptions":{"data":[
            [{"uri":"https://ia8.archive.org/img?page=0"}],
            [{"uri":"https://ia8.archive.org/img?page=1"},{"uri":"https://ia8.archive.org/img?page=2"}]
        ]},"metadata":{"title":"A Book"}}}"#;

        let pages = parse_page_urls(json, &base()).unwrap();

        let pages: Vec<&str> = pages.iter().map(Url::as_str).collect();
        assert_eq!(
            pages,
            vec![
                "https://ia8.archive.org/img?page=0",
                "https://ia8.archive.org/img?page=1",
                "https://ia8.archive.org/img?page=2",
            ]
        );
    }

    #[test]
    fn test_parse_page_urls_rejects_empty_and_malformed() {
        let empty = r#"{"data":{"brOptions":{"data":[]}}}"#;
        assert_eq!(
            parse_page_urls(empty, &base()).unwrap_err(),
            "manifest lists no pages"
        );

        let err = parse_page_urls(r#"{"error":"not borrowed"}"#, &base()).unwrap_err();
        assert!(err.starts_with("unexpected manifest format"), "got: {err}");
    }

    #[test]
    fn test_page_request_url_appends_scale() {
        let page = Url::parse("https://ia8.archive.org/img.php?zip=a&file=b.jp2").unwrap();

        let url = page_request_url(&page, 4);

        assert_eq!(
            url.as_str(),
            "https://ia8.archive.org/img.php?zip=a&file=b.jp2&rotate=0&scale=4"
        );
    }
}
