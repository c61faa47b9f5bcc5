//! Hyperlink extraction and URL normalization.

use markup5ever_rcdom::Handle;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::converters::html::dom::{
    attr, find_all, find_body, has_tag, parse_markup, tag_name, text_content,
};
use crate::errors::LinkExtractionError;
use crate::models::link::LinkResource;

static SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^([a-zA-Z][a-zA-Z0-9+.\-]*):(.*)$").expect("valid regex"));
static PORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(?:[/?#]|$)").expect("valid regex"));

const KNOWN_SCHEMES: [&str; 12] = [
    "http", "https", "mailto", "tel", "ftp", "ftps", "file", "data", "sms", "javascript", "news",
    "irc",
];

/// The scheme of `url`, if it has one. `host:port` and dotted hosts are not schemes.
fn scheme_of(url: &str) -> Option<&str> {
    let caps = SCHEME.captures(url)?;
    let scheme = caps.get(1)?.as_str();
    let rest = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
    if KNOWN_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str()) {
        return Some(scheme);
    }
    if scheme.contains('.') || PORT.is_match(rest) {
        return None;
    }
    Some(scheme)
}

/// Normalizes an `href` for the deck.
///
/// Empty becomes `#`, fragments and root-relative paths are kept, other schemes are kept,
/// `http` is upgraded to `https`, and scheme-less addresses get `https://`. Idempotent.
pub fn normalize_url(href: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return "#".to_string();
    }
    if href.starts_with('#') {
        return href.to_string();
    }
    match scheme_of(href) {
        Some(scheme) if scheme.eq_ignore_ascii_case("http") => {
            format!("https:{}", &href[scheme.len() + 1..])
        }
        Some(_) => href.to_string(),
        None if href.starts_with('/') => href.to_string(),
        None => format!("https://{}", href),
    }
}

/// Reads an `<a>` element. Anchors without an href or visible text are rejected.
pub fn extract_link(node: &Handle) -> Result<LinkResource, LinkExtractionError> {
    match tag_name(node) {
        Some("a") => {}
        Some(other) => return Err(LinkExtractionError::NotAnAnchor(other.to_string())),
        None => return Err(LinkExtractionError::NotAnAnchor("#text".to_string())),
    }
    let href = attr(node, "href").unwrap_or_default();
    if href.trim().is_empty() {
        return Err(LinkExtractionError::EmptyHref);
    }
    let text = text_content(node);
    if text.is_empty() {
        return Err(LinkExtractionError::EmptyText);
    }
    Ok(LinkResource {
        text,
        href: normalize_url(&href),
    })
}

/// Every usable link in a markup fragment, in document order.
pub fn extract_links(fragment: &str) -> Vec<LinkResource> {
    let dom = parse_markup(fragment);
    let Some(body) = find_body(&dom) else {
        return Vec::new();
    };
    find_all(&body, |node| has_tag(node, &["a"]))
        .iter()
        .filter_map(|anchor| match extract_link(anchor) {
            Ok(link) => Some(link),
            Err(e) => {
                log::debug!("Skipping anchor: {}", e);
                None
            }
        })
        .collect()
}

/// Rendered text of an anchor's markup.
pub fn extract_link_text(html: &str) -> String {
    let dom = parse_markup(html);
    find_body(&dom)
        .map(|body| text_content(&body))
        .unwrap_or_default()
}
