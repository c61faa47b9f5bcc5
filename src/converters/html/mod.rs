//! Structural parser: markup validation, tree building and section splitting.

pub mod dom;
pub mod selector;
pub mod style;

use markup5ever_rcdom::{Handle, RcDom};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ParseError;
use crate::models::config::{MarkupPolicy, SplitStrategy};
use crate::models::page::{Section, UNTITLED};
use dom::{
    descendants, find_body, find_first, following_siblings, inner_html, outer_html, parse_markup,
    tag_name, text_content,
};
use selector::Selector;

/// A parsed document plus the raw text it came from. Immutable after parsing.
pub struct Document {
    raw: String,
    dom: RcDom,
}

impl Document {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn dom(&self) -> &RcDom {
        &self.dom
    }

    pub fn body(&self) -> Option<Handle> {
        find_body(&self.dom)
    }

    /// Text of the `<title>` element, if present and non-empty.
    pub fn title(&self) -> Option<String> {
        find_first(&self.dom.document, "title")
            .map(|title| text_content(&title))
            .filter(|title| !title.is_empty())
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("raw_len", &self.raw.len())
            .finish()
    }
}

// --- Malformation heuristic ---

static COMMENTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
static SCRIPT_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<script\b").expect("valid regex"));
static SCRIPT_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</script\s*>").expect("valid regex"));
static STYLE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<style\b").expect("valid regex"));
static STYLE_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</style\s*>").expect("valid regex"));
static SCRIPT_STYLE_BLOCKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>").expect("valid regex")
});
// A tag that opens before the previous one closed: `<div <p>`.
static NESTED_BRACKET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[a-zA-Z][^<>]*<[a-zA-Z/!]").expect("valid regex"));

fn check_script_style(text: &str) -> Option<String> {
    for (tag, open, close) in [
        ("script", &*SCRIPT_OPEN, &*SCRIPT_CLOSE),
        ("style", &*STYLE_OPEN, &*STYLE_CLOSE),
    ] {
        let opened = open.find_iter(text).count();
        let closed = close.find_iter(text).count();
        if opened > closed {
            return Some(format!("Unterminated <{}> block", tag));
        }
    }
    None
}

fn check_unclosed_blocks(text: &str, block_tags: &[String]) -> Option<String> {
    for tag in block_tags {
        let tag = regex::escape(&tag.to_ascii_lowercase());
        let (Ok(open), Ok(close)) = (
            Regex::new(&format!(r"(?i)<{}(?:\s[^>]*)?>", tag)),
            Regex::new(&format!(r"(?i)</{}\s*>", tag)),
        ) else {
            continue;
        };
        let opened = open.find_iter(text).count();
        let closed = close.find_iter(text).count();
        if opened > closed {
            return Some(format!(
                "Block element <{}> opened {} time(s) but closed {} time(s)",
                tag, opened, closed
            ));
        }
    }
    None
}

fn check_nested_brackets(text: &str) -> Option<String> {
    NESTED_BRACKET.find(text).map(|m| {
        let snippet: String = m.as_str().chars().take(40).collect();
        format!("Unescaped '<' inside a tag near '{}'", snippet)
    })
}

/// Describes the first malformation found under `policy`, or returns an empty string.
pub fn diagnostic_with(raw: &str, policy: &MarkupPolicy) -> String {
    let text = COMMENTS.replace_all(raw, "");
    if policy.check_script_style {
        if let Some(problem) = check_script_style(&text) {
            return problem;
        }
    }
    // Script and style bodies may legitimately hold anything.
    let text = SCRIPT_STYLE_BLOCKS.replace_all(&text, "");
    if policy.check_unclosed_blocks {
        if let Some(problem) = check_unclosed_blocks(&text, &policy.block_tags) {
            return problem;
        }
    }
    if policy.check_nested_brackets {
        if let Some(problem) = check_nested_brackets(&text) {
            return problem;
        }
    }
    String::new()
}

/// Describes the first malformation found with the default policy, or returns an empty string.
pub fn diagnostic(raw: &str) -> String {
    diagnostic_with(raw, &MarkupPolicy::default())
}

pub fn validate_with(raw: &str, policy: &MarkupPolicy) -> bool {
    diagnostic_with(raw, policy).is_empty()
}

/// Cheap safety net against document-breaking markup. Not a grammar check.
pub fn validate(raw: &str) -> bool {
    validate_with(raw, &MarkupPolicy::default())
}

/// Parses raw markup after validating it against `policy`.
///
/// # Arguments
///
/// * `raw` - The markup to parse.
/// * `policy` - Which malformation checks to run.
///
/// # Returns
///
/// A `Result` containing the `Document` or a `ParseError` carrying the diagnostic.
pub fn parse_with(raw: &str, policy: &MarkupPolicy) -> Result<Document, ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    let diagnostic = diagnostic_with(raw, policy);
    if !diagnostic.is_empty() {
        log::debug!("Markup rejected: {}", diagnostic);
        return Err(ParseError::Malformed { diagnostic });
    }

    let dom = parse_markup(raw);
    if find_body(&dom).is_none() {
        return Err(ParseError::MissingBody);
    }
    Ok(Document {
        raw: raw.to_string(),
        dom,
    })
}

pub fn parse(raw: &str) -> Result<Document, ParseError> {
    parse_with(raw, &MarkupPolicy::default())
}

// --- Section splitting ---

/// Title cascade for an unsplit body: first h1, h2, h3, then `<title>`, then "Untitled".
fn cascade_title(doc: &Document, body: &Handle) -> String {
    for tag in ["h1", "h2", "h3"] {
        let title = descendants(body)
            .into_iter()
            .filter(|node| tag_name(node) == Some(tag))
            .map(|node| text_content(&node))
            .find(|text| !text.is_empty());
        if let Some(title) = title {
            return title;
        }
    }
    doc.title().unwrap_or_else(|| UNTITLED.to_string())
}

fn whole_body_section(doc: &Document, body: &Handle) -> Section {
    let fragment = inner_html(body);
    if text_content(body).is_empty() && !descendants(body).iter().any(|n| tag_name(n).is_some()) {
        return Section::new(UNTITLED, String::new());
    }
    Section::new(cascade_title(doc, body), fragment)
}

fn contains_match(node: &Handle, matcher: &Selector) -> bool {
    descendants(node).iter().any(|n| matcher.matches(n))
}

fn boundary_selector(strategy: &SplitStrategy) -> Option<Selector> {
    match strategy {
        SplitStrategy::ByHeading { level } => Some(Selector::tag(level.tag())),
        SplitStrategy::ByCustomSelector { selector } => {
            let parsed = selector
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .and_then(|s| match Selector::parse(s) {
                    Ok(parsed) => Some(parsed),
                    Err(reason) => {
                        log::warn!("Ignoring custom selector '{}': {}", s, reason);
                        None
                    }
                });
            Some(parsed.unwrap_or_else(|| Selector::tag("h1")))
        }
        SplitStrategy::NoSplit => None,
    }
}

/// Splits the document body into ordered sections.
///
/// Each matching node starts a section made of the node itself plus its following siblings, up
/// to the next sibling that matches or contains a match. With no matches, or with `NoSplit`,
/// the whole body becomes a single section.
///
/// # Arguments
///
/// * `doc` - The parsed document.
/// * `strategy` - Where sections begin.
///
/// # Returns
///
/// The sections in document order, with empty element lists.
pub fn extract_sections(doc: &Document, strategy: &SplitStrategy) -> Vec<Section> {
    let Some(body) = doc.body() else {
        return vec![Section::new(UNTITLED, String::new())];
    };
    let Some(matcher) = boundary_selector(strategy) else {
        return vec![whole_body_section(doc, &body)];
    };

    let boundaries: Vec<Handle> = descendants(&body)
        .into_iter()
        .filter(|node| matcher.matches(node))
        .collect();
    if boundaries.is_empty() {
        log::debug!("No section boundaries matched; using the whole body");
        return vec![whole_body_section(doc, &body)];
    }

    let sections: Vec<Section> = boundaries
        .iter()
        .enumerate()
        .map(|(index, boundary)| {
            let mut fragment = outer_html(boundary);
            for sibling in following_siblings(boundary) {
                if matcher.matches(&sibling) || contains_match(&sibling, &matcher) {
                    break;
                }
                fragment.push_str(&outer_html(&sibling));
            }
            let title = text_content(boundary);
            let title = if title.is_empty() {
                format!("Section {}", index + 1)
            } else {
                title
            };
            Section::new(title, fragment)
        })
        .collect();
    log::debug!("Split document into {} section(s)", sections.len());
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::HeadingLevel;

    fn by_h1() -> SplitStrategy {
        SplitStrategy::ByHeading {
            level: HeadingLevel::H1,
        }
    }

    #[test]
    fn test_validate_accepts_ordinary_markup() {
        let html = "<html><body><!-- <div --><div><p>One<p>Two</div>\
                    <script>if (a < b) {}</script></body></html>";
        assert!(validate(html), "{}", diagnostic(html));
        assert_eq!(diagnostic(html), "");
    }

    #[test]
    fn test_validate_flags_each_heuristic() {
        assert!(diagnostic("<p>x</p><script>var a = 1;").contains("<script>"));
        assert!(diagnostic("<style>p { color: red }").contains("<style>"));
        assert!(diagnostic("<div><p>never closed</p>").contains("<div>"));
        assert!(diagnostic("<div <p>x</p></div>").contains("Unescaped"));
    }

    #[test]
    fn test_policy_can_disable_checks() {
        let policy = MarkupPolicy {
            check_unclosed_blocks: false,
            ..Default::default()
        };
        assert!(validate_with("<div><p>open</p>", &policy));
        let policy = MarkupPolicy {
            block_tags: vec!["p".to_string()],
            ..Default::default()
        };
        assert!(!validate_with("<p>one<p>two</p>", &policy));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse("   ").unwrap_err(), ParseError::Empty);
        assert!(matches!(
            parse("<script>x").unwrap_err(),
            ParseError::Malformed { .. }
        ));
        let doc = parse("<p>hi</p>").unwrap();
        assert_eq!(doc.raw(), "<p>hi</p>");
        assert!(doc.body().is_some());
    }

    #[test]
    fn test_split_by_heading() {
        let doc = parse("<h1>Intro</h1><p>Hello</p><h1>Details</h1><p>World</p>").unwrap();
        let sections = extract_sections(&doc, &by_h1());
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Intro");
        assert_eq!(sections[0].source_fragment, "<h1>Intro</h1><p>Hello</p>");
        assert_eq!(sections[1].title, "Details");
        assert_eq!(sections[1].source_fragment, "<h1>Details</h1><p>World</p>");
    }

    #[test]
    fn test_split_stops_at_container_holding_a_boundary() {
        let doc = parse("<h2>A</h2><p>a</p><div><h2>B</h2><p>b</p></div><p>tail</p>").unwrap();
        let strategy = SplitStrategy::ByHeading {
            level: HeadingLevel::H2,
        };
        let sections = extract_sections(&doc, &strategy);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].source_fragment, "<h2>A</h2><p>a</p>");
        assert_eq!(sections[1].source_fragment, "<h2>B</h2><p>b</p>");
    }

    #[test]
    fn test_empty_heading_gets_numbered_title() {
        let doc = parse("<h1>First</h1><h1>  </h1><p>x</p>").unwrap();
        let sections = extract_sections(&doc, &by_h1());
        assert_eq!(sections[1].title, "Section 2");
    }

    #[test]
    fn test_custom_selector_and_fallback() {
        let html = r#"<section class="slide"><h3>One</h3></section><section class="slide">Two</section>"#;
        let doc = parse(html).unwrap();
        let sections = extract_sections(
            &doc,
            &SplitStrategy::ByCustomSelector {
                selector: Some("section.slide".to_string()),
            },
        );
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].title, "Two");

        let doc = parse("<h1>A</h1><p>a</p>").unwrap();
        let sections = extract_sections(&doc, &SplitStrategy::ByCustomSelector { selector: None });
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "A");
    }

    #[test]
    fn test_no_split_title_cascade() {
        let doc = parse("<html><head><title>Doc</title></head><body><h3>Small</h3><h2>Mid</h2></body></html>").unwrap();
        let sections = extract_sections(&doc, &SplitStrategy::NoSplit);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Mid");

        let doc = parse("<html><head><title>Doc</title></head><body><p>x</p></body></html>").unwrap();
        assert_eq!(extract_sections(&doc, &SplitStrategy::NoSplit)[0].title, "Doc");

        let doc = parse("<p>x</p>").unwrap();
        assert_eq!(extract_sections(&doc, &by_h1())[0].title, UNTITLED);
    }

    #[test]
    fn test_empty_body_is_untitled_and_empty() {
        let doc = parse("<html><head><title>T</title></head><body>  </body></html>").unwrap();
        let sections = extract_sections(&doc, &by_h1());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, UNTITLED);
        assert_eq!(sections[0].source_fragment, "");
    }
}
