//! Text and formatting extraction, including run flattening.

use indexmap::IndexMap;
use markup5ever_rcdom::{Handle, NodeData};

use crate::converters::html::dom::{
    attr, children, descendants, find_body, has_tag, parse_markup, raw_text, squash_whitespace,
    tag_name, text_content,
};
use crate::converters::html::{diagnostic, style};
use crate::errors::TextExtractionError;
use crate::models::properties::{Alignment, FormatDescriptor};
use crate::models::text::TextResource;

/// Elements that carry inline formatting.
pub const INLINE_FORMATTING_TAGS: [&str; 17] = [
    "strong", "b", "em", "i", "u", "ins", "s", "strike", "del", "sup", "sub", "span", "font",
    "mark", "code", "small", "big",
];

const SKIPPED_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Formatting implied by the tag name alone.
fn tag_format(tag: &str) -> FormatDescriptor {
    let mut format = FormatDescriptor::default();
    match tag {
        "strong" | "b" => format.bold = Some(true),
        "em" | "i" => format.italic = Some(true),
        "u" | "ins" => format.underline = Some(true),
        "s" | "strike" | "del" => format.strikethrough = Some(true),
        "sup" => format.superscript = Some(true),
        "sub" => format.subscript = Some(true),
        "mark" => format.background_color = Some("yellow".to_string()),
        "code" => format.font_family = Some("Courier New".to_string()),
        _ => {}
    }
    format
}

/// Formatting implied by inline style declarations.
fn style_format(styles: &IndexMap<String, String>) -> FormatDescriptor {
    let mut format = FormatDescriptor::default();
    let get = |name: &str| styles.get(name).map(|v| v.to_ascii_lowercase());

    if let Some(weight) = get("font-weight") {
        let numeric = weight.parse::<u32>().ok();
        if weight == "bold" || weight == "bolder" || numeric.is_some_and(|w| w >= 600) {
            format.bold = Some(true);
        }
    }
    if let Some(font_style) = get("font-style") {
        if font_style == "italic" || font_style == "oblique" {
            format.italic = Some(true);
        }
    }
    let decoration = [get("text-decoration"), get("text-decoration-line")]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    if decoration.contains("underline") {
        format.underline = Some(true);
    }
    if decoration.contains("line-through") {
        format.strikethrough = Some(true);
    }
    match get("vertical-align").as_deref() {
        Some("super") => format.superscript = Some(true),
        Some("sub") => format.subscript = Some(true),
        _ => {}
    }

    format.color = styles.get("color").cloned();
    format.background_color = styles
        .get("background-color")
        .or_else(|| styles.get("background"))
        .cloned();
    format.font_family = styles
        .get("font-family")
        .and_then(|family| style::primary_font_family(family));
    format.font_size = styles.get("font-size").cloned();
    format.alignment = styles.get("text-align").and_then(|a| Alignment::parse(a));
    format
}

/// Formatting an element contributes on its own: tag, legacy attributes and inline style.
fn own_format(node: &Handle) -> FormatDescriptor {
    let Some(tag) = tag_name(node) else {
        return FormatDescriptor::default();
    };
    let mut format = tag_format(tag);
    format.heading_level = heading_level(tag);
    if tag == "font" {
        format.color = attr(node, "color");
        format.font_family = attr(node, "face");
    }

    let mut format = format.inherit(&style_format(&style::inline_style(node)));
    if format.alignment.is_none() {
        format.alignment = attr(node, "align")
            .and_then(|align| Alignment::parse(&align));
    }
    format
}

/// Reads the formatting of an element.
///
/// Boolean flags come from the element's tag, its inline style, or the tag of its nearest
/// ancestor. Alignment comes from the inline style, then the `align` attribute.
/// Unset fields stay `None`.
///
/// # Arguments
///
/// * `node` - The element to read.
/// * `parent` - Its nearest ancestor element, when known.
///
/// # Returns
///
/// A `Result` containing the `FormatDescriptor`, or `TextExtractionError::EmptyFragment` if
/// `node` is not an element.
pub fn parse_formatting(
    node: &Handle,
    parent: Option<&Handle>,
) -> Result<FormatDescriptor, TextExtractionError> {
    if tag_name(node).is_none() {
        return Err(TextExtractionError::EmptyFragment);
    }
    let format = own_format(node);
    let inherited = parent
        .and_then(tag_name)
        .map(tag_format)
        .unwrap_or_default();
    let mut merged = inherited.inherit(&format);
    // Only the ancestor's flags are inherited.
    merged.background_color = format.background_color;
    merged.font_family = format.font_family;
    Ok(merged)
}

/// Number of inline-formatting elements below `root`.
fn inline_formatting_count(root: &Handle) -> usize {
    descendants(root)
        .iter()
        .filter(|node| has_tag(node, &INLINE_FORMATTING_TAGS))
        .count()
}

/// Flattens the text below `root` into runs.
///
/// Each text node becomes a run carrying the merged formatting of its ancestors up to `root`
/// (flags OR'd, innermost value wins for everything else), with every flag explicit.
/// Whitespace-only text between runs is folded into the previous run. Walks with an explicit
/// stack.
pub fn generate_complex_text_elements(root: &Handle) -> Vec<TextResource> {
    let root_format = match tag_name(root) {
        Some(_) => own_format(root),
        None => FormatDescriptor::default(),
    };
    let nested = inline_formatting_count(root) > 1;

    let mut runs: Vec<TextResource> = Vec::new();
    let push_text = |runs: &mut Vec<TextResource>, text: &str, format: &FormatDescriptor| {
        let text = squash_whitespace(text);
        if text.trim().is_empty() {
            if let Some(last) = runs.last_mut() {
                if !last.content.ends_with(char::is_whitespace) {
                    last.content.push(' ');
                }
            }
            return;
        }
        let mut format = format.clone().with_explicit_flags();
        format.has_nested_formatting = Some(nested);
        runs.push(TextResource::new(text, format));
    };

    if let NodeData::Text { .. } = root.data {
        push_text(&mut runs, &raw_text(root), &root_format);
        return runs;
    }

    let mut stack: Vec<(Handle, FormatDescriptor)> = children(root)
        .into_iter()
        .rev()
        .map(|child| (child, root_format.clone()))
        .collect();

    while let Some((node, format)) = stack.pop() {
        match &node.data {
            NodeData::Text { contents } => {
                let text = String::from(&**contents.borrow());
                push_text(&mut runs, &text, &format);
            }
            NodeData::Element { .. } => {
                if has_tag(&node, &SKIPPED_TAGS) {
                    continue;
                }
                if has_tag(&node, &["br"]) {
                    if let Some(last) = runs.last_mut() {
                        last.content.push('\n');
                    }
                    continue;
                }
                let merged = format.inherit(&own_format(&node));
                stack.extend(
                    children(&node)
                        .into_iter()
                        .rev()
                        .map(|child| (child, merged.clone())),
                );
            }
            _ => {}
        }
    }
    runs
}

/// Builds the block-level text resource for an element: collapsed content, the element's own
/// formatting, and flattened runs when the block mixes inline formatting.
pub fn extract_block(
    node: &Handle,
    parent: Option<&Handle>,
) -> Result<TextResource, TextExtractionError> {
    let content = text_content(node);
    if content.is_empty() {
        return Err(TextExtractionError::EmptyFragment);
    }
    let mut format = parse_formatting(node, parent)?;
    let formatting_count = inline_formatting_count(node);
    format.has_nested_formatting = Some(formatting_count > 1);

    let mut resource = TextResource::new(content, format);
    if formatting_count > 0 {
        resource.runs = generate_complex_text_elements(node);
    }
    Ok(resource)
}

/// Parses a standalone fragment and returns its first top-level node.
fn fragment_root(fragment: &str) -> Result<Handle, TextExtractionError> {
    let problem = diagnostic(fragment);
    if !problem.is_empty() {
        return Err(TextExtractionError::MalformedFragment(problem));
    }
    let dom = parse_markup(fragment);
    let body = find_body(&dom).ok_or(TextExtractionError::EmptyFragment)?;
    let root = children(&body)
        .into_iter()
        .find(|node| tag_name(node).is_some() || !raw_text(node).trim().is_empty())
        .ok_or(TextExtractionError::EmptyFragment)?;
    Ok(root)
}

/// `parse_formatting` over a markup string; the first top-level element is the root.
pub fn parse_formatting_html(fragment: &str) -> Result<FormatDescriptor, TextExtractionError> {
    let root = fragment_root(fragment)?;
    parse_formatting(&root, None)
}

/// Rendered text of a markup fragment, markup stripped and whitespace collapsed.
pub fn extract_text(fragment: &str) -> Result<String, TextExtractionError> {
    let problem = diagnostic(fragment);
    if !problem.is_empty() {
        return Err(TextExtractionError::MalformedFragment(problem));
    }
    let dom = parse_markup(fragment);
    let body = find_body(&dom).ok_or(TextExtractionError::EmptyFragment)?;
    Ok(text_content(&body))
}

/// Run flattening over a markup string. Every top-level node of the fragment contributes runs.
pub fn generate_complex_text_elements_html(
    fragment: &str,
) -> Result<Vec<TextResource>, TextExtractionError> {
    let problem = diagnostic(fragment);
    if !problem.is_empty() {
        return Err(TextExtractionError::MalformedFragment(problem));
    }
    let dom = parse_markup(fragment);
    let body = find_body(&dom).ok_or(TextExtractionError::EmptyFragment)?;
    Ok(generate_complex_text_elements(&body))
}
