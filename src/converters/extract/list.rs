//! List extraction and item formatting.

use markup5ever_rcdom::{Handle, NodeData};

use crate::converters::html::dom::{
    children, descendants, element_children, find_all, find_body, has_tag, inner_html,
    non_empty_attr, parse_markup, squash_whitespace, tag_name,
};
use crate::converters::html::style::{inline_style, primary_font_family};
use crate::errors::ListExtractionError;
use crate::models::bullet::{BulletKind, DISC_GLYPH};
use crate::models::list::{ListResource, ListStyle};

/// Prefix of a flattened nested item.
pub const NESTED_INDENT: &str = "    ";

const LIST_TAGS: [&str; 2] = ["ul", "ol"];

/// Elements that end a line in plain-text rendering.
const LINE_BLOCK_TAGS: [&str; 12] = [
    "p", "div", "li", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "tr",
];

/// Extracts a `<ul>` or `<ol>` element. Items keep their inner markup.
pub fn extract_list(node: &Handle) -> Result<ListResource, ListExtractionError> {
    let ordered = match tag_name(node) {
        Some("ol") => true,
        Some("ul") => false,
        Some(other) => return Err(ListExtractionError::NotAList(other.to_string())),
        None => return Err(ListExtractionError::NotAList("#text".to_string())),
    };

    let items: Vec<String> = element_children(node)
        .iter()
        .filter(|child| has_tag(child, &["li"]))
        .map(inner_html)
        .collect();

    let list_type = if ordered {
        let code = non_empty_attr(node, "type");
        BulletKind::from_type(true, code.as_deref()).type_code()
    } else {
        BulletKind::Disc.type_code()
    };
    let start = if ordered {
        non_empty_attr(node, "start")
            .and_then(|start| start.parse::<u32>().ok())
            .filter(|start| *start >= 1)
            .unwrap_or(1)
    } else {
        1
    };

    let styles = inline_style(node);
    Ok(ListResource {
        items,
        ordered,
        style: ListStyle {
            list_type: list_type.to_string(),
            start,
            font_size: styles.get("font-size").cloned(),
            font_family: styles
                .get("font-family")
                .and_then(|family| primary_font_family(family)),
            color: styles.get("color").cloned(),
        },
    })
}

/// Every list in a markup fragment that is not itself nested in another list.
pub fn extract_lists(fragment: &str) -> Vec<ListResource> {
    let dom = parse_markup(fragment);
    let Some(body) = find_body(&dom) else {
        return Vec::new();
    };
    let nested: Vec<Handle> = find_all(&body, |node| has_tag(node, &LIST_TAGS))
        .iter()
        .flat_map(descendants)
        .filter(|node| has_tag(node, &LIST_TAGS))
        .collect();
    find_all(&body, |node| has_tag(node, &LIST_TAGS))
        .iter()
        .filter(|list| !nested.iter().any(|n| std::rc::Rc::ptr_eq(n, list)))
        .filter_map(|list| extract_list(list).ok())
        .collect()
}

/// Plain text of `root` with line breaks at `<br>` and block boundaries.
/// With `skip_lists`, nested `<ul>`/`<ol>` content is left out.
fn plain_lines(root: &Handle, skip_lists: bool) -> Vec<String> {
    enum Step {
        Enter(Handle),
        Break,
    }

    let mut text = String::new();
    let mut stack: Vec<Step> = children(root).into_iter().rev().map(Step::Enter).collect();
    while let Some(step) = stack.pop() {
        let node = match step {
            Step::Break => {
                text.push('\n');
                continue;
            }
            Step::Enter(node) => node,
        };
        match &node.data {
            NodeData::Text { contents } => text.push_str(&squash_whitespace(&contents.borrow())),
            NodeData::Element { .. } => {
                if has_tag(&node, &["script", "style", "template"]) {
                    continue;
                }
                if skip_lists && has_tag(&node, &LIST_TAGS) {
                    continue;
                }
                if has_tag(&node, &["br"]) {
                    text.push('\n');
                    continue;
                }
                let is_block = has_tag(&node, &LINE_BLOCK_TAGS);
                if is_block {
                    text.push('\n');
                    stack.push(Step::Break);
                }
                stack.extend(children(&node).into_iter().rev().map(Step::Enter));
            }
            _ => {}
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Formats one item's markup as plain text.
///
/// Inline markup is stripped, `<br>` and paragraphs become newlines, and nested lists are
/// flattened to one indented, bulleted line per nested `<li>`.
pub fn format_list_item(html: &str) -> Result<String, ListExtractionError> {
    let dom = parse_markup(html);
    let body = find_body(&dom).ok_or_else(|| ListExtractionError::MalformedItem(html.to_string()))?;

    let mut lines = plain_lines(&body, true);
    for nested in find_all(&body, |node| has_tag(node, &["li"])) {
        let text = plain_lines(&nested, true).join(" ");
        if !text.is_empty() {
            lines.push(format!("{}{} {}", NESTED_INDENT, DISC_GLYPH, text));
        }
    }
    Ok(lines.join("\n"))
}

/// Formats every item of a list. Items that fail to format fall back to their raw markup.
pub fn format_list_items(list: &ListResource) -> Vec<String> {
    list.items
        .iter()
        .map(|item| {
            format_list_item(item).unwrap_or_else(|e| {
                log::warn!("Using raw list item: {}", e);
                item.clone()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bullet::{BulletDescriptor, BulletKind};
    use proptest::prelude::*;

    #[test]
    fn test_ordered_list_with_type_and_start() {
        let lists = extract_lists(r#"<ol type="A" start="3"><li>x</li></ol>"#);
        assert_eq!(lists.len(), 1);
        let list = &lists[0];
        assert!(list.ordered);
        assert_eq!(list.items, vec!["x"]);
        assert_eq!(
            list.bullet(),
            BulletDescriptor {
                kind: BulletKind::UpperLetter,
                glyph: None,
                start: Some(3),
            }
        );
    }

    #[test]
    fn test_invalid_attributes_fall_back() {
        let lists = extract_lists(
            r#"<ol type="Q" start="-2"><li>a</li></ol><ul type="square" style="color: red; font-family: 'Fira Sans'"><li>b</li></ul>"#,
        );
        assert_eq!(lists[0].style.list_type, "1");
        assert_eq!(lists[0].style.start, 1);
        assert_eq!(lists[1].style.list_type, "disc");
        assert_eq!(lists[1].style.color.as_deref(), Some("red"));
        assert_eq!(lists[1].style.font_family.as_deref(), Some("Fira Sans"));
        assert_eq!(lists[1].bullet().glyph.as_deref(), Some(DISC_GLYPH));
    }

    #[test]
    fn test_nested_lists_are_not_extracted_twice() {
        let lists = extract_lists("<ul><li>a<ul><li>b</li></ul></li></ul>");
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].items, vec!["a<ul><li>b</li></ul>"]);
    }

    #[test]
    fn test_format_item_strips_markup_and_breaks_lines() {
        assert_eq!(
            format_list_item("<b>Bold</b> and <i>more</i>").unwrap(),
            "Bold and more"
        );
        assert_eq!(
            format_list_item("first<br>second<p>third</p>").unwrap(),
            "first\nsecond\nthird"
        );
    }

    #[test]
    fn test_format_item_flattens_nesting() {
        let formatted =
            format_list_item(" Main <ul><li>one</li><li>two<ol><li>deep</li></ol></li></ul>")
                .unwrap();
        assert_eq!(
            formatted,
            "Main\n    \u{2022} one\n    \u{2022} two\n    \u{2022} deep"
        );
    }

    proptest! {
        #[test]
        fn prop_bullet_mapping_is_total(code in "\\PC{0,3}", ordered in any::<bool>()) {
            let kind = BulletKind::from_type(ordered, Some(&code));
            let expected = match (ordered, code.trim()) {
                (false, _) => BulletKind::Disc,
                (true, "A") => BulletKind::UpperLetter,
                (true, "a") => BulletKind::LowerLetter,
                (true, "I") => BulletKind::UpperRoman,
                (true, "i") => BulletKind::LowerRoman,
                (true, _) => BulletKind::Decimal,
            };
            prop_assert_eq!(kind, expected);
        }
    }
}
