//! Small helpers over the `markup5ever_rcdom` tree: tag and attribute access, iterative
//! traversal, text content, and fragment serialization.

use std::rc::Rc;

use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

/// Elements whose text is never rendered.
const NON_RENDERED_TAGS: [&str; 5] = ["script", "style", "noscript", "template", "head"];

/// Builds a fresh tree for `raw`. Each call is an independent, disposable parsing context.
pub fn parse_markup(raw: &str) -> RcDom {
    parse_document(RcDom::default(), ParseOpts::default()).one(raw)
}

/// Local tag name of an element node (always lowercase for HTML elements).
pub fn tag_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

pub fn is_element(node: &Handle) -> bool {
    matches!(node.data, NodeData::Element { .. })
}

/// True if `node` is an element with one of the given tags.
pub fn has_tag(node: &Handle, tags: &[&str]) -> bool {
    tag_name(node).is_some_and(|tag| tags.contains(&tag))
}

/// Value of an attribute, if present.
pub fn attr(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == name)
            .map(|a| String::from(&*a.value)),
        _ => None,
    }
}

/// Value of an attribute, trimmed, or `None` when absent or blank.
pub fn non_empty_attr(node: &Handle, name: &str) -> Option<String> {
    attr(node, name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Raw contents of a text node.
pub fn text_of(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Text { contents } => Some(String::from(&**contents.borrow())),
        _ => None,
    }
}

/// A snapshot of the node's children.
pub fn children(node: &Handle) -> Vec<Handle> {
    node.children.borrow().clone()
}

pub fn element_children(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|child| is_element(child))
        .cloned()
        .collect()
}

pub fn parent(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take()?;
    let parent = weak.upgrade();
    node.parent.set(Some(weak));
    parent
}

/// Siblings after `node`, in document order.
pub fn following_siblings(node: &Handle) -> Vec<Handle> {
    let Some(parent) = parent(node) else {
        return Vec::new();
    };
    let siblings = parent.children.borrow();
    siblings
        .iter()
        .position(|sibling| Rc::ptr_eq(sibling, node))
        .map(|index| siblings[index + 1..].to_vec())
        .unwrap_or_default()
}

/// All descendants of `root` (excluding `root`) in document order.
/// Walks with an explicit stack so deep documents cannot overflow the call stack.
pub fn descendants(root: &Handle) -> Vec<Handle> {
    let mut out = Vec::new();
    let mut stack: Vec<Handle> = children(root).into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        stack.extend(children(&node).into_iter().rev());
        out.push(node);
    }
    out
}

/// Descendant elements matching `predicate`, in document order.
pub fn find_all<F>(root: &Handle, predicate: F) -> Vec<Handle>
where
    F: Fn(&Handle) -> bool,
{
    descendants(root)
        .into_iter()
        .filter(|node| is_element(node) && predicate(node))
        .collect()
}

pub fn find_first(root: &Handle, tag: &str) -> Option<Handle> {
    descendants(root)
        .into_iter()
        .find(|node| tag_name(node) == Some(tag))
}

/// The `<body>` element of a parsed document.
pub fn find_body(dom: &RcDom) -> Option<Handle> {
    find_first(&dom.document, "body")
}

/// Replaces every run of whitespace with a single space, keeping leading/trailing space.
pub fn squash_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Collapses whitespace runs to one space and trims.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Concatenated text of all rendered descendants; `<br>` counts as whitespace.
pub fn raw_text(root: &Handle) -> String {
    let mut out = String::new();
    if let Some(text) = text_of(root) {
        return text;
    }
    let mut stack: Vec<Handle> = children(root).into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        match &node.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { .. } => {
                if has_tag(&node, &NON_RENDERED_TAGS) {
                    continue;
                }
                if has_tag(&node, &["br"]) {
                    out.push(' ');
                }
                stack.extend(children(&node).into_iter().rev());
            }
            _ => {}
        }
    }
    out
}

/// Rendered text of a node: markup stripped, whitespace collapsed and trimmed.
pub fn text_content(node: &Handle) -> String {
    collapse_whitespace(&raw_text(node))
}

fn serialize_with(node: &Handle, scope: TraversalScope) -> String {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: scope,
        ..Default::default()
    };
    let serializable = SerializableHandle::from(node.clone());
    match serialize(&mut output, &serializable, opts) {
        Ok(()) => String::from_utf8_lossy(&output).into_owned(),
        Err(e) => {
            log::warn!("Failed to serialize markup fragment: {}", e);
            String::new()
        }
    }
}

/// Markup of the node itself, children included.
pub fn outer_html(node: &Handle) -> String {
    serialize_with(node, TraversalScope::IncludeNode)
}

/// Markup of the node's children.
pub fn inner_html(node: &Handle) -> String {
    serialize_with(node, TraversalScope::ChildrenOnly(None))
}

#[cfg(test)]
mod tests {
    use super::*;

    // The DOM is returned alongside the body: dropping `RcDom` detaches all children.
    fn body_of(html: &str) -> (RcDom, Handle) {
        let dom = parse_markup(html);
        let body = find_body(&dom).unwrap();
        (dom, body)
    }

    #[test]
    fn test_text_content_skips_scripts_and_collapses() {
        let (_dom, body) = body_of("<p>Hello   <b>big</b>\n world<script>var x = 1;</script></p>");
        assert_eq!(text_content(&body), "Hello big world");
    }

    #[test]
    fn test_br_counts_as_whitespace() {
        let (_dom, body) = body_of("<p>one<br>two</p>");
        assert_eq!(text_content(&body), "one two");
    }

    #[test]
    fn test_descendants_in_document_order() {
        let (_dom, body) = body_of("<div><p>a</p><p>b</p></div><span>c</span>");
        let tags: Vec<String> = descendants(&body)
            .iter()
            .filter_map(|n| tag_name(n).map(str::to_string))
            .collect();
        assert_eq!(tags, vec!["div", "p", "p", "span"]);
    }

    #[test]
    fn test_siblings_and_attributes() {
        let (_dom, body) = body_of(r#"<h1 id="a">A</h1><p class="x">p</p><h1>B</h1>"#);
        let first = element_children(&body).remove(0);
        assert_eq!(attr(&first, "id").as_deref(), Some("a"));
        assert_eq!(attr(&first, "class"), None);
        let after: Vec<String> = following_siblings(&first)
            .iter()
            .filter_map(|n| tag_name(n).map(str::to_string))
            .collect();
        assert_eq!(after, vec!["p", "h1"]);
    }

    #[test]
    fn test_serialization() {
        let (_dom, body) = body_of("<p>a <em>b</em></p>");
        let p = element_children(&body).remove(0);
        assert_eq!(outer_html(&p), "<p>a <em>b</em></p>");
        assert_eq!(inner_html(&p), "a <em>b</em>");
    }

    #[test]
    fn test_squash_keeps_edges() {
        assert_eq!(squash_whitespace("  a \n\t b  "), " a b ");
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
    }
}
