//! Section assembler: binds extracted resources to each section as an ordered element list.

use markup5ever_rcdom::{Handle, NodeData};

use crate::converters::extract::{
    extract_block, extract_image, extract_link, extract_list, extract_table,
};
use crate::converters::html::dom::{
    attr, children, collapse_whitespace, descendants, find_body, has_tag, parse_markup,
    raw_text, tag_name, text_content,
};
use crate::converters::html::style::parse_style;
use crate::converters::html::{extract_sections, Document};
use crate::models::config::ConversionConfig;
use crate::models::elements::{ElementResource, SlideElement, StyleMap};
use crate::models::image::ImageResource;
use crate::models::link::LinkResource;
use crate::models::list::ListResource;
use crate::models::page::{Section, UNTITLED};
use crate::models::table::TableResource;
use crate::models::text::TextResource;

/// Attribute holding per-element style overrides, written like an inline style:
/// `data-slide-style="y: 2.5; color: #c00"`.
pub const ELEMENT_STYLE_ATTR: &str = "data-slide-style";

const SKIPPED_TAGS: [&str; 14] = [
    "script", "style", "noscript", "template", "head", "title", "meta", "link", "iframe",
    "object", "svg", "canvas", "video", "audio",
];

/// Elements whose presence makes a container a layout wrapper rather than a text block.
const BLOCK_TAGS: [&str; 29] = [
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "div", "section", "article", "main", "header",
    "footer", "nav", "aside", "figure", "figcaption", "blockquote", "pre", "ul", "ol", "dl",
    "dt", "dd", "table", "form", "fieldset", "details", "address",
];

/// Maps authored style keys to the keys the slide assembler reads.
fn canonical_style_key(key: &str) -> String {
    match key {
        "font-size" | "fontsize" => "fontSize".to_string(),
        "font-face" | "fontface" | "font-family" => "fontFace".to_string(),
        other => other.to_string(),
    }
}

/// Element-level style overrides from the `data-slide-style` attribute.
fn element_style(node: &Handle) -> Option<StyleMap> {
    let declarations = parse_style(&attr(node, ELEMENT_STYLE_ATTR)?);
    let styles: StyleMap = declarations
        .into_iter()
        .map(|(key, value)| (canonical_style_key(&key), value))
        .collect();
    (!styles.is_empty()).then_some(styles)
}

fn has_block_descendant(node: &Handle) -> bool {
    descendants(node)
        .iter()
        .any(|descendant| has_tag(descendant, &BLOCK_TAGS))
}

struct Collector<'a> {
    elements: Vec<SlideElement>,
    title: Option<&'a str>,
    title_skipped: bool,
}

impl Collector<'_> {
    fn push(&mut self, resource: ElementResource, node: Option<&Handle>) {
        self.elements.push(SlideElement {
            resource,
            style: node.and_then(element_style),
        });
    }

    fn push_image(&mut self, node: &Handle) {
        if let Some(image) = extract_image(node) {
            self.push(ElementResource::Image(image), Some(node));
        }
    }

    fn push_link(&mut self, node: &Handle) {
        match extract_link(node) {
            Ok(link) => self.push(ElementResource::Link(link), Some(node)),
            Err(e) => log::debug!("Skipping anchor: {}", e),
        }
    }

    /// Images and anchors below `node`, in document order.
    fn push_nested_media(&mut self, node: &Handle) {
        for descendant in descendants(node) {
            match tag_name(&descendant) {
                Some("img") => self.push_image(&descendant),
                Some("a") => self.push_link(&descendant),
                _ => {}
            }
        }
    }

    fn push_table(&mut self, node: &Handle) {
        match extract_table(node) {
            Ok(table) => self.push(ElementResource::Table(table), Some(node)),
            Err(e) => {
                log::warn!("Table extraction failed, keeping its text: {}", e);
                self.push_plain_text(node);
            }
        }
        self.push_nested_media(node);
    }

    fn push_list(&mut self, node: &Handle) {
        match extract_list(node) {
            Ok(list) => self.push(ElementResource::List(list), Some(node)),
            Err(e) => {
                log::warn!("List extraction failed, keeping its text: {}", e);
                self.push_plain_text(node);
            }
        }
        self.push_nested_media(node);
    }

    fn push_plain_text(&mut self, node: &Handle) {
        let content = text_content(node);
        if !content.is_empty() {
            self.push(
                ElementResource::Text(TextResource::new(content, Default::default())),
                Some(node),
            );
        }
    }

    fn push_block(&mut self, node: &Handle) {
        let content = text_content(node);
        if !content.is_empty() {
            if !self.title_skipped && self.title == Some(content.as_str()) {
                self.title_skipped = true;
            } else {
                match extract_block(node, None) {
                    Ok(text) => self.push(ElementResource::Text(text), Some(node)),
                    Err(e) => {
                        log::warn!("Text extraction failed, using plain text: {}", e);
                        self.push_plain_text(node);
                    }
                }
            }
        }
        self.push_nested_media(node);
    }
}

/// Walks the nodes below `root` and builds slide elements in document order.
///
/// Tables, lists and images become their own elements. Anchors become link elements, and their
/// images and block content are still collected. Containers holding block content are
/// descended into; anything else becomes one text block. The first block whose text equals
/// `title` is skipped so the slide title is not repeated.
pub fn collect_elements(root: &Handle, title: Option<&str>) -> Vec<SlideElement> {
    let mut collector = Collector {
        elements: Vec::new(),
        title: title.filter(|title| *title != UNTITLED),
        title_skipped: false,
    };

    let mut stack: Vec<Handle> = children(root).into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        match &node.data {
            NodeData::Text { .. } => {
                let text = collapse_whitespace(&raw_text(&node));
                if !text.is_empty() {
                    collector.push(
                        ElementResource::Text(TextResource::new(text, Default::default())),
                        None,
                    );
                }
            }
            NodeData::Element { .. } => match tag_name(&node).unwrap_or_default() {
                tag if SKIPPED_TAGS.contains(&tag) => {}
                "br" | "hr" => {}
                "img" => collector.push_image(&node),
                "a" => {
                    collector.push_link(&node);
                    if has_block_descendant(&node) {
                        stack.extend(children(&node).into_iter().rev());
                    } else {
                        collector.push_nested_media(&node);
                    }
                }
                "table" => collector.push_table(&node),
                "ul" | "ol" => collector.push_list(&node),
                _ if has_block_descendant(&node) => {
                    stack.extend(children(&node).into_iter().rev());
                }
                _ => collector.push_block(&node),
            },
            _ => {}
        }
    }
    collector.elements
}

/// Fills a section's elements from its source fragment, parsed in a fresh context.
pub fn populate_section(section: &mut Section) {
    let dom = parse_markup(&section.source_fragment);
    let Some(body) = find_body(&dom) else {
        return;
    };
    section.elements = collect_elements(&body, Some(&section.title));
    log::debug!(
        "Section '{}' has {} element(s)",
        section.title,
        section.elements.len()
    );
}

/// Splits the document per `config.split` and populates every section.
pub fn build_sections(doc: &Document, config: &ConversionConfig) -> Vec<Section> {
    let mut sections = extract_sections(doc, &config.split);
    for section in &mut sections {
        populate_section(section);
    }
    sections
}

/// Resources of a whole document, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedResources {
    pub texts: Vec<TextResource>,
    pub images: Vec<ImageResource>,
    pub tables: Vec<TableResource>,
    pub lists: Vec<ListResource>,
    pub links: Vec<LinkResource>,
}

impl ExtractedResources {
    /// Extracts every resource of the document body.
    pub fn from_document(doc: &Document) -> Self {
        let elements = doc
            .body()
            .map(|body| collect_elements(&body, None))
            .unwrap_or_default();
        Self::from_elements(elements)
    }

    pub fn from_elements(elements: Vec<SlideElement>) -> Self {
        let mut resources = Self::default();
        for element in elements {
            match element.resource {
                ElementResource::Text(text) => resources.texts.push(text),
                ElementResource::Image(image) => resources.images.push(image),
                ElementResource::Table(table) => resources.tables.push(table),
                ElementResource::List(list) => resources.lists.push(list),
                ElementResource::Link(link) => resources.links.push(link),
            }
        }
        resources
    }

    /// Elements in fixed kind order: texts, images, tables, lists.
    pub fn into_elements(self) -> Vec<SlideElement> {
        let texts = self.texts.into_iter().map(ElementResource::Text);
        let images = self.images.into_iter().map(ElementResource::Image);
        let tables = self.tables.into_iter().map(ElementResource::Table);
        let lists = self.lists.into_iter().map(ElementResource::List);
        texts
            .chain(images)
            .chain(tables)
            .chain(lists)
            .map(SlideElement::new)
            .collect()
    }

    /// A single "Untitled" section holding every resource.
    pub fn into_section(self) -> Section {
        let mut section = Section::new(UNTITLED, String::new());
        section.elements = self.into_elements();
        section
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::html::parse;
    use crate::models::elements::ElementKind;

    fn kinds(elements: &[SlideElement]) -> Vec<ElementKind> {
        elements.iter().map(SlideElement::kind).collect()
    }

    #[test]
    fn test_scenario_sections_get_one_text_each() {
        let doc = parse("<h1>Intro</h1><p>Hello</p><h1>Details</h1><p>World</p>").unwrap();
        let sections = build_sections(&doc, &ConversionConfig::default());
        assert_eq!(sections.len(), 2);
        for (section, body) in sections.iter().zip(["Hello", "World"]) {
            assert_eq!(kinds(&section.elements), vec![ElementKind::Text]);
            match &section.elements[0].resource {
                ElementResource::Text(text) => assert_eq!(text.content, body),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_elements_in_document_order() {
        let doc = parse(
            r#"<h1>T</h1><div><p>Para with <a href="x.com">link</a></p>
               <img src="a.png"><ul><li>i</li></ul></div>
               <table><tr><td>c</td></tr></table><p>end</p>"#,
        )
        .unwrap();
        let sections = build_sections(&doc, &ConversionConfig::default());
        assert_eq!(
            kinds(&sections[0].elements),
            vec![
                ElementKind::Text,
                ElementKind::Link,
                ElementKind::Image,
                ElementKind::List,
                ElementKind::Table,
                ElementKind::Text,
            ]
        );
    }

    #[test]
    fn test_anchor_content_is_kept() {
        let doc = parse(r#"<h1>Logo</h1><a href="https://x.test"><img src="logo.png"></a><p>t</p>"#)
            .unwrap();
        let sections = build_sections(&doc, &ConversionConfig::default());
        assert_eq!(
            kinds(&sections[0].elements),
            vec![ElementKind::Image, ElementKind::Text]
        );

        let doc = parse(
            r#"<a href="https://x.test"><div><p>Intro</p><ul><li>a</li></ul></div></a>"#,
        )
        .unwrap();
        let elements = collect_elements(&doc.body().unwrap(), None);
        assert_eq!(
            kinds(&elements),
            vec![ElementKind::Link, ElementKind::Text, ElementKind::List]
        );
        match &elements[0].resource {
            ElementResource::Link(link) => assert_eq!(link.href, "https://x.test"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_inline_container_is_one_text_block() {
        let doc = parse(r#"<div>Some <b>bold</b> words <img src="i.png"></div>"#).unwrap();
        let body = doc.body().unwrap();
        let elements = collect_elements(&body, None);
        assert_eq!(kinds(&elements), vec![ElementKind::Text, ElementKind::Image]);
        match &elements[0].resource {
            ElementResource::Text(text) => {
                assert_eq!(text.content, "Some bold words");
                assert_eq!(text.runs.len(), 3);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_scripts_skipped_and_element_styles_read() {
        let doc = parse(
            r#"<script>var a;</script><p data-slide-style="y: 3; font-size: 20pt">styled</p>"#,
        )
        .unwrap();
        let elements = collect_elements(&doc.body().unwrap(), None);
        assert_eq!(elements.len(), 1);
        let style = elements[0].style.as_ref().unwrap();
        assert_eq!(style.get("y").map(String::as_str), Some("3"));
        assert_eq!(style.get("fontSize").map(String::as_str), Some("20pt"));
    }

    #[test]
    fn test_untitled_title_is_not_skipped() {
        let doc = parse("<p>Untitled</p>").unwrap();
        let sections = build_sections(&doc, &ConversionConfig::default());
        assert_eq!(sections[0].title, UNTITLED);
        assert_eq!(sections[0].elements.len(), 1);
    }

    #[test]
    fn test_extracted_resources_fixed_kind_order() {
        let doc = parse(r#"<ul><li>l</li></ul><img src="a.png"><p>t</p>"#).unwrap();
        let resources = ExtractedResources::from_document(&doc);
        assert_eq!(resources.lists.len(), 1);
        let section = resources.into_section();
        assert_eq!(section.title, UNTITLED);
        assert_eq!(
            kinds(&section.elements),
            vec![ElementKind::Text, ElementKind::Image, ElementKind::List]
        );
    }
}
