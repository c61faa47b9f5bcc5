//! Image extraction from `<img>` elements.

use markup5ever_rcdom::Handle;

use crate::converters::html::dom::{find_all, find_body, has_tag, non_empty_attr, parse_markup};
use crate::converters::html::style::{css_length_to_px, inline_style};
use crate::models::image::{ImageResource, ImageStyle, DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH};
use crate::models::properties::Alignment;

/// First available of: explicit attribute, inline style size, fallback constant.
fn dimension(attribute: Option<String>, styled: Option<&String>, fallback: u32) -> u32 {
    attribute
        .as_deref()
        .and_then(css_length_to_px)
        .or_else(|| styled.and_then(|value| css_length_to_px(value)))
        .unwrap_or(fallback)
}

fn image_style(node: &Handle) -> ImageStyle {
    let styles = inline_style(node);

    let border = non_empty_attr(node, "border")
        .map(|border| match border.parse::<u32>() {
            Ok(width) => format!("{}px solid", width),
            Err(_) => border,
        })
        .or_else(|| styles.get("border").cloned());

    let margin = non_empty_attr(node, "hspace")
        .and_then(|hspace| hspace.parse::<u32>().ok())
        .map(|hspace| format!("{}px", hspace))
        .or_else(|| styles.get("margin").cloned());

    let align = non_empty_attr(node, "align")
        .and_then(|align| Alignment::parse(&align))
        .or_else(|| styles.get("float").and_then(|float| Alignment::parse(float)))
        .unwrap_or(Alignment::Center);

    ImageStyle {
        border,
        margin,
        align,
    }
}

/// Reads one `<img>` element. Images without a `src` yield `None`.
pub fn extract_image(node: &Handle) -> Option<ImageResource> {
    if !has_tag(node, &["img"]) {
        return None;
    }
    let Some(src) = non_empty_attr(node, "src") else {
        log::debug!("Dropping <img> without src");
        return None;
    };
    let styles = inline_style(node);

    let width = dimension(
        non_empty_attr(node, "width"),
        styles.get("width"),
        DEFAULT_IMAGE_WIDTH,
    );
    let height = dimension(
        non_empty_attr(node, "height"),
        styles.get("height"),
        DEFAULT_IMAGE_HEIGHT,
    );
    let data_uri = src
        .get(..5)
        .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
        .map(|_| src.clone());

    Some(ImageResource {
        alt: non_empty_attr(node, "alt").unwrap_or_default(),
        src,
        width,
        height,
        data_uri,
        style: Some(image_style(node)),
    })
}

/// Every image in a markup fragment, in document order.
pub fn extract_images(fragment: &str) -> Vec<ImageResource> {
    let dom = parse_markup(fragment);
    let Some(body) = find_body(&dom) else {
        return Vec::new();
    };
    find_all(&body, |node| has_tag(node, &["img"]))
        .iter()
        .filter_map(extract_image)
        .collect()
}
