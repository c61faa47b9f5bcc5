use std::cell::RefCell;
use std::io::Cursor;

use html2slides::backend::{ImageData, ImagePlacement, ListOptions, TableOptions};
use html2slides::converters::extract::normalize_url;
use html2slides::converters::html::{extract_sections, parse};
use html2slides::converters::sections::build_sections;
use html2slides::errors::ImageExtractionError;
use html2slides::models::bullet::BulletKind;
use html2slides::models::elements::ElementKind;
use html2slides::models::presentation::{Deck, DeckElement};
use html2slides::{
    convert, convert_inline, deck_json, ConversionConfig, DeckBackend, ImageSource, SplitStrategy,
};
use image::{DynamicImage, ImageFormat, RgbImage};
use proptest::prelude::*;

fn inline_deck(html: &str, config: &ConversionConfig) -> Deck {
    let mut backend = DeckBackend::new();
    let handle = convert_inline(html, config, &mut backend).unwrap();
    backend.deck(&handle).unwrap().clone()
}

fn images(deck: &Deck) -> Vec<&ImagePlacement> {
    deck.elements()
        .filter_map(|element| match element {
            DeckElement::Image(image) => Some(image),
            _ => None,
        })
        .collect()
}

#[test]
fn test_sections_follow_top_level_headings() {
    let html = "<h1>Intro</h1><p>Hello</p><h1>Details</h1><p>World</p>";
    let doc = parse(html).unwrap();
    let sections = build_sections(&doc, &ConversionConfig::default());

    let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Intro", "Details"]);
    for section in &sections {
        assert_eq!(section.elements.len(), 1);
        assert_eq!(section.elements[0].kind(), ElementKind::Text);
    }

    let deck = inline_deck(html, &ConversionConfig::default());
    assert_eq!(deck.slides.len(), 2);
    assert_eq!(deck.slides[1].name, "Details");
    // Title plus the paragraph.
    assert_eq!(deck.slides[0].elements.len(), 2);
}

#[test]
fn test_table_is_padded_to_widest_row() {
    let html = "<h1>Data</h1><table><tr><th>A</th></tr><tr><td>1</td><td>2</td></tr></table>";
    let deck = inline_deck(html, &ConversionConfig::default());

    let table: &TableOptions = deck
        .elements()
        .find_map(|element| match element {
            DeckElement::Table(table) => Some(table),
            _ => None,
        })
        .unwrap();
    let text: Vec<Vec<&str>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|cell| cell.text.as_str()).collect())
        .collect();
    assert_eq!(text, vec![vec!["A", ""], vec!["1", "2"]]);
    assert!(table.rows[0][0].bold);
    assert_eq!(table.col_widths.len(), 2);
}

#[test]
fn test_url_normalization_examples() {
    assert_eq!(normalize_url("example.com"), "https://example.com");
    assert_eq!(normalize_url("http://x.com"), "https://x.com");
    assert_eq!(normalize_url(""), "#");
    assert_eq!(normalize_url("mailto:a@b.test"), "mailto:a@b.test");
}

#[test]
fn test_ordered_list_bullet_descriptor() {
    let html = r#"<h1>Steps</h1><ol type="A" start="3"><li>x</li></ol>"#;
    let deck = inline_deck(html, &ConversionConfig::default());

    let list: &ListOptions = deck
        .elements()
        .find_map(|element| match element {
            DeckElement::List(list) => Some(list),
            _ => None,
        })
        .unwrap();
    assert_eq!(list.bullet.kind, BulletKind::UpperLetter);
    assert_eq!(list.bullet.start, Some(3));
    assert_eq!(list.lines, vec!["x"]);
}

#[test]
fn test_undecodable_image_keeps_original_geometry() {
    // Valid base64, but the payload is not a PNG.
    let html = r#"<h1>Pics</h1><img src="data:image/png;base64,aGVsbG8=" alt="broken" width="192" height="96"><p>After</p>"#;
    let deck = inline_deck(html, &ConversionConfig::default());

    let placed = images(&deck);
    assert_eq!(placed.len(), 1);
    let image = placed[0];
    assert!(!image.processed);
    assert_eq!(image.rect.w, 2.0);
    assert_eq!(image.rect.h, Some(1.0));
    assert!(matches!(&image.data, ImageData::DataUri(uri) if uri.ends_with("aGVsbG8=")));

    // The rest of the slide is still rendered.
    let texts = deck.slides[0]
        .elements
        .iter()
        .filter(|element| matches!(element, DeckElement::Text(_)))
        .count();
    assert_eq!(texts, 2);
}

#[test]
fn test_oversized_image_request_falls_back() {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

    let html = format!(
        r#"<h1>Huge</h1><img src="data:image/png;base64,{}" width="99999999999" height="99999999999"><p>After</p>"#,
        BASE64.encode(png_fixture())
    );
    let deck = inline_deck(&html, &ConversionConfig::default());

    let placed = images(&deck);
    assert_eq!(placed.len(), 1);
    assert!(!placed[0].processed);
    assert_eq!(deck.slides[0].elements.len(), 3);
}

#[test]
fn test_images_and_links_can_be_switched_off() {
    let html = r#"<h1>Mixed</h1><p>See <a href="example.com">docs</a></p><img src="data:image/png;base64,aGVsbG8=">"#;

    let deck = inline_deck(html, &ConversionConfig::default());
    let link = deck
        .elements()
        .find_map(|element| match element {
            DeckElement::Hyperlink(link) => Some(link),
            _ => None,
        })
        .unwrap();
    assert_eq!(link.hyperlink.url, "https://example.com");
    assert_eq!(link.hyperlink.tooltip, "https://example.com");
    assert!(link.underline);

    let config = ConversionConfig::builder()
        .include_images(false)
        .preserve_links(false)
        .build()
        .unwrap();
    let deck = inline_deck(html, &config);
    assert!(images(&deck).is_empty());
    assert!(!deck
        .elements()
        .any(|element| matches!(element, DeckElement::Hyperlink(_))));
}

#[test]
fn test_fatal_errors_name_their_stage() {
    let mut backend = DeckBackend::new();
    let err = convert_inline("<div><p>open</p>", &ConversionConfig::default(), &mut backend)
        .unwrap_err();
    assert_eq!(err.stage(), "parse");
    assert_eq!(backend.deck_count(), 0);

    let err = deck_json("<p>x</p>", r#"{"imageOptions": {"quality": 0}}"#).unwrap_err();
    assert_eq!(err.stage(), "config");
}

#[test]
fn test_deck_json_round_trips_through_serde() {
    let json = deck_json(
        "<h2>One</h2><p>a</p><h2>Two</h2><p>b</p>",
        r#"{"split": {"type": "byHeading", "level": "h2"}, "theme": "minimal", "layout": "wide"}"#,
    )
    .unwrap();
    let deck: Deck = serde_json::from_str(&json).unwrap();
    assert_eq!(deck.slides.len(), 2);
    assert_eq!(deck.theme.properties.title, "Minimal");
    assert_eq!(deck.width, 13.333);
}

// --- Async acquisition ---

struct FixtureSource {
    png: Vec<u8>,
    calls: RefCell<Vec<String>>,
}

impl ImageSource for FixtureSource {
    async fn fetch(&self, src: &str) -> Result<Vec<u8>, ImageExtractionError> {
        self.calls.borrow_mut().push(src.to_string());
        if src.ends_with(".png") {
            Ok(self.png.clone())
        } else {
            Err(ImageExtractionError::NotAcquired(src.to_string()))
        }
    }
}

fn png_fixture() -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::new(40, 20));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

#[tokio::test]
async fn test_convert_processes_fetched_images_in_order() {
    let html = r#"<h1>A</h1><img src="https://img.test/a.png"><h1>B</h1><img src="https://img.test/b.gif" width="96" height="96"><img src="https://img.test/a.png">"#;
    let source = FixtureSource {
        png: png_fixture(),
        calls: RefCell::new(Vec::new()),
    };
    let mut backend = DeckBackend::new();
    let handle = convert(html, &ConversionConfig::default(), &source, &mut backend)
        .await
        .unwrap();

    assert_eq!(
        *source.calls.borrow(),
        vec!["https://img.test/a.png", "https://img.test/b.gif"]
    );

    let deck = backend.deck(&handle).unwrap();
    let placed = images(deck);
    assert_eq!(placed.len(), 3);
    assert!(placed[0].processed);
    assert!(matches!(&placed[0].data, ImageData::DataUri(uri) if uri.starts_with("data:image/png;base64,")));
    // The gif was never acquired and falls back to its source reference.
    assert!(!placed[1].processed);
    assert_eq!(placed[1].data, ImageData::Path("https://img.test/b.gif".to_string()));
    assert!(placed[2].processed);
}

#[tokio::test]
async fn test_convert_skips_fetching_when_images_are_excluded() {
    let source = FixtureSource {
        png: png_fixture(),
        calls: RefCell::new(Vec::new()),
    };
    let config = ConversionConfig::builder().include_images(false).build().unwrap();
    let mut backend = DeckBackend::new();
    convert(r#"<h1>A</h1><img src="a.png">"#, &config, &source, &mut backend)
        .await
        .unwrap();
    assert!(source.calls.borrow().is_empty());
}

proptest! {
    #[test]
    fn prop_section_count_matches_heading_count(n in 0usize..8) {
        let html: String = (0..n)
            .map(|i| format!("<h1>Part {i}</h1><p>body {i}</p>"))
            .chain(std::iter::once("<p>tail</p>".to_string()))
            .collect();
        let doc = parse(&html).unwrap();
        let sections = extract_sections(&doc, &SplitStrategy::default());
        prop_assert_eq!(sections.len(), n.max(1));
    }
}
