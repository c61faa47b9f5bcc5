//! Image acquisition and processing: the only asynchronous boundary of a conversion.

use std::collections::HashMap;
use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{GenericImageView, ImageFormat};
use url::Url;

use crate::errors::ImageExtractionError;
use crate::models::config::ImageOptions;
use crate::models::elements::ElementResource;
use crate::models::page::Section;

// --- Acquisition ---

/// Fetches the bytes behind an image `src`.
#[allow(async_fn_in_trait)]
pub trait ImageSource {
    async fn fetch(&self, src: &str) -> Result<Vec<u8>, ImageExtractionError>;
}

/// Decodes a `data:` URI. Base64 payloads are decoded, others are taken as raw text.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, ImageExtractionError> {
    let rest = uri
        .get(..5)
        .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
        .map(|_| &uri[5..])
        .ok_or_else(|| ImageExtractionError::InvalidDataUri(truncate(uri)))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImageExtractionError::InvalidDataUri(truncate(uri)))?;
    if meta.to_ascii_lowercase().ends_with(";base64") {
        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        Ok(BASE64.decode(cleaned)?)
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}

fn truncate(uri: &str) -> String {
    uri.chars().take(48).collect()
}

fn is_data_uri(src: &str) -> bool {
    src.get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Fetches images over HTTP(S) with `reqwest`. Relative sources resolve against `base_url`.
#[derive(Debug, Clone, Default)]
pub struct HttpImageSource {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl HttpImageSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Resolves `src` to an absolute URL. Relative sources are joined onto `base_url`;
    /// protocol-relative sources default to `https` when there is no base.
    pub fn resolve(&self, src: &str) -> Result<String, ImageExtractionError> {
        let src = src.trim();
        let unresolvable = || ImageExtractionError::UnresolvableSource(src.to_string());

        match Url::parse(src) {
            Ok(url) => return Ok(url.into()),
            Err(url::ParseError::RelativeUrlWithoutBase) => {}
            Err(_) => return Err(unresolvable()),
        }

        let base = match self.base_url.as_deref() {
            Some(base) => Url::parse(base).map_err(|_| unresolvable())?,
            None if src.starts_with("//") => {
                return Url::parse(&format!("https:{}", src))
                    .map(String::from)
                    .map_err(|_| unresolvable());
            }
            None => return Err(unresolvable()),
        };
        base.join(src).map(String::from).map_err(|_| unresolvable())
    }
}

impl ImageSource for HttpImageSource {
    async fn fetch(&self, src: &str) -> Result<Vec<u8>, ImageExtractionError> {
        if is_data_uri(src) {
            return decode_data_uri(src);
        }
        let url = self.resolve(src)?;
        log::debug!("Fetching image {}", url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageExtractionError::HttpStatus { status, url });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Acquired image bytes keyed by `src`.
#[derive(Debug, Clone, Default)]
pub struct ImageStore {
    entries: HashMap<String, Vec<u8>>,
}

/// Image sources of every section, in document order, without duplicates.
fn image_sources(sections: &[Section]) -> Vec<&str> {
    let mut sources: Vec<&str> = Vec::new();
    for element in sections.iter().flat_map(|section| &section.elements) {
        if let ElementResource::Image(image) = &element.resource {
            if !sources.contains(&image.src.as_str()) {
                sources.push(&image.src);
            }
        }
    }
    sources
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, src: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(src.into(), bytes);
    }

    pub fn get(&self, src: &str) -> Option<&[u8]> {
        self.entries.get(src).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decodes the data-URI images of `sections`. Nothing is fetched.
    pub fn inline(sections: &[Section]) -> Self {
        let mut store = Self::new();
        for src in image_sources(sections).into_iter().filter(|src| is_data_uri(src)) {
            match decode_data_uri(src) {
                Ok(bytes) => store.insert(src, bytes),
                Err(e) => log::warn!("Skipping embedded image: {}", e),
            }
        }
        store
    }

    /// Acquires every image of `sections` through `source`, one at a time in document order.
    /// Failures are logged and leave the entry absent.
    pub async fn acquire<S: ImageSource>(sections: &[Section], source: &S) -> Self {
        let mut store = Self::new();
        for src in image_sources(sections) {
            match source.fetch(src).await {
                Ok(bytes) => store.insert(src, bytes),
                Err(e) => log::warn!("Could not acquire image {}: {}", truncate(src), e),
            }
        }
        log::info!("Acquired {} image(s)", store.len());
        store
    }
}

// --- Processing ---

/// A re-encoded image ready for the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedImage {
    pub data_uri: String,
    pub width: u32,
    pub height: u32,
}

/// Decodes, resizes and re-encodes image bytes.
pub trait ImageProcessor {
    /// # Arguments
    ///
    /// * `bytes` - The encoded source image.
    /// * `requested` - Width and height in pixels taken from the markup.
    /// * `options` - Size limits, aspect ratio handling and JPEG quality.
    fn process(
        &self,
        bytes: &[u8],
        requested: (u32, u32),
        options: &ImageOptions,
    ) -> Result<ProcessedImage, ImageExtractionError>;
}

/// Computes output dimensions in pixels.
///
/// Starts from the requested size. With `preserve_aspect_ratio`, the height follows the
/// natural aspect ratio of the image. The result is then scaled to fit `max_width` and
/// `max_height` (both axes together when preserving the ratio). Never returns a zero side.
pub fn compute_dimensions(
    natural: (u32, u32),
    requested: (u32, u32),
    options: &ImageOptions,
) -> (u32, u32) {
    let (natural_w, natural_h) = (natural.0.max(1) as f64, natural.1.max(1) as f64);
    let mut width = requested.0.max(1) as f64;
    let mut height = requested.1.max(1) as f64;

    if options.preserve_aspect_ratio {
        height = width * natural_h / natural_w;
        let mut scale: f64 = 1.0;
        if let Some(max_w) = options.max_width {
            scale = scale.min(max_w as f64 / width);
        }
        if let Some(max_h) = options.max_height {
            scale = scale.min(max_h as f64 / height);
        }
        width *= scale;
        height *= scale;
    } else {
        if let Some(max_w) = options.max_width {
            width = width.min(max_w as f64);
        }
        if let Some(max_h) = options.max_height {
            height = height.min(max_h as f64);
        }
    }

    ((width.round() as u32).max(1), (height.round() as u32).max(1))
}

/// Largest output side, in pixels, the raster processor will produce.
pub const MAX_OUTPUT_SIDE_PX: u32 = 8192;

/// Raster processor on the `image` crate. PNG stays PNG; everything else becomes JPEG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterImageProcessor;

impl ImageProcessor for RasterImageProcessor {
    fn process(
        &self,
        bytes: &[u8],
        requested: (u32, u32),
        options: &ImageOptions,
    ) -> Result<ProcessedImage, ImageExtractionError> {
        let format = image::guess_format(bytes)?;
        let decoded = image::load_from_memory(bytes)?;
        let (width, height) = compute_dimensions(decoded.dimensions(), requested, options);
        if width > MAX_OUTPUT_SIDE_PX || height > MAX_OUTPUT_SIDE_PX {
            return Err(ImageExtractionError::Oversized {
                width,
                height,
                limit: MAX_OUTPUT_SIDE_PX,
            });
        }
        let resized = if (width, height) == decoded.dimensions() {
            decoded
        } else {
            decoded.resize_exact(width, height, FilterType::Lanczos3)
        };

        let mut encoded = Vec::new();
        let mime = if format == ImageFormat::Png {
            resized.write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)?;
            "image/png"
        } else {
            let rgb = resized.to_rgb8();
            JpegEncoder::new_with_quality(&mut encoded, options.quality).encode(
                rgb.as_raw(),
                width,
                height,
                image::ColorType::Rgb8,
            )?;
            "image/jpeg"
        };

        Ok(ProcessedImage {
            data_uri: format!("data:{};base64,{}", mime, BASE64.encode(&encoded)),
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::elements::SlideElement;
    use crate::models::image::ImageResource;
    use image::{DynamicImage, RgbImage};
    use std::cell::RefCell;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::new(width, height));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn section_with_images(sources: &[&str]) -> Section {
        let mut section = Section::new("S", "");
        section.elements = sources
            .iter()
            .map(|src| {
                SlideElement::new(ElementResource::Image(ImageResource {
                    src: src.to_string(),
                    alt: String::new(),
                    width: 10,
                    height: 10,
                    data_uri: None,
                    style: None,
                }))
            })
            .collect();
        section
    }

    struct RecordingSource {
        calls: RefCell<Vec<String>>,
    }

    impl ImageSource for RecordingSource {
        async fn fetch(&self, src: &str) -> Result<Vec<u8>, ImageExtractionError> {
            self.calls.borrow_mut().push(src.to_string());
            if src.contains("missing") {
                Err(ImageExtractionError::NotAcquired(src.to_string()))
            } else {
                Ok(src.as_bytes().to_vec())
            }
        }
    }

    #[test]
    fn test_compute_dimensions() {
        let keep = ImageOptions::default();
        assert_eq!(compute_dimensions((800, 400), (300, 200), &keep), (300, 150));

        let capped = ImageOptions {
            max_width: Some(100),
            ..Default::default()
        };
        assert_eq!(compute_dimensions((800, 400), (300, 200), &capped), (100, 50));

        let both = ImageOptions {
            max_width: Some(1000),
            max_height: Some(60),
            ..Default::default()
        };
        assert_eq!(compute_dimensions((100, 100), (300, 200), &both), (60, 60));

        let stretch = ImageOptions {
            preserve_aspect_ratio: false,
            max_width: Some(250),
            ..Default::default()
        };
        assert_eq!(compute_dimensions((800, 400), (300, 200), &stretch), (250, 200));
        assert_eq!(compute_dimensions((0, 0), (0, 0), &stretch), (1, 1));
    }

    #[test]
    fn test_decode_data_uri() {
        assert_eq!(decode_data_uri("data:text/plain,hi").unwrap(), b"hi");
        assert_eq!(decode_data_uri("data:image/png;base64,aGk=").unwrap(), b"hi");
        assert!(matches!(
            decode_data_uri("data:image/png;base64"),
            Err(ImageExtractionError::InvalidDataUri(_))
        ));
        assert!(matches!(
            decode_data_uri("data:image/png;base64,@@@"),
            Err(ImageExtractionError::Base64(_))
        ));
    }

    #[test]
    fn test_resolve_relative_sources() {
        let source = HttpImageSource::default().with_base_url("https://site.test/docs/page.html");
        assert_eq!(source.resolve("img/a.png").unwrap(), "https://site.test/docs/img/a.png");
        assert_eq!(source.resolve("/b.png").unwrap(), "https://site.test/b.png");
        assert_eq!(source.resolve("//cdn.test/c.png").unwrap(), "https://cdn.test/c.png");
        assert_eq!(source.resolve("http://x.test/d.png").unwrap(), "http://x.test/d.png");

        let bare = HttpImageSource::default().with_base_url("https://site.test");
        assert_eq!(bare.resolve("a.png").unwrap(), "https://site.test/a.png");

        assert!(matches!(
            HttpImageSource::default().resolve("a.png"),
            Err(ImageExtractionError::UnresolvableSource(_))
        ));
    }

    #[test]
    fn test_resolve_ignores_base_query_and_dot_segments() {
        let source =
            HttpImageSource::default().with_base_url("https://site.test/docs/page.html?from=/x/y");
        assert_eq!(source.resolve("img/a.png").unwrap(), "https://site.test/docs/img/a.png");

        let source =
            HttpImageSource::default().with_base_url("https://site.test/docs/guide/page.html");
        assert_eq!(source.resolve("../img/a.png").unwrap(), "https://site.test/docs/img/a.png");

        assert_eq!(
            HttpImageSource::default().resolve("//cdn.test/c.png").unwrap(),
            "https://cdn.test/c.png"
        );
        assert!(matches!(
            HttpImageSource::default().with_base_url("not a url").resolve("a.png"),
            Err(ImageExtractionError::UnresolvableSource(_))
        ));
    }

    #[test]
    fn test_inline_store_decodes_data_uris_only() {
        let sections = [section_with_images(&["data:text/plain,xy", "https://x.test/a.png"])];
        let store = ImageStore::inline(&sections);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("data:text/plain,xy"), Some(&b"xy"[..]));
    }

    #[tokio::test]
    async fn test_acquire_in_document_order_and_skips_failures() {
        let sections = [
            section_with_images(&["a.png", "missing.png"]),
            section_with_images(&["b.png", "a.png"]),
        ];
        let source = RecordingSource {
            calls: RefCell::new(Vec::new()),
        };
        let store = ImageStore::acquire(&sections, &source).await;
        assert_eq!(*source.calls.borrow(), vec!["a.png", "missing.png", "b.png"]);
        assert_eq!(store.len(), 2);
        assert!(store.get("missing.png").is_none());
        assert_eq!(store.get("b.png"), Some(&b"b.png"[..]));
    }

    #[test]
    fn test_raster_processor_resizes_png() {
        let processed = RasterImageProcessor
            .process(&png_bytes(40, 20), (20, 20), &ImageOptions::default())
            .unwrap();
        assert_eq!((processed.width, processed.height), (20, 10));
        assert!(processed.data_uri.starts_with("data:image/png;base64,"));
        let decoded = decode_data_uri(&processed.data_uri).unwrap();
        let img = image::load_from_memory(&decoded).unwrap();
        assert_eq!(img.dimensions(), (20, 10));
    }

    #[test]
    fn test_raster_processor_rejects_oversized_output() {
        let err = RasterImageProcessor
            .process(&png_bytes(1, 1), (u32::MAX, u32::MAX), &ImageOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ImageExtractionError::Oversized {
                limit: MAX_OUTPUT_SIDE_PX,
                ..
            }
        ));

        let capped = ImageOptions {
            max_width: Some(64),
            ..Default::default()
        };
        let processed = RasterImageProcessor
            .process(&png_bytes(1, 1), (u32::MAX, u32::MAX), &capped)
            .unwrap();
        assert_eq!((processed.width, processed.height), (64, 64));
    }

    #[test]
    fn test_raster_processor_rejects_garbage() {
        let err = RasterImageProcessor
            .process(b"not an image", (10, 10), &ImageOptions::default())
            .unwrap_err();
        assert!(matches!(err, ImageExtractionError::Codec(_)));
    }
}
