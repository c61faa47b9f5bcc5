// src/converters/mod.rs

pub mod extract;
pub mod html;
pub mod sections;
pub mod slides;

use log::info;

use crate::backend::PresentationBackend;
use crate::converters::html::parse_with;
use crate::converters::sections::build_sections;
use crate::converters::slides::SlideAssembler;
use crate::errors::Result;
use crate::images::{ImageSource, ImageStore};
use crate::models::config::ConversionConfig;

/// Converts a markup document into a presentation, acquiring images through `source`.
///
/// # Arguments
///
/// * `raw` - The markup document.
/// * `config` - Conversion settings; validated before any other work.
/// * `source` - Fetches image bytes. Only consulted when `config.include_images` is set.
/// * `backend` - Receives the slide calls in document order.
///
/// # Returns
///
/// The backend's presentation handle, or the first fatal error.
pub async fn convert<S, B>(
    raw: &str,
    config: &ConversionConfig,
    source: &S,
    backend: &mut B,
) -> Result<B::Handle>
where
    S: ImageSource,
    B: PresentationBackend,
{
    config.validate()?;
    let document = parse_with(raw, &config.markup_policy)?;
    let sections = build_sections(&document, config);
    info!("Document split into {} section(s)", sections.len());

    let images = if config.include_images {
        ImageStore::acquire(&sections, source).await
    } else {
        ImageStore::default()
    };

    SlideAssembler::new(config, &images).assemble_sections(&document, &sections, backend)
}

/// Like [`convert`], but without network access: only data-URI images are decoded.
pub fn convert_inline<B: PresentationBackend>(
    raw: &str,
    config: &ConversionConfig,
    backend: &mut B,
) -> Result<B::Handle> {
    config.validate()?;
    let document = parse_with(raw, &config.markup_policy)?;
    let sections = build_sections(&document, config);
    info!("Document split into {} section(s)", sections.len());

    let images = if config.include_images {
        ImageStore::inline(&sections)
    } else {
        ImageStore::default()
    };

    SlideAssembler::new(config, &images).assemble_sections(&document, &sections, backend)
}
