//! Slide assembler: turns populated sections into Presentation Backend calls.
//!
//! For each section the assembler opens a slide, renders the title, then renders every
//! element in document order with the layout rectangle for its kind and the theme. Failures
//! of a single element are logged and the element is rendered in its unprocessed form;
//! only configuration and backend errors abort the conversion.

mod constants;
mod elements;
mod utils;

use std::borrow::Cow;

use log::{info, warn};

use crate::backend::{ImagePlacement, PresentationBackend};
use crate::converters::html::Document;
use crate::converters::sections::{build_sections, ExtractedResources};
use crate::errors::{ImageExtractionError, Result};
use crate::images::{ImageProcessor, ImageStore, ProcessedImage, RasterImageProcessor};
use crate::models::config::ConversionConfig;
use crate::models::elements::{ElementKind, ElementResource, SlideElement};
use crate::models::image::ImageResource;
use crate::models::layout::{positions_for, LayoutPositions, LayoutVariant};
use crate::models::page::Section;
use crate::models::properties::FormatDescriptor;
use crate::models::table::TableResource;
use crate::models::text::TextResource;
use crate::models::theme::{theme_for, ThemeDefinition, ThemeSelector};
use elements::{
    fallback_image_placement, fallback_table_options, link_options, list_options,
    processed_image_placement, table_options, text_options, title_options,
};
use utils::{LayoutCursor, StyleLayers};

pub use elements::column_widths;
pub use utils::estimate_text_height;

/// Orchestrates slide assembly.
///
/// Collaborators are explicit values: the image store and processor, plus the layout and
/// theme lookups as plain functions.
pub struct SlideAssembler<'a, P = RasterImageProcessor> {
    config: &'a ConversionConfig,
    images: &'a ImageStore,
    processor: P,
    positions_for: fn(LayoutVariant) -> LayoutPositions,
    theme_for: fn(ThemeSelector) -> ThemeDefinition,
}

impl<'a> SlideAssembler<'a, RasterImageProcessor> {
    /// Creates an assembler with the built-in layouts, themes and raster processor.
    pub fn new(config: &'a ConversionConfig, images: &'a ImageStore) -> Self {
        Self {
            config,
            images,
            processor: RasterImageProcessor,
            positions_for,
            theme_for,
        }
    }
}

impl<'a, P: ImageProcessor> SlideAssembler<'a, P> {
    /// Replaces the image processor.
    pub fn with_processor<Q: ImageProcessor>(self, processor: Q) -> SlideAssembler<'a, Q> {
        SlideAssembler {
            config: self.config,
            images: self.images,
            processor,
            positions_for: self.positions_for,
            theme_for: self.theme_for,
        }
    }

    pub fn with_layouts(mut self, positions_for: fn(LayoutVariant) -> LayoutPositions) -> Self {
        self.positions_for = positions_for;
        self
    }

    pub fn with_themes(mut self, theme_for: fn(ThemeSelector) -> ThemeDefinition) -> Self {
        self.theme_for = theme_for;
        self
    }

    /// Splits and populates the document, then assembles it.
    pub fn assemble<B: PresentationBackend>(
        &self,
        document: &Document,
        backend: &mut B,
    ) -> Result<B::Handle> {
        let sections = build_sections(document, self.config);
        self.assemble_sections(document, &sections, backend)
    }

    /// Assembles already populated sections into a presentation.
    ///
    /// # Arguments
    ///
    /// * `document` - The source document; used to synthesize an "Untitled" section from all
    ///   of its resources when `sections` is empty.
    /// * `sections` - Populated sections in presentation order.
    /// * `backend` - Receives the calls, in document order.
    ///
    /// # Returns
    ///
    /// The backend's presentation handle, or the first fatal error. Configuration errors are
    /// reported before any backend call.
    pub fn assemble_sections<B: PresentationBackend>(
        &self,
        document: &Document,
        sections: &[Section],
        backend: &mut B,
    ) -> Result<B::Handle> {
        // 1. Validate, resolve the theme and open the presentation.
        self.config.validate()?;
        let theme = (self.theme_for)(self.config.theme);
        let positions = (self.positions_for)(self.config.layout);
        let handle = backend.create_presentation(&theme, self.config.layout)?;

        // 2. Synthesize a section when the document produced none.
        let synthesized;
        let sections = if sections.is_empty() {
            info!("No sections found; building one slide from all document resources");
            synthesized = [ExtractedResources::from_document(document).into_section()];
            &synthesized[..]
        } else {
            sections
        };

        // 3. One slide per section.
        for section in sections {
            self.render_section(backend, &handle, section, &theme, &positions)?;
        }
        info!("Assembled {} slide(s)", sections.len());
        Ok(handle)
    }

    fn render_section<B: PresentationBackend>(
        &self,
        backend: &mut B,
        handle: &B::Handle,
        section: &Section,
        theme: &ThemeDefinition,
        positions: &LayoutPositions,
    ) -> Result<()> {
        let slide = backend.add_slide(handle, &section.title, self.config.layout)?;

        if !section.is_untitled() {
            let layers = StyleLayers::new(self.config.overrides_for(ElementKind::Title), None);
            let rect = layers.apply_geometry(positions.title);
            let options = title_options(&section.title, rect, &layers, theme);
            let resource = TextResource::new(
                section.title.clone(),
                FormatDescriptor {
                    heading_level: Some(1),
                    ..Default::default()
                },
            );
            backend.add_text(&slide, &resource, &options)?;
        }

        let mut cursor = LayoutCursor::new();
        for element in &section.elements {
            self.render_element(backend, &slide, element, theme, positions, &mut cursor)?;
        }
        Ok(())
    }

    fn render_element<B: PresentationBackend>(
        &self,
        backend: &mut B,
        slide: &B::Slide,
        element: &SlideElement,
        theme: &ThemeDefinition,
        positions: &LayoutPositions,
        cursor: &mut LayoutCursor,
    ) -> Result<()> {
        let kind = element.kind();
        let layers = StyleLayers::new(self.config.overrides_for(kind), element.style.as_ref());
        let area = layers.apply_geometry(positions.rect_for(kind));

        match &element.resource {
            ElementResource::Text(text) => {
                let options = text_options(text, area, &layers, theme, cursor);
                backend.add_text(slide, text, &options)?;
            }
            ElementResource::Image(image) => {
                if !self.config.include_images {
                    return Ok(());
                }
                let placement = match self.process_image(image) {
                    Ok(processed) => processed_image_placement(image, &processed, area),
                    Err(e) => {
                        warn!(
                            "Image '{}' could not be processed, using its original geometry: {}",
                            image.alt, e
                        );
                        fallback_image_placement(image, area)
                    }
                };
                let height = placement.rect.h.unwrap_or_default();
                let rect = cursor.place(placement.rect, height, layers.has_explicit_y());
                backend.add_image(slide, image, &ImagePlacement { rect, ..placement })?;
            }
            ElementResource::Table(table) => {
                let table = normalized(table);
                let options = match table_options(&table, area, &layers, theme, cursor) {
                    Ok(options) => options,
                    Err(e) => {
                        warn!("Table could not be styled, rendering it plain: {}", e);
                        fallback_table_options(&table, area, theme, cursor)
                    }
                };
                backend.add_table(slide, &table, &options)?;
            }
            ElementResource::List(list) => {
                let options = list_options(list, area, &layers, theme, cursor);
                backend.add_list(slide, list, &options)?;
            }
            ElementResource::Link(link) => {
                if !self.config.preserve_links {
                    return Ok(());
                }
                let options = link_options(link, area, &layers, theme, cursor);
                backend.add_hyperlink(slide, link, &options)?;
            }
        }
        Ok(())
    }

    fn process_image(
        &self,
        image: &ImageResource,
    ) -> std::result::Result<ProcessedImage, ImageExtractionError> {
        let bytes = self.images.get(&image.src).ok_or_else(|| {
            ImageExtractionError::NotAcquired(image.src.chars().take(48).collect())
        })?;
        self.processor
            .process(bytes, (image.width, image.height), &self.config.image_options)
    }
}

fn normalized(table: &TableResource) -> Cow<'_, TableResource> {
    if table.is_normalized() {
        Cow::Borrowed(table)
    } else {
        let mut table = table.clone();
        table.normalize();
        Cow::Owned(table)
    }
}
