//! In-memory backend producing a JSON deck description.

use log::debug;

use super::options::{HyperlinkOptions, ImagePlacement, ListOptions, TableOptions, TextOptions};
use super::PresentationBackend;
use crate::errors::BackendError;
use crate::models::image::ImageResource;
use crate::models::layout::LayoutVariant;
use crate::models::link::LinkResource;
use crate::models::list::ListResource;
use crate::models::presentation::{Deck, DeckElement, DeckSlide};
use crate::models::table::TableResource;
use crate::models::text::TextResource;
use crate::models::theme::ThemeDefinition;

/// Identifies a deck held by a [`DeckBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckHandle(usize);

/// Identifies a slide inside a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideRef {
    deck: usize,
    slide: usize,
}

/// Records every backend call into a [`Deck`]. `save` returns the deck as pretty JSON.
#[derive(Debug, Default)]
pub struct DeckBackend {
    decks: Vec<Deck>,
}

impl DeckBackend {
    pub fn new() -> Self {
        Default::default()
    }

    /// Number of presentations created so far.
    pub fn deck_count(&self) -> usize {
        self.decks.len()
    }

    /// The deck behind a handle.
    pub fn deck(&self, handle: &DeckHandle) -> Option<&Deck> {
        self.decks.get(handle.0)
    }

    fn push(&mut self, slide: &SlideRef, element: DeckElement) -> Result<(), BackendError> {
        let target = self
            .decks
            .get_mut(slide.deck)
            .and_then(|deck| deck.slides.get_mut(slide.slide))
            .ok_or_else(|| {
                BackendError::UnknownHandle(format!("slide {} of deck {}", slide.slide, slide.deck))
            })?;
        target.elements.push(element);
        Ok(())
    }
}

impl PresentationBackend for DeckBackend {
    type Handle = DeckHandle;
    type Slide = SlideRef;

    fn create_presentation(
        &mut self,
        theme: &ThemeDefinition,
        layout: LayoutVariant,
    ) -> Result<DeckHandle, BackendError> {
        let (width, height) = layout.slide_size();
        self.decks.push(Deck {
            layout,
            width,
            height,
            theme: theme.clone(),
            slides: Vec::new(),
        });
        debug!("Created deck {} with theme '{}'", self.decks.len() - 1, theme.properties.title);
        Ok(DeckHandle(self.decks.len() - 1))
    }

    fn add_slide(
        &mut self,
        handle: &DeckHandle,
        title: &str,
        layout: LayoutVariant,
    ) -> Result<SlideRef, BackendError> {
        let deck = self
            .decks
            .get_mut(handle.0)
            .ok_or_else(|| BackendError::UnknownHandle(format!("deck {}", handle.0)))?;
        if deck.layout != layout {
            return Err(BackendError::Rejected {
                operation: "addSlide".to_string(),
                message: format!(
                    "slide layout '{}' does not match deck layout '{}'",
                    layout.name(),
                    deck.layout.name()
                ),
            });
        }
        deck.slides.push(DeckSlide {
            name: title.to_string(),
            background_color: deck.theme.properties.background_color.clone(),
            elements: Vec::new(),
        });
        Ok(SlideRef {
            deck: handle.0,
            slide: deck.slides.len() - 1,
        })
    }

    fn add_text(
        &mut self,
        slide: &SlideRef,
        _resource: &TextResource,
        options: &TextOptions,
    ) -> Result<(), BackendError> {
        self.push(slide, DeckElement::Text(options.clone()))
    }

    fn add_image(
        &mut self,
        slide: &SlideRef,
        _resource: &ImageResource,
        options: &ImagePlacement,
    ) -> Result<(), BackendError> {
        self.push(slide, DeckElement::Image(options.clone()))
    }

    fn add_table(
        &mut self,
        slide: &SlideRef,
        _resource: &TableResource,
        options: &TableOptions,
    ) -> Result<(), BackendError> {
        self.push(slide, DeckElement::Table(options.clone()))
    }

    fn add_list(
        &mut self,
        slide: &SlideRef,
        _resource: &ListResource,
        options: &ListOptions,
    ) -> Result<(), BackendError> {
        self.push(slide, DeckElement::List(options.clone()))
    }

    fn add_hyperlink(
        &mut self,
        slide: &SlideRef,
        _resource: &LinkResource,
        options: &HyperlinkOptions,
    ) -> Result<(), BackendError> {
        self.push(slide, DeckElement::Hyperlink(options.clone()))
    }

    fn save(&mut self, handle: &DeckHandle, file_name: Option<&str>) -> Result<Vec<u8>, BackendError> {
        let deck = self
            .decks
            .get(handle.0)
            .ok_or_else(|| BackendError::UnknownHandle(format!("deck {}", handle.0)))?;
        debug!(
            "Saving deck {} ({} slides) as {}",
            handle.0,
            deck.slides.len(),
            file_name.unwrap_or("<unnamed>")
        );
        Ok(serde_json::to_vec_pretty(deck)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::Rect;
    use crate::models::properties::Alignment;
    use crate::models::theme::{theme_for, ThemeSelector};

    fn text_options() -> TextOptions {
        TextOptions {
            rect: Rect::new(0.5, 1.0, 9.0, None),
            font_face: "Arial".to_string(),
            font_size: 18.0,
            color: "000000".to_string(),
            bold: false,
            align: Alignment::Left,
            runs: Vec::new(),
        }
    }

    #[test]
    fn test_records_calls_in_order() {
        let mut backend = DeckBackend::new();
        let theme = theme_for(ThemeSelector::Creative);
        let handle = backend
            .create_presentation(&theme, LayoutVariant::Standard)
            .unwrap();
        let slide = backend
            .add_slide(&handle, "Intro", LayoutVariant::Standard)
            .unwrap();
        backend
            .add_text(&slide, &TextResource::default(), &text_options())
            .unwrap();

        let deck = backend.deck(&handle).unwrap();
        assert_eq!(deck.slides.len(), 1);
        assert_eq!(deck.slides[0].name, "Intro");
        assert_eq!(deck.slides[0].background_color, "FFF9F0");
        assert!(matches!(deck.slides[0].elements[0], DeckElement::Text(_)));

        let bytes = backend.save(&handle, Some("out.json")).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["slides"][0]["elements"][0]["type"], "text");
    }

    #[test]
    fn test_rejects_unknown_handles_and_layout_mismatch() {
        let mut backend = DeckBackend::new();
        assert!(matches!(
            backend.add_slide(&DeckHandle(3), "x", LayoutVariant::Standard),
            Err(BackendError::UnknownHandle(_))
        ));

        let handle = backend
            .create_presentation(&theme_for(ThemeSelector::Default), LayoutVariant::Wide)
            .unwrap();
        assert!(matches!(
            backend.add_slide(&handle, "x", LayoutVariant::Standard),
            Err(BackendError::Rejected { .. })
        ));
    }
}
