//! The Presentation Backend contract.
//!
//! The assembler only talks to a backend through [`PresentationBackend`]. Calls arrive in
//! document order and are never interleaved across slides; backends are not required to be
//! reentrant. [`DeckBackend`] is the reference implementation that records a serializable
//! deck description.

mod deck;
pub mod options;

pub use deck::{DeckBackend, DeckHandle, SlideRef};
pub use options::{
    Hyperlink, HyperlinkOptions, ImageData, ImagePlacement, ListOptions, RunOptions,
    TableCellOptions, TableOptions, TextOptions, TextRun,
};

use crate::errors::BackendError;
use crate::models::image::ImageResource;
use crate::models::layout::LayoutVariant;
use crate::models::link::LinkResource;
use crate::models::list::ListResource;
use crate::models::table::TableResource;
use crate::models::text::TextResource;
use crate::models::theme::ThemeDefinition;

/// Encodes assembled slides into a final artifact.
///
/// `Handle` identifies a presentation and `Slide` a slide inside it; both are opaque to the
/// assembler.
pub trait PresentationBackend {
    type Handle;
    type Slide;

    /// Opens a new presentation with the theme applied.
    fn create_presentation(
        &mut self,
        theme: &ThemeDefinition,
        layout: LayoutVariant,
    ) -> Result<Self::Handle, BackendError>;

    /// Appends a slide. `title` is the section title (used as the slide name).
    fn add_slide(
        &mut self,
        handle: &Self::Handle,
        title: &str,
        layout: LayoutVariant,
    ) -> Result<Self::Slide, BackendError>;

    fn add_text(
        &mut self,
        slide: &Self::Slide,
        resource: &TextResource,
        options: &TextOptions,
    ) -> Result<(), BackendError>;

    fn add_image(
        &mut self,
        slide: &Self::Slide,
        resource: &ImageResource,
        options: &ImagePlacement,
    ) -> Result<(), BackendError>;

    fn add_table(
        &mut self,
        slide: &Self::Slide,
        resource: &TableResource,
        options: &TableOptions,
    ) -> Result<(), BackendError>;

    /// Renders a list as a multi-line text block with a bullet descriptor.
    fn add_list(
        &mut self,
        slide: &Self::Slide,
        resource: &ListResource,
        options: &ListOptions,
    ) -> Result<(), BackendError>;

    fn add_hyperlink(
        &mut self,
        slide: &Self::Slide,
        resource: &LinkResource,
        options: &HyperlinkOptions,
    ) -> Result<(), BackendError>;

    /// Produces the binary artifact for a presentation.
    fn save(&mut self, handle: &Self::Handle, file_name: Option<&str>)
        -> Result<Vec<u8>, BackendError>;
}
