pub mod backend;
pub mod converters;
pub mod errors;
pub mod images;
pub mod models;

pub use backend::{DeckBackend, DeckHandle, PresentationBackend};
pub use converters::slides::SlideAssembler;
pub use converters::{convert, convert_inline};
pub use errors::{ConversionError, Result};
pub use images::{HttpImageSource, ImageProcessor, ImageSource, ImageStore, RasterImageProcessor};
pub use models::config::{ConversionConfig, SplitStrategy};
pub use models::presentation::Deck;

use wasm_bindgen::prelude::*;

/// Converts markup to a deck description, returned as JSON. Only embedded (data-URI) images
/// are used. An empty `config_json` selects the default configuration.
pub fn deck_json(html: &str, config_json: &str) -> Result<String> {
    let config = if config_json.trim().is_empty() {
        ConversionConfig::default()
    } else {
        ConversionConfig::from_json(config_json)?
    };

    let mut backend = DeckBackend::new();
    let handle = convert_inline(html, &config, &mut backend)?;
    let bytes = backend.save(&handle, None)?;
    String::from_utf8(bytes).map_err(|e| ConversionError::Assembly(e.to_string()))
}

#[wasm_bindgen]
pub fn convert_html_to_deck_json(
    html: &str,
    config_json: &str,
) -> std::result::Result<String, JsValue> {
    deck_json(html, config_json)
        .map_err(|e| JsValue::from_str(&format!("{} ({} stage)", e, e.stage())))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // A second init (e.g. module reloaded) is harmless.
    let _ = console_log::init_with_level(log::Level::Info);
}
