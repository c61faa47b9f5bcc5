use thiserror::Error;

/// Raised when raw markup fails the structural safety net or cannot be turned into a tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The malformation heuristic flagged the document.
    #[error("Malformed markup: {diagnostic}")]
    Malformed { diagnostic: String },

    /// The tree builder produced a document without a usable `<body>`.
    #[error("Markup produced no document body")]
    MissingBody,

    /// The input was empty or whitespace only.
    #[error("Markup is empty")]
    Empty,
}

/// Failure while flattening or reading formatting from a text fragment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TextExtractionError {
    #[error("Text fragment is malformed: {0}")]
    MalformedFragment(String),

    #[error("Text fragment has no element or text content")]
    EmptyFragment,
}

/// Failure while extracting, acquiring or processing an image.
#[derive(Error, Debug)]
pub enum ImageExtractionError {
    /// Error originating from the underlying HTTP client (`reqwest`).
    #[error("Image request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote server answered with a non-success status.
    #[error("Image request returned status {status} for {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    /// Base64 payload of a data URI could not be decoded.
    #[error("Failed to decode base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The `image` crate could not decode or encode the bytes.
    #[error("Image codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("Cannot resolve relative image source without a base URL: {0}")]
    UnresolvableSource(String),

    #[error("No image data was acquired for {0}")]
    NotAcquired(String),

    /// The computed output size exceeds the processing limit.
    #[error("Image output of {width}x{height} px exceeds the {limit} px limit per side")]
    Oversized { width: u32, height: u32, limit: u32 },
}

/// Failure while extracting or laying out a table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableExtractionError {
    #[error("Expected a <table> element, found <{0}>")]
    NotATable(String),

    #[error("Table has no rows")]
    NoRows,

    #[error("Table has no columns")]
    NoColumns,
}

/// Failure while extracting or formatting a list.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ListExtractionError {
    #[error("Expected a <ul> or <ol> element, found <{0}>")]
    NotAList(String),

    #[error("List item markup could not be formatted: {0}")]
    MalformedItem(String),
}

/// Failure while extracting a hyperlink.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinkExtractionError {
    #[error("Expected an <a> element, found <{0}>")]
    NotAnAnchor(String),

    #[error("Anchor has an empty href")]
    EmptyHref,

    #[error("Anchor has no visible text")]
    EmptyText,
}

/// Raised by a Presentation Backend when it rejects an operation.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Backend failed to initialise the presentation: {0}")]
    Initialization(String),

    #[error("Backend failed to apply the theme: {0}")]
    Theme(String),

    /// The handle does not refer to a presentation or slide the backend knows.
    #[error("Unknown handle: {0}")]
    UnknownHandle(String),

    #[error("Backend rejected operation '{operation}': {message}")]
    Rejected { operation: String, message: String },

    /// Error serialising the deck when saving.
    #[error("Failed to serialise presentation: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// An invalid or contradictory `ConversionConfig` value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("Failed to read conversion config: {0}")]
    Deserialization(String),

    #[error("Image quality must be between 1 and 100, got {0}")]
    Quality(u8),

    #[error("Image option '{name}' must be positive, got {value}")]
    NonPositiveDimension { name: &'static str, value: u32 },

    #[error("Invalid custom selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    #[error("Unknown element kind '{0}' in style overrides")]
    UnknownOverrideKind(String),

    #[error("Style override '{kind}.{key}' must be a number, got '{value}'")]
    NonNumericGeometry {
        kind: String,
        key: String,
        value: String,
    },
}

/// Any per-element extraction failure. These are recovered locally by the assembler.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error(transparent)]
    Text(#[from] TextExtractionError),
    #[error(transparent)]
    Image(#[from] ImageExtractionError),
    #[error(transparent)]
    Table(#[from] TableExtractionError),
    #[error(transparent)]
    List(#[from] ListExtractionError),
    #[error(transparent)]
    Link(#[from] LinkExtractionError),
}

/// Represents errors that abort a whole conversion.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Parse stage failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Configuration is invalid: {0}")]
    Config(#[from] ConfigValidationError),

    #[error("Extraction stage failed: {0}")]
    Extraction(#[from] ExtractionError),

    /// Slide assembly reached a state it cannot continue from.
    #[error("Assembly stage failed: {0}")]
    Assembly(String),

    #[error("Presentation backend failed: {0}")]
    Backend(#[from] BackendError),
}

impl ConversionError {
    /// Name of the pipeline stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            ConversionError::Parse(_) => "parse",
            ConversionError::Config(_) => "config",
            ConversionError::Extraction(_) => "extraction",
            ConversionError::Assembly(_) => "assembly",
            ConversionError::Backend(_) => "backend",
        }
    }
}

/// A type alias for `Result<T, ConversionError>` for convenience within the crate.
pub type Result<T> = std::result::Result<T, ConversionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names_fatal_errors() {
        let parse: ConversionError = ParseError::Empty.into();
        assert_eq!(parse.stage(), "parse");
        assert_eq!(parse.to_string(), "Parse stage failed: Markup is empty");

        let backend: ConversionError = BackendError::Initialization("boom".to_string()).into();
        assert_eq!(backend.stage(), "backend");

        let config: ConversionError = ConfigValidationError::Quality(0).into();
        assert_eq!(config.stage(), "config");
    }

    #[test]
    fn test_extraction_errors_wrap_transparently() {
        let err: ExtractionError = TableExtractionError::NoRows.into();
        assert_eq!(err.to_string(), "Table has no rows");
    }
}
