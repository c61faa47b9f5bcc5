// src/models/config.rs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::converters::html::selector::Selector;
use crate::errors::ConfigValidationError;
use crate::models::elements::{ElementKind, StyleMap};
use crate::models::layout::LayoutVariant;
use crate::models::theme::ThemeSelector;

/// Heading levels usable as section boundaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    #[default]
    H1,
    H2,
}

impl HeadingLevel {
    pub fn tag(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
        }
    }
}

/// How the document body is split into sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SplitStrategy {
    /// One section per heading of the given level.
    ByHeading {
        #[serde(default)]
        level: HeadingLevel,
    },
    /// One section per node matching the selector; `h1` when no selector is given.
    #[serde(rename_all = "camelCase")]
    ByCustomSelector {
        #[serde(default)]
        selector: Option<String>,
    },
    /// The whole body is a single section.
    NoSplit,
}

impl Default for SplitStrategy {
    fn default() -> Self {
        SplitStrategy::ByHeading {
            level: HeadingLevel::H1,
        }
    }
}

/// Image processing options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageOptions {
    /// Maximum rendered width in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
    /// Maximum rendered height in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<u32>,
    pub preserve_aspect_ratio: bool,
    /// JPEG quality, 1-100.
    pub quality: u8,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            max_width: None,
            max_height: None,
            preserve_aspect_ratio: true,
            quality: 85,
        }
    }
}

/// Policy for the markup malformation heuristic. The checks are a cheap safety net, not a
/// grammar; each can be switched off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkupPolicy {
    /// Flag `<script>`/`<style>` blocks that are opened but never closed.
    pub check_script_style: bool,
    /// Flag block elements from `block_tags` that are opened more often than closed.
    pub check_unclosed_blocks: bool,
    /// Flag a tag that opens inside another unterminated tag (`<div <p>`).
    pub check_nested_brackets: bool,
    /// Block tags that must be explicitly closed.
    pub block_tags: Vec<String>,
}

impl Default for MarkupPolicy {
    fn default() -> Self {
        Self {
            check_script_style: true,
            check_unclosed_blocks: true,
            check_nested_brackets: true,
            block_tags: ["div", "table", "ul", "ol", "section", "article", "blockquote", "form"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Everything a single conversion needs. Supplied once and never mutated by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversionConfig {
    pub layout: LayoutVariant,
    pub include_images: bool,
    pub image_options: ImageOptions,
    pub theme: ThemeSelector,
    pub split: SplitStrategy,
    pub preserve_links: bool,
    /// Style maps keyed by element kind name (`title`, `text`, `image`, `table`, `list`, `link`).
    pub style_overrides: IndexMap<String, StyleMap>,
    pub markup_policy: MarkupPolicy,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            layout: LayoutVariant::default(),
            include_images: true,
            image_options: ImageOptions::default(),
            theme: ThemeSelector::default(),
            split: SplitStrategy::default(),
            preserve_links: true,
            style_overrides: IndexMap::new(),
            markup_policy: MarkupPolicy::default(),
        }
    }
}

/// Style keys holding slide geometry; these must parse as numbers.
pub const GEOMETRY_KEYS: [&str; 4] = ["x", "y", "w", "h"];

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }

    /// Reads a config from JSON, then validates it.
    pub fn from_json(json: &str) -> Result<Self, ConfigValidationError> {
        let config: ConversionConfig = serde_json::from_str(json)
            .map_err(|e| ConfigValidationError::Deserialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the assembler cannot honor.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let quality = self.image_options.quality;
        if !(1..=100).contains(&quality) {
            return Err(ConfigValidationError::Quality(quality));
        }
        for (name, value) in [
            ("maxWidth", self.image_options.max_width),
            ("maxHeight", self.image_options.max_height),
        ] {
            if value == Some(0) {
                return Err(ConfigValidationError::NonPositiveDimension { name, value: 0 });
            }
        }

        if let SplitStrategy::ByCustomSelector {
            selector: Some(selector),
        } = &self.split
        {
            if !selector.trim().is_empty() {
                Selector::parse(selector).map_err(|reason| ConfigValidationError::Selector {
                    selector: selector.clone(),
                    reason,
                })?;
            }
        }

        for (kind, styles) in &self.style_overrides {
            if ElementKind::parse(kind).is_none() {
                return Err(ConfigValidationError::UnknownOverrideKind(kind.clone()));
            }
            for key in GEOMETRY_KEYS {
                if let Some(value) = styles.get(key) {
                    let number = value.trim().parse::<f64>();
                    if !number.is_ok_and(f64::is_finite) {
                        return Err(ConfigValidationError::NonNumericGeometry {
                            kind: kind.clone(),
                            key: key.to_string(),
                            value: value.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Config-level style map for an element kind, if any.
    pub fn overrides_for(&self, kind: ElementKind) -> Option<&StyleMap> {
        self.style_overrides.get(kind.as_str())
    }
}

/// Builder for creating a validated `ConversionConfig`.
#[derive(Default)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn layout(mut self, layout: LayoutVariant) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn theme(mut self, theme: ThemeSelector) -> Self {
        self.config.theme = theme;
        self
    }

    pub fn include_images(mut self, include: bool) -> Self {
        self.config.include_images = include;
        self
    }

    pub fn image_options(mut self, options: ImageOptions) -> Self {
        self.config.image_options = options;
        self
    }

    pub fn split(mut self, split: SplitStrategy) -> Self {
        self.config.split = split;
        self
    }

    pub fn preserve_links(mut self, preserve: bool) -> Self {
        self.config.preserve_links = preserve;
        self
    }

    /// Adds one override; later calls for the same kind and key win.
    pub fn style_override(mut self, kind: ElementKind, key: &str, value: &str) -> Self {
        self.config
            .style_overrides
            .entry(kind.as_str().to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn markup_policy(mut self, policy: MarkupPolicy) -> Self {
        self.config.markup_policy = policy;
        self
    }

    /// Builds the config, returning an error if it does not validate.
    pub fn build(self) -> Result<ConversionConfig, ConfigValidationError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
