//! Maps each resource kind onto backend rendering options.

use super::constants::*;
use super::utils::{
    css_font_size, estimate_table_height, estimate_text_height, heading_font_size,
    resolve_color, LayoutCursor, StyleLayers,
};
use crate::backend::{
    Hyperlink, HyperlinkOptions, ImageData, ImagePlacement, ListOptions, RunOptions,
    TableCellOptions, TableOptions, TextOptions, TextRun,
};
use crate::converters::extract::format_list_items;
use crate::errors::TableExtractionError;
use crate::images::ProcessedImage;
use crate::models::colors::normalize_color;
use crate::models::common::{px_to_inches, Rect};
use crate::models::image::ImageResource;
use crate::models::link::LinkResource;
use crate::models::list::ListResource;
use crate::models::properties::{Alignment, FormatDescriptor};
use crate::models::table::{CellDetail, TableResource};
use crate::models::text::TextResource;
use crate::models::theme::ThemeDefinition;

// --- Text ---

fn run_options(format: &FormatDescriptor) -> RunOptions {
    RunOptions {
        bold: format.is_bold(),
        italic: format.is_italic(),
        underline: format.underline.unwrap_or(false),
        strike: format.strikethrough.unwrap_or(false),
        superscript: format.superscript.unwrap_or(false),
        subscript: format.subscript.unwrap_or(false),
        color: format.color.as_deref().and_then(normalize_color),
        highlight: format.background_color.as_deref().and_then(normalize_color),
        font_face: format.font_family.clone(),
        font_size: css_font_size(format.font_size.as_deref()),
        hyperlink: None,
    }
}

/// Options for the slide title.
pub fn title_options(
    title: &str,
    rect: Rect,
    layers: &StyleLayers,
    theme: &ThemeDefinition,
) -> TextOptions {
    let font_size = layers.font_size().unwrap_or(TITLE_FONT_SIZE_PT);
    let align = layers
        .get("align")
        .and_then(Alignment::parse)
        .unwrap_or(Alignment::Left);
    let options = RunOptions {
        bold: true,
        ..Default::default()
    };
    TextOptions {
        rect,
        font_face: layers
            .font_face()
            .unwrap_or_else(|| theme.font_set.heading.clone()),
        font_size,
        color: layers
            .color()
            .unwrap_or_else(|| theme.properties.heading_color.clone()),
        bold: true,
        align,
        runs: vec![TextRun {
            text: title.to_string(),
            options,
        }],
    }
}

/// Options for a text block, placed with the cursor.
///
/// Font size comes from an override, the authored size, then the heading level. Colors are
/// normalized to hex; headings use the theme heading color and font.
pub fn text_options(
    resource: &TextResource,
    area: Rect,
    layers: &StyleLayers,
    theme: &ThemeDefinition,
    cursor: &mut LayoutCursor,
) -> TextOptions {
    let format = &resource.format;
    let is_heading = format.heading_level.is_some();

    let font_size = layers
        .font_size()
        .or_else(|| css_font_size(format.font_size.as_deref()))
        .unwrap_or_else(|| heading_font_size(format.heading_level));
    let font_face = layers
        .font_face()
        .or_else(|| format.font_family.clone())
        .unwrap_or_else(|| {
            if is_heading {
                theme.font_set.heading.clone()
            } else {
                theme.font_set.body.clone()
            }
        });
    let default_color = if is_heading {
        &theme.properties.heading_color
    } else {
        &theme.properties.body_color
    };
    let color = layers
        .color()
        .unwrap_or_else(|| resolve_color(format.color.as_deref(), default_color));
    let align = layers
        .get("align")
        .and_then(Alignment::parse)
        .or(format.alignment)
        .unwrap_or(Alignment::Left);

    let runs = if resource.has_runs() {
        resource
            .runs
            .iter()
            .map(|run| TextRun {
                text: run.content.clone(),
                options: run_options(&run.format),
            })
            .collect()
    } else {
        vec![TextRun {
            text: resource.content.clone(),
            options: run_options(format),
        }]
    };

    let text: String = runs.iter().map(|run| run.text.as_str()).collect();
    let height = area
        .h
        .unwrap_or_else(|| estimate_text_height(&text, font_size, area.w));
    TextOptions {
        rect: cursor.place(area, height, layers.has_explicit_y()),
        font_face,
        font_size,
        color,
        bold: format.is_bold() || is_heading,
        align,
        runs,
    }
}

// --- Images ---

fn aligned_x(area: Rect, width: f64, image: &ImageResource) -> f64 {
    let align = image
        .style
        .as_ref()
        .map(|style| style.align)
        .unwrap_or(Alignment::Center);
    match align {
        Alignment::Left | Alignment::Justify => area.x,
        Alignment::Right => area.x + (area.w - width).max(0.0),
        Alignment::Center => area.x + ((area.w - width) / 2.0).max(0.0),
    }
}

/// Placement of a re-encoded image, scaled down to fit the image area.
pub fn processed_image_placement(
    image: &ImageResource,
    processed: &ProcessedImage,
    area: Rect,
) -> ImagePlacement {
    let mut width = px_to_inches(f64::from(processed.width));
    let mut height = px_to_inches(f64::from(processed.height));
    let max_height = area.h.unwrap_or(f64::INFINITY);
    let scale = (area.w / width).min(max_height / height).min(1.0);
    width *= scale;
    height *= scale;

    ImagePlacement {
        rect: Rect::new(aligned_x(area, width, image), area.y, width, Some(height)),
        data: ImageData::DataUri(processed.data_uri.clone()),
        alt: image.alt.clone(),
        processed: true,
    }
}

/// Placement of an image whose processing failed: the original pixel geometry, unscaled,
/// and the original source.
pub fn fallback_image_placement(image: &ImageResource, area: Rect) -> ImagePlacement {
    let width = px_to_inches(f64::from(image.width));
    let height = px_to_inches(f64::from(image.height));
    let data = match &image.data_uri {
        Some(uri) => ImageData::DataUri(uri.clone()),
        None => ImageData::Path(image.src.clone()),
    };
    ImagePlacement {
        rect: Rect::new(aligned_x(area, width, image), area.y, width, Some(height)),
        data,
        alt: image.alt.clone(),
        processed: false,
    }
}

// --- Tables ---

/// Column widths proportional to the longest cell text of each column, each at least
/// `MIN_COLUMN_WIDTH_IN`, scaled down together when they overflow `total_width`.
pub fn column_widths(table: &TableResource, total_width: f64) -> Vec<f64> {
    let columns = table.column_count();
    let lengths: Vec<f64> = (0..columns)
        .map(|col| {
            std::iter::once(&table.headers)
                .chain(table.rows.iter())
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(1) as f64
        })
        .collect();
    let total: f64 = lengths.iter().sum();
    let widths: Vec<f64> = lengths
        .iter()
        .map(|len| (total_width * len / total).max(MIN_COLUMN_WIDTH_IN))
        .collect();

    let sum: f64 = widths.iter().sum();
    if sum > total_width {
        let scale = total_width / sum;
        widths.into_iter().map(|w| w * scale).collect()
    } else {
        widths
    }
}

fn cell_options(text: &str, detail: Option<&CellDetail>, header: bool) -> TableCellOptions {
    let default_align = if header {
        Alignment::Center
    } else {
        Alignment::Left
    };
    TableCellOptions {
        text: text.to_string(),
        bold: header,
        fill: None,
        color: String::new(),
        align: detail.and_then(|d| d.align).unwrap_or(default_align),
        valign: detail.and_then(|d| d.valign),
        colspan: detail.map_or(1, |d| d.colspan),
        rowspan: detail.map_or(1, |d| d.rowspan),
    }
}

/// Options for a normalized table: bold header cells on the theme accent, zebra-striped
/// body rows, merged-cell spans passed through.
pub fn table_options(
    table: &TableResource,
    area: Rect,
    layers: &StyleLayers,
    theme: &ThemeDefinition,
    cursor: &mut LayoutCursor,
) -> Result<TableOptions, TableExtractionError> {
    if table.column_count() == 0 {
        return Err(TableExtractionError::NoColumns);
    }
    let details = table.style.cell_details.as_ref();
    let detail = |row: usize, col: usize| details.and_then(|d| d.get(row)).and_then(|r| r.get(col));

    let mut rows = Vec::with_capacity(table.rows.len() + 1);
    rows.push(
        table
            .headers
            .iter()
            .enumerate()
            .map(|(col, text)| TableCellOptions {
                fill: Some(theme.accent().to_string()),
                color: HEADER_TEXT_COLOR.to_string(),
                ..cell_options(text, detail(0, col), true)
            })
            .collect(),
    );
    for (index, row) in table.rows.iter().enumerate() {
        let fill = ZEBRA_FILLS[index % 2];
        rows.push(
            row.iter()
                .enumerate()
                .map(|(col, text)| TableCellOptions {
                    fill: Some(fill.to_string()),
                    color: theme.properties.body_color.clone(),
                    ..cell_options(text, detail(index + 1, col), false)
                })
                .collect(),
        );
    }

    let font_size = layers.font_size().unwrap_or(TABLE_FONT_SIZE_PT);
    let height = area
        .h
        .unwrap_or_else(|| estimate_table_height(rows.len(), font_size));
    Ok(TableOptions {
        rect: cursor.place(area, height, layers.has_explicit_y()),
        col_widths: column_widths(table, area.w),
        rows,
        font_face: layers
            .font_face()
            .unwrap_or_else(|| theme.font_set.body.clone()),
        font_size,
        border_color: TABLE_BORDER_COLOR.to_string(),
    })
}

/// Unstyled table options used when styling a table fails.
pub fn fallback_table_options(
    table: &TableResource,
    area: Rect,
    theme: &ThemeDefinition,
    cursor: &mut LayoutCursor,
) -> TableOptions {
    let rows: Vec<Vec<TableCellOptions>> = std::iter::once(&table.headers)
        .chain(table.rows.iter())
        .map(|row| {
            row.iter()
                .map(|text| TableCellOptions {
                    color: theme.properties.body_color.clone(),
                    ..cell_options(text, None, false)
                })
                .collect()
        })
        .collect();
    let height = estimate_table_height(rows.len(), TABLE_FONT_SIZE_PT);
    TableOptions {
        rect: cursor.place(area, height, false),
        col_widths: Vec::new(),
        rows,
        font_face: theme.font_set.body.clone(),
        font_size: TABLE_FONT_SIZE_PT,
        border_color: TABLE_BORDER_COLOR.to_string(),
    }
}

// --- Lists ---

/// Options for a list: one line per formatted item and the bullet descriptor.
pub fn list_options(
    list: &ListResource,
    area: Rect,
    layers: &StyleLayers,
    theme: &ThemeDefinition,
    cursor: &mut LayoutCursor,
) -> ListOptions {
    let lines = format_list_items(list);
    let font_size = layers
        .font_size()
        .or_else(|| css_font_size(list.style.font_size.as_deref()))
        .unwrap_or(BODY_FONT_SIZE_PT);
    let color = layers.color().unwrap_or_else(|| {
        resolve_color(list.style.color.as_deref(), &theme.properties.body_color)
    });
    let font_face = layers
        .font_face()
        .or_else(|| list.style.font_family.clone())
        .unwrap_or_else(|| theme.font_set.body.clone());

    let height = area
        .h
        .unwrap_or_else(|| estimate_text_height(&lines.join("\n"), font_size, area.w));
    ListOptions {
        rect: cursor.place(area, height, layers.has_explicit_y()),
        bullet: list.bullet(),
        lines,
        font_face,
        font_size,
        color,
    }
}

// --- Links ---

/// Options for a hyperlink: underlined, link-colored, bound to the normalized href with the
/// href as tooltip.
pub fn link_options(
    link: &LinkResource,
    area: Rect,
    layers: &StyleLayers,
    theme: &ThemeDefinition,
    cursor: &mut LayoutCursor,
) -> HyperlinkOptions {
    let font_size = layers.font_size().unwrap_or(LINK_FONT_SIZE_PT);
    let height = area
        .h
        .unwrap_or_else(|| estimate_text_height(&link.text, font_size, area.w));
    HyperlinkOptions {
        rect: cursor.place(area, height, layers.has_explicit_y()),
        text: link.text.clone(),
        hyperlink: Hyperlink {
            url: link.href.clone(),
            tooltip: link.href.clone(),
        },
        color: layers.color().unwrap_or_else(|| LINK_COLOR.to_string()),
        underline: true,
        font_face: layers
            .font_face()
            .unwrap_or_else(|| theme.font_set.body.clone()),
        font_size,
    }
}
