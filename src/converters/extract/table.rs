//! Table extraction and normalization.

use markup5ever_rcdom::Handle;

use crate::converters::html::dom::{
    element_children, find_all, find_body, has_tag, inner_html, non_empty_attr, parse_markup,
    tag_name, text_content,
};
use crate::converters::html::style::inline_style;
use crate::errors::TableExtractionError;
use crate::models::properties::{Alignment, VerticalAlignment};
use crate::models::table::{CellDetail, TableResource, TableStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowGroup {
    Head,
    Body,
    Foot,
    /// A `<tr>` directly under `<table>`.
    Bare,
}

struct Row {
    node: Handle,
    group: RowGroup,
}

/// Rows that belong to `table` itself; rows of nested tables are excluded.
fn own_rows(table: &Handle) -> Vec<Row> {
    let mut rows = Vec::new();
    for child in element_children(table) {
        match tag_name(&child) {
            Some("tr") => rows.push(Row {
                node: child.clone(),
                group: RowGroup::Bare,
            }),
            Some(tag @ ("thead" | "tbody" | "tfoot")) => {
                let group = match tag {
                    "thead" => RowGroup::Head,
                    "tbody" => RowGroup::Body,
                    _ => RowGroup::Foot,
                };
                rows.extend(
                    element_children(&child)
                        .into_iter()
                        .filter(|row| has_tag(row, &["tr"]))
                        .map(|node| Row { node, group }),
                );
            }
            _ => {}
        }
    }
    rows
}

fn span(cell: &Handle, name: &str) -> u32 {
    non_empty_attr(cell, name)
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|span| *span >= 1)
        .unwrap_or(1)
}

fn cell_detail(cell: &Handle) -> CellDetail {
    let styles = inline_style(cell);
    CellDetail {
        html: inner_html(cell),
        colspan: span(cell, "colspan"),
        rowspan: span(cell, "rowspan"),
        align: styles
            .get("text-align")
            .and_then(|a| Alignment::parse(a))
            .or_else(|| non_empty_attr(cell, "align").and_then(|a| Alignment::parse(&a))),
        valign: styles
            .get("vertical-align")
            .and_then(|v| VerticalAlignment::parse(v))
            .or_else(|| non_empty_attr(cell, "valign").and_then(|v| VerticalAlignment::parse(&v))),
    }
}

fn read_row(row: &Handle) -> (Vec<String>, Vec<CellDetail>) {
    element_children(row)
        .iter()
        .filter(|cell| has_tag(cell, &["td", "th"]))
        .map(|cell| (text_content(cell), cell_detail(cell)))
        .unzip()
}

fn table_style(table: &Handle, details: Vec<Vec<CellDetail>>) -> TableStyle {
    let styles = inline_style(table);
    let has_merges = details
        .iter()
        .flatten()
        .any(|detail| detail.colspan > 1 || detail.rowspan > 1);
    let has_alignment = details
        .iter()
        .flatten()
        .any(|detail| detail.align.is_some() || detail.valign.is_some());

    TableStyle {
        border: non_empty_attr(table, "border").or_else(|| styles.get("border").cloned()),
        width: non_empty_attr(table, "width").or_else(|| styles.get("width").cloned()),
        background_color: non_empty_attr(table, "bgcolor")
            .or_else(|| styles.get("background-color").cloned()),
        cell_details: (has_merges || has_alignment).then_some(details),
    }
}

/// Extracts a `<table>` element.
///
/// The header row is the first `<thead>` row if there is one, else the first row. Body rows
/// are the `<tbody>` rows when the table has any, else every row but the header. The result
/// is normalized.
pub fn extract_table(node: &Handle) -> Result<TableResource, TableExtractionError> {
    match tag_name(node) {
        Some("table") => {}
        Some(other) => return Err(TableExtractionError::NotATable(other.to_string())),
        None => return Err(TableExtractionError::NotATable("#text".to_string())),
    }

    let rows = own_rows(node);
    if rows.is_empty() {
        return Err(TableExtractionError::NoRows);
    }
    let header_index = rows
        .iter()
        .position(|row| row.group == RowGroup::Head)
        .unwrap_or(0);
    let has_tbody = rows
        .iter()
        .enumerate()
        .any(|(index, row)| index != header_index && row.group == RowGroup::Body);

    let (headers, header_details) = read_row(&rows[header_index].node);
    let mut body = Vec::new();
    let mut details = vec![header_details];
    for (index, row) in rows.iter().enumerate() {
        if index == header_index || (has_tbody && row.group != RowGroup::Body) {
            continue;
        }
        let (cells, cell_details) = read_row(&row.node);
        body.push(cells);
        details.push(cell_details);
    }

    let mut table = TableResource {
        headers,
        rows: body,
        style: table_style(node, details),
    };
    if table.column_count() == 0 {
        return Err(TableExtractionError::NoColumns);
    }
    table.normalize();
    Ok(table)
}

/// Every top-level table of a markup fragment. Tables that fail to extract are skipped.
pub fn extract_tables(fragment: &str) -> Vec<TableResource> {
    let dom = parse_markup(fragment);
    let Some(body) = find_body(&dom) else {
        return Vec::new();
    };
    find_all(&body, |node| has_tag(node, &["table"]))
        .iter()
        .filter_map(|table| match extract_table(table) {
            Ok(table) => Some(table),
            Err(e) => {
                log::warn!("Skipping table: {}", e);
                None
            }
        })
        .collect()
}
