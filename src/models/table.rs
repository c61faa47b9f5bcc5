use serde::{Deserialize, Serialize};

use crate::models::properties::{Alignment, VerticalAlignment};

/// Per-cell metadata kept for merged-cell rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellDetail {
    /// Raw inner markup of the cell.
    pub html: String,
    pub colspan: u32,
    pub rowspan: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Alignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valign: Option<VerticalAlignment>,
}

impl Default for CellDetail {
    fn default() -> Self {
        Self {
            html: String::new(),
            colspan: 1,
            rowspan: 1,
            align: None,
            valign: None,
        }
    }
}

/// Styling captured from a `<table>` element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Header row first, then one entry per body row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_details: Option<Vec<Vec<CellDetail>>>,
}

/// A table reduced to plain-text cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableResource {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub style: TableStyle,
}

impl TableResource {
    /// Widest row, header included.
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    /// True when the header and every row have the same length.
    pub fn is_normalized(&self) -> bool {
        let columns = self.headers.len();
        self.rows.iter().all(|row| row.len() == columns)
    }

    /// Right-pads the header and every row with empty strings to the widest row.
    /// Cell details are padded the same way with default (1x1) cells.
    pub fn normalize(&mut self) {
        let max_columns = self.column_count();
        self.headers.resize(max_columns, String::new());
        for row in &mut self.rows {
            row.resize(max_columns, String::new());
        }
        if let Some(details) = self.style.cell_details.as_mut() {
            for row in details.iter_mut() {
                row.resize(max_columns, CellDetail::default());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pads_header_and_rows() {
        let mut table = TableResource {
            headers: vec!["A".to_string()],
            rows: vec![
                vec!["1".to_string(), "2".to_string()],
                vec![],
            ],
            style: TableStyle::default(),
        };
        assert!(!table.is_normalized());
        table.normalize();
        assert!(table.is_normalized());
        assert_eq!(table.headers, vec!["A", ""]);
        assert_eq!(table.rows[1], vec!["", ""]);
    }

    #[test]
    fn test_empty_table_is_normalized() {
        let mut table = TableResource::default();
        table.normalize();
        assert_eq!(table.column_count(), 0);
        assert!(table.is_normalized());
    }
}
