//! Plain cell-table input model.
//!
//! The transform core never reads files itself: the upload collaborator (or
//! the CLI launcher) hands it a [`SheetTable`] of headers plus rows. Cells
//! carry either text or a number; spreadsheet-native date/times arrive as
//! Excel serial day numbers.

use serde::Serialize;

/// A single cell as received from the uploaded sheet
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    /// Classify a raw display string from the reader.
    ///
    /// Numeric-looking content becomes `Number` so that serial date/times
    /// survive the trip through the reader; everything else stays text.
    pub fn from_display(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::Text(trimmed.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Cell content as a display string.
    ///
    /// Whole numbers print without a trailing `.0` so route identifiers
    /// stored as numbers round-trip cleanly.
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
        }
    }
}

/// The uploaded sheet as a header row plus data rows
#[derive(Clone, Debug, Default, Serialize)]
pub struct SheetTable {
    /// Header row, one entry per sheet column
    pub headers: Vec<String>,
    /// Data rows; each row has one cell per sheet column
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { headers, rows }
    }

    /// Sheet width in columns, as given by the header row
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Cell at (row, column), 0-based; short rows read as empty
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn from_display_classifies_cells() {
        assert_eq!(CellValue::from_display(""), CellValue::Empty);
        assert_eq!(CellValue::from_display("   "), CellValue::Empty);
        assert_eq!(CellValue::from_display("45474.625"), CellValue::Number(45474.625));
        assert_eq!(CellValue::from_display("R12"), CellValue::Text("R12".into()));
        assert_eq!(
            CellValue::from_display(" Delivered "),
            CellValue::Text("Delivered".into())
        );
    }

    #[test]
    fn display_round_trips_whole_numbers_without_fraction() {
        assert_eq!(CellValue::Number(42.0).display(), "42");
        assert_eq!(CellValue::Number(45474.625).display(), "45474.625");
        assert_eq!(CellValue::Text("R9".into()).display(), "R9");
        assert_eq!(CellValue::Empty.display(), "");
    }

    #[test]
    fn short_rows_read_as_empty_cells() {
        let table = SheetTable::new(
            vec!["A".into(), "B".into(), "C".into()],
            vec![vec![CellValue::Text("x".into())]],
        );
        assert_eq!(table.width(), 3);
        assert_eq!(table.cell(0, 0), &CellValue::Text("x".into()));
        assert!(table.cell(0, 2).is_empty());
        assert!(table.cell(5, 0).is_empty());
    }
}
