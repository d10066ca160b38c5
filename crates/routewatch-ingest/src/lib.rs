//! # routewatch-ingest
//!
//! Input side of the transform: load an uploaded `.xlsx` workbook into the
//! plain cell table, resolve the required and optional columns, and
//! normalize data rows into status records (or exception entries).
//!
//! ## Example
//!
//! ```rust
//! use routewatch_core::config::ColumnLayout;
//! use routewatch_core::table::{CellValue, SheetTable};
//! use routewatch_ingest::{normalize_rows, resolve_columns};
//!
//! let mut headers = vec![String::new(); 12];
//! headers[1] = "Route".into();
//! headers[9] = "Status".into();
//! headers[11] = "Status Time".into();
//!
//! let mut row = vec![CellValue::Empty; 12];
//! row[1] = CellValue::Text("R1".into());
//! row[9] = CellValue::Text("Delivered".into());
//! row[11] = CellValue::Text("2024-07-01 14:30:00".into());
//!
//! let table = SheetTable::new(headers, vec![row]);
//! let columns = resolve_columns(&ColumnLayout::default(), &table.headers).unwrap();
//! let ingestion = normalize_rows(&table, &columns);
//! assert_eq!(ingestion.records.len(), 1);
//! assert!(ingestion.exceptions.is_empty());
//! ```

pub mod normalize;
pub mod resolve;
pub mod timestamp;

pub use normalize::{normalize_rows, Ingestion};
pub use resolve::{resolve_columns, ResolvedColumns};

use std::path::Path;

use routewatch_core::table::{CellValue, SheetTable};
use thiserror::Error;
use tracing::debug;

/// Failure to read the uploaded workbook at all (fatal, aborts the run)
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read workbook: {0}")]
    Workbook(String),

    #[error("workbook has no sheets")]
    NoSheets,
}

/// Load the first sheet of an `.xlsx` workbook into a [`SheetTable`].
///
/// Row 1 is taken as the header row; everything below it becomes data rows.
/// Cell content is classified into text or number by [`CellValue::from_display`],
/// so date/time cells come through as Excel serial numbers.
pub fn load_table(path: &Path) -> Result<SheetTable, LoadError> {
    let book = umya_spreadsheet::reader::xlsx::read(path)
        .map_err(|e| LoadError::Workbook(e.to_string()))?;
    let sheet = book.get_sheet(&0).ok_or(LoadError::NoSheets)?;

    let highest_col = sheet.get_highest_column();
    let highest_row = sheet.get_highest_row();
    if highest_row == 0 || highest_col == 0 {
        return Ok(SheetTable::default());
    }

    let headers: Vec<String> = (1..=highest_col)
        .map(|col| sheet.get_value((col, 1)).trim().to_string())
        .collect();

    let mut rows = Vec::with_capacity(highest_row.saturating_sub(1) as usize);
    for row in 2..=highest_row {
        let cells: Vec<CellValue> = (1..=highest_col)
            .map(|col| CellValue::from_display(&sheet.get_value((col, row))))
            .collect();
        rows.push(cells);
    }

    debug!(
        columns = headers.len(),
        rows = rows.len(),
        "loaded workbook sheet"
    );
    Ok(SheetTable::new(headers, rows))
}
