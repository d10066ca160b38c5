//! Row Normalizer.
//!
//! Walks the data rows of a resolved table and builds one [`StatusRecord`]
//! per valid row. Rows with an empty route, an empty status, or an
//! unparseable timestamp become [`ExceptionEntry`] values instead; the run
//! continues either way.
//!
//! Invariant: `total_rows == records.len() + exceptions.len()`.

use routewatch_core::table::SheetTable;
use routewatch_core::{ExceptionEntry, ExceptionReason, StatusRecord};
use tracing::info;

use crate::resolve::ResolvedColumns;
use crate::timestamp;

/// Result of normalizing every data row of the input
#[derive(Clone, Debug, Default)]
pub struct Ingestion {
    pub records: Vec<StatusRecord>,
    pub exceptions: Vec<ExceptionEntry>,
    /// Data rows seen (header excluded); always records + exceptions
    pub total_rows: usize,
}

/// Normalize all data rows against the resolved columns.
pub fn normalize_rows(table: &SheetTable, columns: &ResolvedColumns) -> Ingestion {
    let mut records = Vec::new();
    let mut exceptions = Vec::new();

    for idx in 0..table.rows.len() {
        // Sheet row number: data starts at row 2, below the header
        let source_row = idx as u32 + 2;

        let route = table.cell(idx, columns.route).display().trim().to_string();
        let status = table.cell(idx, columns.status).display().trim().to_string();
        let raw_ts = table.cell(idx, columns.timestamp);

        let reason = if route.is_empty() {
            Some(ExceptionReason::MissingRoute)
        } else if status.is_empty() {
            Some(ExceptionReason::MissingStatus)
        } else {
            None
        };

        if let Some(reason) = reason {
            exceptions.push(ExceptionEntry {
                source_row,
                reason,
                route,
                status,
                raw_timestamp: raw_ts.display(),
            });
            continue;
        }

        match timestamp::parse_eastern(raw_ts) {
            Ok(status_ts) => records.push(StatusRecord {
                route,
                status,
                status_ts,
                flee_name: optional_field(table, idx, columns.flee_name),
                driver_name: optional_field(table, idx, columns.driver_name),
                source_row,
            }),
            Err(_) => exceptions.push(ExceptionEntry {
                source_row,
                reason: ExceptionReason::BadTimestamp,
                route,
                status,
                raw_timestamp: raw_ts.display(),
            }),
        }
    }

    let total_rows = table.rows.len();
    debug_assert_eq!(total_rows, records.len() + exceptions.len());
    info!(
        rows = total_rows,
        records = records.len(),
        exceptions = exceptions.len(),
        "normalized input rows"
    );

    Ingestion {
        records,
        exceptions,
        total_rows,
    }
}

fn optional_field(table: &SheetTable, row: usize, col: Option<usize>) -> Option<String> {
    let value = table.cell(row, col?).display();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
