//! Column Resolver.
//!
//! Required columns live at fixed 1-indexed positions given by
//! [`ColumnLayout`]; optional columns are found by case-insensitive keyword
//! match over the header row, first match per keyword wins. A required
//! position outside the sheet width is a fatal [`SchemaError`].

use routewatch_core::config::{ColumnLayout, OptionalField, OPTIONAL_COLUMN_RULES};
use routewatch_core::SchemaError;
use tracing::debug;

/// 0-based column indices into a data row after resolution
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub route: usize,
    pub status: usize,
    pub timestamp: usize,
    pub flee_name: Option<usize>,
    pub driver_name: Option<usize>,
}

/// Resolve the fixed layout and keyword rules against a header row.
pub fn resolve_columns(
    layout: &ColumnLayout,
    headers: &[String],
) -> Result<ResolvedColumns, SchemaError> {
    let width = headers.len();
    if width == 0 {
        return Err(SchemaError::EmptySheet);
    }

    let route = require("Route", layout.route, width)?;
    let status = require("Status", layout.status, width)?;
    let timestamp = require("Status-timestamp", layout.timestamp, width)?;

    let mut flee_name = None;
    let mut driver_name = None;
    for rule in OPTIONAL_COLUMN_RULES {
        let found = headers
            .iter()
            .position(|h| h.to_ascii_lowercase().contains(rule.keyword));
        match rule.field {
            OptionalField::FleeName => flee_name = found,
            OptionalField::DriverName => driver_name = found,
        }
    }

    debug!(
        route,
        status,
        timestamp,
        flee = ?flee_name,
        driver = ?driver_name,
        "resolved input columns"
    );

    Ok(ResolvedColumns {
        route,
        status,
        timestamp,
        flee_name,
        driver_name,
    })
}

fn require(name: &'static str, position: usize, width: usize) -> Result<usize, SchemaError> {
    if position == 0 || position > width {
        return Err(SchemaError::ColumnOutOfRange {
            name,
            position,
            width,
        });
    }
    Ok(position - 1)
}
