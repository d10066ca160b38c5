//! # routewatch-report
//!
//! Output side of the transform: renders the derived route views into a
//! six-sheet `.xlsx` workbook (RouteMonitor, Summary, Exceptions, the two
//! window-check sheets, and Meta).
//!
//! Output is byte-deterministic for identical input and a frozen generation
//! timestamp; the generation timestamp is the only intentionally varying
//! field.
//!
//! ## Example
//!
//! ```rust,ignore
//! use routewatch_report::{ExcelReport, ReportInput};
//!
//! let report = ExcelReport::new();
//! let bytes = report.render_to_bytes(&input)?;
//! std::fs::write("route_report.xlsx", bytes)?;
//! ```

pub mod excel;

pub use excel::{ExcelReport, ReportInput};
