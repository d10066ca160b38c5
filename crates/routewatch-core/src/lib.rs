//! # routewatch-core
//!
//! Core domain model and configuration for the routewatch status-report
//! transform.
//!
//! This crate provides:
//! - Domain types: `StatusRecord`, `ExceptionEntry`, `RouteSummary`,
//!   `WindowCheckResult`, `RouteMonitorRow`, `RunMeta`
//! - The plain cell-table input model ([`table`])
//! - Fixed configuration: column layout, window rules, timezone ([`config`])
//! - Status semantics and alert classification ([`status`])
//! - The status-to-color display mapping ([`color`])
//! - Error types shared across the pipeline
//!
//! ## Example
//!
//! ```rust
//! use chrono::TimeZone;
//! use routewatch_core::{config::EASTERN, StatusRecord};
//!
//! let record = StatusRecord {
//!     route: "R12".into(),
//!     status: "Delivered".into(),
//!     status_ts: EASTERN.with_ymd_and_hms(2024, 7, 1, 14, 30, 0).unwrap(),
//!     flee_name: None,
//!     driver_name: Some("J. Ortiz".into()),
//!     source_row: 2,
//! };
//! assert!(routewatch_core::status::is_delivered(&record.status));
//! ```

pub mod color;
pub mod config;
pub mod status;
pub mod table;

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;
use thiserror::Error;

use crate::status::{AlertBucket, StatusFlag};

// ============================================================================
// Type Aliases
// ============================================================================

/// Identifier for one delivery route grouping multiple status events
pub type RouteId = String;

// ============================================================================
// Status Records
// ============================================================================

/// One normalized status event from the input sheet.
///
/// Created per input row by the Row Normalizer; immutable after creation.
/// Rows that fail validation become an [`ExceptionEntry`] instead.
#[derive(Clone, Debug, Serialize)]
pub struct StatusRecord {
    /// Route identifier (column B of the input)
    pub route: RouteId,
    /// Raw status value (column J), e.g. "Delivered", "In Transit"
    pub status: String,
    /// Event timestamp (column L), localized to US Eastern
    pub status_ts: DateTime<Tz>,
    /// Fleet name, when a "flee" column was resolved
    pub flee_name: Option<String>,
    /// Driver name, when a "driver" column was resolved
    pub driver_name: Option<String>,
    /// 1-based row number in the input sheet (row 1 is the header)
    pub source_row: u32,
}

/// Why a row was routed to the Exceptions sheet instead of aggregation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ExceptionReason {
    /// Route cell was empty
    MissingRoute,
    /// Status cell was empty
    MissingStatus,
    /// Timestamp cell failed to parse
    BadTimestamp,
}

impl ExceptionReason {
    /// Stable reason code written to the Exceptions sheet
    pub fn as_str(&self) -> &'static str {
        match self {
            ExceptionReason::MissingRoute => "MissingRoute",
            ExceptionReason::MissingStatus => "MissingStatus",
            ExceptionReason::BadTimestamp => "BadTimestamp",
        }
    }
}

impl std::fmt::Display for ExceptionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An input row that failed validation, recorded separately from aggregation
#[derive(Clone, Debug, Serialize)]
pub struct ExceptionEntry {
    /// 1-based row number in the input sheet
    pub source_row: u32,
    /// Reason code for the rejection
    pub reason: ExceptionReason,
    /// Route cell content as read (may be empty)
    pub route: String,
    /// Status cell content as read (may be empty)
    pub status: String,
    /// Timestamp cell content as read, for operator triage
    pub raw_timestamp: String,
}

// ============================================================================
// Derived Views
// ============================================================================

/// Per-route summary counts for the Summary sheet.
///
/// `status_counts` preserves first-seen status-value ordering within the
/// route so sheet output stays deterministic.
#[derive(Clone, Debug, Serialize)]
pub struct RouteSummary {
    pub route: RouteId,
    /// Total records for the route
    pub total: u64,
    /// Count per distinct status value, first-seen order
    pub status_counts: Vec<(String, u64)>,
}

impl RouteSummary {
    /// Count for one status value (0 when the route never saw it)
    pub fn count_for(&self, status: &str) -> u64 {
        self.status_counts
            .iter()
            .find(|(s, _)| s == status)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

/// Outcome of one window rule for one route
#[derive(Clone, Debug, Serialize)]
pub struct WindowCheckResult {
    pub route: RouteId,
    /// Delivered records timestamped at or after the cutoff instant
    pub delivered_after_cutoff: u64,
    /// Total records for the route
    pub total: u64,
    /// delivered_after_cutoff / total, in [0, 1]
    pub ratio: f64,
    /// false when ratio < the rule's threshold
    pub passed: bool,
}

/// One row of the RouteMonitor sheet: the per-route operational view.
///
/// Pace metrics (`minutes_since_last` and friends) are measured against the
/// run timestamp and are `None` for routes without a delivered event.
#[derive(Clone, Debug, Serialize)]
pub struct RouteMonitorRow {
    pub route: RouteId,
    pub driver_name: Option<String>,
    pub flee_name: Option<String>,
    pub total: u64,
    /// Records with a delivered status
    pub delivered: u64,
    /// Records whose status contains "FAIL"
    pub failed: u64,
    /// total - delivered - failed
    pub remaining: u64,
    /// delivered / total
    pub completion_rate: f64,
    /// Earliest delivered event
    pub first_delivery: Option<DateTime<Tz>>,
    /// Latest delivered event
    pub latest_delivery: Option<DateTime<Tz>>,
    /// Hours from the first delivered event to the run timestamp
    pub hours_since_first: Option<f64>,
    /// delivered / hours_since_first
    pub deliveries_per_hour: Option<f64>,
    /// Minutes from the latest delivered event to the run timestamp
    pub minutes_since_last: Option<f64>,
    pub status_flag: StatusFlag,
    pub alert_bucket: AlertBucket,
}

/// Run-level metadata recorded on the Meta sheet
#[derive(Clone, Debug, Serialize)]
pub struct RunMeta {
    /// Generation timestamp (Eastern); the only intentionally varying field
    pub generated_at: DateTime<Tz>,
    /// Name of the uploaded source file
    pub source_file: String,
    /// Data rows in the input (header excluded)
    pub total_rows: usize,
    /// Rows that became status records
    pub record_count: usize,
    /// Rows that became exceptions
    pub exception_count: usize,
    /// Distinct routes seen
    pub route_count: usize,
}

// ============================================================================
// Errors
// ============================================================================

/// Fatal schema failure: the fixed column layout does not fit the sheet
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("required column {name} (position {position}) is outside the sheet width {width}")]
    ColumnOutOfRange {
        name: &'static str,
        position: usize,
        width: usize,
    },

    #[error("input sheet has no header row")]
    EmptySheet,
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================
