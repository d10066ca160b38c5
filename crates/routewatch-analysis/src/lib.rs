//! # routewatch-analysis
//!
//! Derivation stage of the transform: groups status records by route,
//! builds the Summary and RouteMonitor row sets, and evaluates the two
//! clock-window compliance checks.
//!
//! ## Example
//!
//! ```rust
//! use chrono::TimeZone;
//! use routewatch_analysis::{aggregate, evaluate_window};
//! use routewatch_core::config::{window_rules, EASTERN};
//! use routewatch_core::StatusRecord;
//!
//! let record = StatusRecord {
//!     route: "R1".into(),
//!     status: "Delivered".into(),
//!     status_ts: EASTERN.with_ymd_and_hms(2024, 7, 1, 15, 30, 0).unwrap(),
//!     flee_name: None,
//!     driver_name: None,
//!     source_row: 2,
//! };
//! let now = EASTERN.with_ymd_and_hms(2024, 7, 1, 16, 0, 0).unwrap();
//!
//! let aggregation = aggregate(&[record.clone()], now);
//! assert_eq!(aggregation.summaries.len(), 1);
//!
//! let [three_pm, _] = window_rules();
//! let results = evaluate_window(&three_pm, &[record]);
//! assert!(results[0].passed);
//! ```

pub mod aggregate;
pub mod window;

pub use aggregate::{aggregate, group_by_route, Aggregation};
pub use window::evaluate_window;
