//! Fixed configuration for the transform.
//!
//! The input layout, window rules, and timezone are operational constants of
//! the report, not user-editable settings. They live in explicit structs so
//! the resolver and evaluators can be exercised with varied layouts in tests
//! instead of reaching for hardcoded literals.

use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::Serialize;

/// All input timestamps and clock cutoffs are US Eastern wall-clock time
pub const EASTERN: Tz = chrono_tz::America::New_York;

// ============================================================================
// Column Layout
// ============================================================================

/// Fixed 1-indexed positions of the required input columns.
///
/// The operational sheets place Route in column B, Status in column J, and
/// the status timestamp in column L.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnLayout {
    pub route: usize,
    pub status: usize,
    pub timestamp: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            route: 2,      // B
            status: 10,    // J
            timestamp: 12, // L
        }
    }
}

/// Optional per-record fields located by header keyword instead of position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum OptionalField {
    FleeName,
    DriverName,
}

/// One keyword rule: the first header containing `keyword`
/// (case-insensitively) supplies `field`; no match means the field is
/// absent for all records.
#[derive(Clone, Copy, Debug)]
pub struct KeywordRule {
    pub keyword: &'static str,
    pub field: OptionalField,
}

/// Ordered optional-column rules; first matching header per keyword wins
pub const OPTIONAL_COLUMN_RULES: &[KeywordRule] = &[
    KeywordRule {
        keyword: "flee",
        field: OptionalField::FleeName,
    },
    KeywordRule {
        keyword: "driver",
        field: OptionalField::DriverName,
    },
];

// ============================================================================
// Window Rules
// ============================================================================

/// One compliance window: a clock cutoff plus a completion-ratio threshold
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowRule {
    /// Short label used in logs
    pub label: &'static str,
    /// Output sheet name
    pub sheet_name: &'static str,
    /// Eastern local clock cutoff; records at or after it count
    pub cutoff: NaiveTime,
    /// Route fails when its ratio is below this
    pub threshold: f64,
}

/// The two configured checks: 3pm/50% and 6pm/80%
pub fn window_rules() -> [WindowRule; 2] {
    [
        WindowRule {
            label: "3pm",
            sheet_name: "3pm check",
            cutoff: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            threshold: 0.50,
        },
        WindowRule {
            label: "6pm",
            sheet_name: "6pm check",
            cutoff: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            threshold: 0.80,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_is_b_j_l() {
        let layout = ColumnLayout::default();
        assert_eq!(layout.route, 2);
        assert_eq!(layout.status, 10);
        assert_eq!(layout.timestamp, 12);
    }

    #[test]
    fn window_rules_match_the_report_contract() {
        let [three, six] = window_rules();
        assert_eq!(three.sheet_name, "3pm check");
        assert_eq!(three.cutoff, NaiveTime::from_hms_opt(15, 0, 0).unwrap());
        assert_eq!(three.threshold, 0.50);
        assert_eq!(six.sheet_name, "6pm check");
        assert_eq!(six.cutoff, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert_eq!(six.threshold, 0.80);
    }

    #[test]
    fn optional_rules_cover_flee_and_driver_in_order() {
        assert_eq!(OPTIONAL_COLUMN_RULES.len(), 2);
        assert_eq!(OPTIONAL_COLUMN_RULES[0].keyword, "flee");
        assert_eq!(OPTIONAL_COLUMN_RULES[1].keyword, "driver");
    }
}
