//! Status semantics and per-route alert classification.
//!
//! Status values are free-form strings from the input sheet. Two of them
//! carry meaning for the report: a completed delivery is an exact
//! case-insensitive `delivered`, and a failure is any status containing
//! `FAIL`. Everything else counts as remaining work.

use serde::Serialize;

/// Does this status value mean a completed delivery?
pub fn is_delivered(status: &str) -> bool {
    status.trim().eq_ignore_ascii_case("delivered")
}

/// Does this status value mean a failed delivery attempt?
pub fn is_failed(status: &str) -> bool {
    status.to_ascii_uppercase().contains("FAIL")
}

// ============================================================================
// Route Flags
// ============================================================================

/// Whether a route has any delivered event at all
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StatusFlag {
    HasDelivered,
    NoDelivered,
}

impl StatusFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFlag::HasDelivered => "HAS_DELIVERED",
            StatusFlag::NoDelivered => "NO_DELIVERED",
        }
    }
}

impl std::fmt::Display for StatusFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stall thresholds in minutes since the latest delivered event
pub const STALL_YELLOW_MINUTES: f64 = 30.0;
pub const STALL_RED_MINUTES: f64 = 60.0;

/// Alert classification for a route, derived from its delivery pace
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AlertBucket {
    /// Delivering, last event within 30 minutes
    Ok,
    /// Stalled for more than 30 minutes
    Yellow,
    /// Stalled for more than 60 minutes
    Red,
    /// No delivered event yet
    NoDelivered,
}

impl AlertBucket {
    /// Classify from minutes since the latest delivered event
    /// (`None` = the route has no delivered event).
    pub fn classify(minutes_since_last: Option<f64>) -> Self {
        match minutes_since_last {
            None => AlertBucket::NoDelivered,
            Some(m) if m > STALL_RED_MINUTES => AlertBucket::Red,
            Some(m) if m > STALL_YELLOW_MINUTES => AlertBucket::Yellow,
            Some(_) => AlertBucket::Ok,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertBucket::Ok => "OK",
            AlertBucket::Yellow => "YELLOW",
            AlertBucket::Red => "RED",
            AlertBucket::NoDelivered => "NO_DELIVERED",
        }
    }
}

impl std::fmt::Display for AlertBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
