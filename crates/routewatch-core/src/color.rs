//! Status-to-color display mapping for the RouteMonitor sheet.
//!
//! A pure function from a route's alert classification to a declared display
//! color; the renderer applies it at write time. Routes delivering on pace
//! get no fill.

use crate::status::AlertBucket;
use serde::Serialize;

/// Fill colors used on the RouteMonitor sheet
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DisplayColor {
    /// Stalled more than 30 minutes
    Yellow,
    /// Stalled more than 60 minutes
    Red,
    /// No delivered event yet
    Purple,
}

impl DisplayColor {
    /// RGB value for the spreadsheet writer
    pub const fn rgb(self) -> u32 {
        match self {
            DisplayColor::Yellow => 0xFFF2CC,
            DisplayColor::Red => 0xF8CBAD,
            DisplayColor::Purple => 0xE4DFEC,
        }
    }
}

/// The fixed status→color mapping for RouteMonitor rows
pub fn alert_color(bucket: AlertBucket) -> Option<DisplayColor> {
    match bucket {
        AlertBucket::Ok => None,
        AlertBucket::Yellow => Some(DisplayColor::Yellow),
        AlertBucket::Red => Some(DisplayColor::Red),
        AlertBucket::NoDelivered => Some(DisplayColor::Purple),
    }
}
