//! Aggregator.
//!
//! Groups records by route in first-seen order, then derives the Summary
//! row set (per-status counts) and the RouteMonitor row set (delivery pace
//! against the run timestamp, stall flags, alert buckets).

use std::cmp::Ordering;

use chrono::DateTime;
use chrono_tz::Tz;
use routewatch_core::status::{self, AlertBucket, StatusFlag};
use routewatch_core::{RouteId, RouteMonitorRow, RouteSummary, StatusRecord};
use tracing::debug;

/// Everything the aggregation stage derives from the record set
#[derive(Clone, Debug, Default)]
pub struct Aggregation {
    /// One summary per route, first-seen route order
    pub summaries: Vec<RouteSummary>,
    /// Distinct status values across all records, global first-seen order
    pub status_order: Vec<String>,
    /// Monitor rows, sorted NO_DELIVERED first, then longest-stalled first
    pub monitor: Vec<RouteMonitorRow>,
}

/// Group records by route, preserving first-seen route order.
pub fn group_by_route(records: &[StatusRecord]) -> Vec<(RouteId, Vec<&StatusRecord>)> {
    let mut groups: Vec<(RouteId, Vec<&StatusRecord>)> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|(route, _)| *route == record.route) {
            Some((_, members)) => members.push(record),
            None => groups.push((record.route.clone(), vec![record])),
        }
    }
    groups
}

/// Run the full aggregation against a frozen run timestamp.
pub fn aggregate(records: &[StatusRecord], generated_at: DateTime<Tz>) -> Aggregation {
    let groups = group_by_route(records);

    let mut status_order: Vec<String> = Vec::new();
    for record in records {
        if !status_order.iter().any(|s| s == &record.status) {
            status_order.push(record.status.clone());
        }
    }

    let summaries: Vec<RouteSummary> = groups
        .iter()
        .map(|(route, members)| summarize_route(route, members))
        .collect();

    let mut monitor: Vec<RouteMonitorRow> = groups
        .iter()
        .map(|(route, members)| monitor_route(route, members, generated_at))
        .collect();
    sort_monitor_rows(&mut monitor);

    debug!(
        routes = summaries.len(),
        statuses = status_order.len(),
        "aggregated status records"
    );

    Aggregation {
        summaries,
        status_order,
        monitor,
    }
}

fn summarize_route(route: &str, members: &[&StatusRecord]) -> RouteSummary {
    let mut status_counts: Vec<(String, u64)> = Vec::new();
    for record in members {
        match status_counts.iter_mut().find(|(s, _)| *s == record.status) {
            Some((_, n)) => *n += 1,
            None => status_counts.push((record.status.clone(), 1)),
        }
    }
    RouteSummary {
        route: route.to_string(),
        total: members.len() as u64,
        status_counts,
    }
}

fn monitor_route(
    route: &str,
    members: &[&StatusRecord],
    generated_at: DateTime<Tz>,
) -> RouteMonitorRow {
    let total = members.len() as u64;
    let delivered = members
        .iter()
        .filter(|r| status::is_delivered(&r.status))
        .count() as u64;
    let failed = members
        .iter()
        .filter(|r| status::is_failed(&r.status))
        .count() as u64;
    let remaining = total - delivered - failed;
    let completion_rate = if total > 0 {
        delivered as f64 / total as f64
    } else {
        0.0
    };

    // First non-empty value wins, matching row order of the input
    let driver_name = members.iter().find_map(|r| r.driver_name.clone());
    let flee_name = members.iter().find_map(|r| r.flee_name.clone());

    let delivered_times: Vec<DateTime<Tz>> = members
        .iter()
        .filter(|r| status::is_delivered(&r.status))
        .map(|r| r.status_ts)
        .collect();
    let first_delivery = delivered_times.iter().min().copied();
    let latest_delivery = delivered_times.iter().max().copied();

    let minutes_since_last = latest_delivery
        .map(|last| (generated_at - last).num_seconds() as f64 / 60.0);
    let hours_since_first = first_delivery
        .map(|first| (generated_at - first).num_seconds() as f64 / 3600.0);
    let deliveries_per_hour = hours_since_first.and_then(|h| {
        if h > 0.0 {
            Some(delivered as f64 / h)
        } else {
            None
        }
    });

    let status_flag = if delivered_times.is_empty() {
        StatusFlag::NoDelivered
    } else {
        StatusFlag::HasDelivered
    };
    let alert_bucket = AlertBucket::classify(minutes_since_last);

    RouteMonitorRow {
        route: route.to_string(),
        driver_name,
        flee_name,
        total,
        delivered,
        failed,
        remaining,
        completion_rate,
        first_delivery,
        latest_delivery,
        hours_since_first,
        deliveries_per_hour,
        minutes_since_last,
        status_flag,
        alert_bucket,
    }
}

/// NO_DELIVERED routes first, then longest-stalled first, ties by route
/// name so the sheet order is deterministic.
fn sort_monitor_rows(rows: &mut [RouteMonitorRow]) {
    rows.sort_by(|a, b| {
        let rank = |r: &RouteMonitorRow| match r.status_flag {
            StatusFlag::NoDelivered => 0u8,
            StatusFlag::HasDelivered => 1,
        };
        rank(a)
            .cmp(&rank(b))
            .then_with(|| {
                b.minutes_since_last
                    .partial_cmp(&a.minutes_since_last)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.route.cmp(&b.route))
    });
}
