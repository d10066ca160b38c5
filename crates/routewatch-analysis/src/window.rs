//! Window Evaluators.
//!
//! A window rule asks: of a route's records, what share were delivered at
//! or after a fixed Eastern clock cutoff? Routes whose ratio falls below
//! the rule's threshold are flagged as failing.
//!
//! The cutoff instant needs a calendar date. Inputs can span days, so the
//! reference date is the latest Eastern date present among the route's own
//! records; each route is judged against its last active day.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use routewatch_core::config::{WindowRule, EASTERN};
use routewatch_core::{status, StatusRecord, WindowCheckResult};
use tracing::debug;

use crate::aggregate::group_by_route;

/// Evaluate one window rule over the full record set, one result per route.
///
/// Route order follows first-seen order in the input. Routes with zero
/// records produce no result at all (the ratio would be undefined).
pub fn evaluate_window(rule: &WindowRule, records: &[StatusRecord]) -> Vec<WindowCheckResult> {
    let mut results = Vec::new();

    for (route, members) in group_by_route(records) {
        if members.is_empty() {
            continue;
        }

        let reference_date = members
            .iter()
            .map(|r| r.status_ts.with_timezone(&EASTERN).date_naive())
            .max()
            .unwrap_or_default();
        let cutoff = cutoff_instant(reference_date, rule.cutoff);

        let total = members.len() as u64;
        let delivered_after_cutoff = members
            .iter()
            .filter(|r| status::is_delivered(&r.status) && r.status_ts >= cutoff)
            .count() as u64;
        let ratio = delivered_after_cutoff as f64 / total as f64;
        let passed = ratio >= rule.threshold;

        results.push(WindowCheckResult {
            route,
            delivered_after_cutoff,
            total,
            ratio,
            passed,
        });
    }

    debug!(
        rule = rule.label,
        routes = results.len(),
        failing = results.iter().filter(|r| !r.passed).count(),
        "evaluated window rule"
    );
    results
}

/// The rule's cutoff on a given Eastern calendar date.
fn cutoff_instant(date: NaiveDate, cutoff: NaiveTime) -> DateTime<Tz> {
    match EASTERN.from_local_datetime(&date.and_time(cutoff)) {
        LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => t,
        // US Eastern transitions happen at 02:00; afternoon cutoffs never
        // land in a gap. Interpreting as UTC keeps the evaluator total.
        LocalResult::None => EASTERN.from_utc_datetime(&date.and_time(cutoff)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use routewatch_core::config::window_rules;

    fn record(route: &str, status: &str, d: u32, hh: u32, mm: u32) -> StatusRecord {
        record_sec(route, status, d, hh, mm, 0)
    }

    fn record_sec(route: &str, status: &str, d: u32, hh: u32, mm: u32, ss: u32) -> StatusRecord {
        StatusRecord {
            route: route.into(),
            status: status.into(),
            status_ts: EASTERN.with_ymd_and_hms(2024, 7, d, hh, mm, ss).unwrap(),
            flee_name: None,
            driver_name: None,
            source_row: 2,
        }
    }

    fn three_pm() -> WindowRule {
        window_rules()[0]
    }

    fn six_pm() -> WindowRule {
        window_rules()[1]
    }

    #[test]
    fn quarter_delivered_after_three_fails_the_half_threshold() {
        // 4 records, 1 delivered before the cutoff, 1 after, 2 other statuses
        let records = vec![
            record("R1", "Delivered", 1, 14, 0),
            record("R1", "Delivered", 1, 15, 30),
            record("R1", "In Transit", 1, 15, 45),
            record("R1", "FAILED", 1, 16, 0),
        ];
        let results = evaluate_window(&three_pm(), &records);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].delivered_after_cutoff, 1);
        assert_eq!(results[0].total, 4);
        assert_eq!(results[0].ratio, 0.25);
        assert!(!results[0].passed);
    }

    #[test]
    fn record_exactly_at_the_cutoff_counts() {
        let records = vec![
            record_sec("R1", "Delivered", 1, 15, 0, 0),
            record("R1", "Delivered", 1, 16, 0),
        ];
        let results = evaluate_window(&three_pm(), &records);
        assert_eq!(results[0].delivered_after_cutoff, 2);
        assert_eq!(results[0].ratio, 1.0);
        assert!(results[0].passed);
    }

    #[test]
    fn ratio_exactly_at_threshold_passes() {
        // 2 of 4 delivered after 15:00 = 0.50, not below the threshold
        let records = vec![
            record("R1", "Delivered", 1, 15, 10),
            record("R1", "Delivered", 1, 15, 20),
            record("R1", "In Transit", 1, 15, 30),
            record("R1", "In Transit", 1, 15, 40),
        ];
        let results = evaluate_window(&three_pm(), &records);
        assert_eq!(results[0].ratio, 0.50);
        assert!(results[0].passed);
    }

    #[test]
    fn six_pm_rule_uses_the_higher_threshold() {
        // 3 of 4 delivered after 18:00 = 0.75 < 0.80
        let records = vec![
            record("R1", "Delivered", 1, 18, 5),
            record("R1", "Delivered", 1, 18, 10),
            record("R1", "Delivered", 1, 18, 15),
            record("R1", "In Transit", 1, 19, 0),
        ];
        let results = evaluate_window(&six_pm(), &records);
        assert_eq!(results[0].ratio, 0.75);
        assert!(!results[0].passed);
    }

    #[test]
    fn delivered_before_the_cutoff_never_counts() {
        let records = vec![
            record("R1", "Delivered", 1, 9, 0),
            record("R1", "Delivered", 1, 14, 59),
        ];
        let results = evaluate_window(&three_pm(), &records);
        assert_eq!(results[0].delivered_after_cutoff, 0);
        assert_eq!(results[0].ratio, 0.0);
        assert!(!results[0].passed);
    }

    #[test]
    fn reference_date_is_the_latest_per_route() {
        // Day-1 late delivery would pass against day 1, but the route was
        // active on day 2, so the cutoff moves to day 2 at 15:00.
        let records = vec![
            record("R1", "Delivered", 1, 16, 0),
            record("R1", "In Transit", 2, 9, 0),
        ];
        let results = evaluate_window(&three_pm(), &records);
        assert_eq!(results[0].delivered_after_cutoff, 0);
        assert!(!results[0].passed);
    }

    #[test]
    fn routes_are_evaluated_independently() {
        let records = vec![
            record("R1", "Delivered", 1, 15, 30),
            record("R2", "Delivered", 1, 14, 0),
            record("R2", "In Transit", 1, 15, 30),
        ];
        let results = evaluate_window(&three_pm(), &records);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].route, "R1");
        assert!(results[0].passed);
        assert_eq!(results[1].route, "R2");
        assert!(!results[1].passed);
    }

    #[test]
    fn empty_input_produces_no_results() {
        let results = evaluate_window(&three_pm(), &[]);
        assert!(results.is_empty());
    }
}
