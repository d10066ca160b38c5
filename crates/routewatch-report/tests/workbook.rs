//! Workbook-level tests: sheet layout and byte determinism.
//!
//! The rendered bytes are read back with a separate reader crate to check
//! the sheet set and a few key cells, and rendered twice to check the
//! golden-file property (identical input + frozen timestamp = identical
//! bytes).

use chrono::TimeZone;
use routewatch_core::config::{window_rules, EASTERN};
use routewatch_core::status::{AlertBucket, StatusFlag};
use routewatch_core::{
    ExceptionEntry, ExceptionReason, RouteMonitorRow, RouteSummary, RunMeta, WindowCheckResult,
};
use routewatch_report::{ExcelReport, ReportInput};

fn fixture_monitor() -> Vec<RouteMonitorRow> {
    vec![
        RouteMonitorRow {
            route: "R7".into(),
            driver_name: None,
            flee_name: None,
            total: 2,
            delivered: 0,
            failed: 0,
            remaining: 2,
            completion_rate: 0.0,
            first_delivery: None,
            latest_delivery: None,
            hours_since_first: None,
            deliveries_per_hour: None,
            minutes_since_last: None,
            status_flag: StatusFlag::NoDelivered,
            alert_bucket: AlertBucket::NoDelivered,
        },
        RouteMonitorRow {
            route: "R1".into(),
            driver_name: Some("J. Ortiz".into()),
            flee_name: Some("Fleet 7".into()),
            total: 4,
            delivered: 2,
            failed: 1,
            remaining: 1,
            completion_rate: 0.5,
            first_delivery: Some(EASTERN.with_ymd_and_hms(2024, 7, 1, 10, 0, 0).unwrap()),
            latest_delivery: Some(EASTERN.with_ymd_and_hms(2024, 7, 1, 16, 0, 0).unwrap()),
            hours_since_first: Some(9.0),
            deliveries_per_hour: Some(0.22),
            minutes_since_last: Some(180.0),
            status_flag: StatusFlag::HasDelivered,
            alert_bucket: AlertBucket::Red,
        },
    ]
}

fn fixture_meta() -> RunMeta {
    RunMeta {
        generated_at: EASTERN.with_ymd_and_hms(2024, 7, 1, 19, 0, 0).unwrap(),
        source_file: "uploads/routes_0701.xlsx".into(),
        total_rows: 7,
        record_count: 6,
        exception_count: 1,
        route_count: 2,
    }
}

fn render_fixture() -> Vec<u8> {
    let monitor = fixture_monitor();
    let summaries = vec![
        RouteSummary {
            route: "R1".into(),
            total: 4,
            status_counts: vec![
                ("Delivered".into(), 2),
                ("In Transit".into(), 1),
                ("FAILED".into(), 1),
            ],
        },
        RouteSummary {
            route: "R7".into(),
            total: 2,
            status_counts: vec![("In Transit".into(), 2)],
        },
    ];
    let status_order: Vec<String> =
        vec!["Delivered".into(), "In Transit".into(), "FAILED".into()];
    let exceptions = vec![ExceptionEntry {
        source_row: 5,
        reason: ExceptionReason::BadTimestamp,
        route: "R1".into(),
        status: "Delivered".into(),
        raw_timestamp: "soon".into(),
    }];
    let [three_pm, six_pm] = window_rules();
    let windows = vec![
        (
            three_pm,
            vec![WindowCheckResult {
                route: "R1".into(),
                delivered_after_cutoff: 1,
                total: 4,
                ratio: 0.25,
                passed: false,
            }],
        ),
        (
            six_pm,
            vec![WindowCheckResult {
                route: "R1".into(),
                delivered_after_cutoff: 4,
                total: 4,
                ratio: 1.0,
                passed: true,
            }],
        ),
    ];
    let meta = fixture_meta();

    let input = ReportInput {
        monitor: &monitor,
        summaries: &summaries,
        status_order: &status_order,
        exceptions: &exceptions,
        windows: &windows,
        meta: &meta,
    };
    ExcelReport::new()
        .render_to_bytes(&input)
        .expect("render fixture workbook")
}

#[test]
fn renders_a_nonempty_xlsx() {
    let bytes = render_fixture();
    assert!(bytes.len() > 1000);
    // xlsx is a zip container
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn identical_input_and_timestamp_yield_identical_bytes() {
    let first = render_fixture();
    let second = render_fixture();
    assert_eq!(first, second);
}

#[test]
fn workbook_has_the_six_sheets_in_order() {
    let bytes = render_fixture();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("report.xlsx");
    std::fs::write(&path, &bytes).expect("write workbook");

    let book = umya_spreadsheet::reader::xlsx::read(&path).expect("read back workbook");
    let names: Vec<String> = book
        .get_sheet_collection()
        .iter()
        .map(|s| s.get_name().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "RouteMonitor",
            "Summary",
            "Exceptions",
            "3pm check",
            "6pm check",
            "Meta"
        ]
    );
}

#[test]
fn key_cells_round_trip() {
    let bytes = render_fixture();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("report.xlsx");
    std::fs::write(&path, &bytes).expect("write workbook");

    let book = umya_spreadsheet::reader::xlsx::read(&path).expect("read back workbook");

    let monitor = book.get_sheet_by_name("RouteMonitor").expect("monitor sheet");
    assert_eq!(monitor.get_value((1, 1)), "Route");
    // NO_DELIVERED route sorts first
    assert_eq!(monitor.get_value((1, 2)), "R7");
    assert_eq!(monitor.get_value((15, 2)), "NO_DELIVERED");
    assert_eq!(monitor.get_value((1, 3)), "R1");

    let summary = book.get_sheet_by_name("Summary").expect("summary sheet");
    assert_eq!(summary.get_value((1, 1)), "Route");
    assert_eq!(summary.get_value((3, 1)), "Delivered");

    let exceptions = book.get_sheet_by_name("Exceptions").expect("exceptions sheet");
    assert_eq!(exceptions.get_value((2, 2)), "BadTimestamp");

    let meta = book.get_sheet_by_name("Meta").expect("meta sheet");
    assert_eq!(meta.get_value((1, 2)), "SourceFile");
    assert_eq!(meta.get_value((2, 2)), "uploads/routes_0701.xlsx");
}
