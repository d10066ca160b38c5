//! End-to-end tests for the routewatch binary: build a small fixture
//! workbook, run the commands, and inspect the results.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use rust_xlsxwriter::Workbook;

fn routewatch() -> Command {
    Command::new(env!("CARGO_BIN_EXE_routewatch"))
}

fn run(args: &[&str]) -> Output {
    routewatch()
        .args(args)
        .output()
        .expect("failed to execute routewatch")
}

/// Fixture with the operational layout: Route in B, Status in J,
/// timestamp in L, plus keyword-matched driver and fleet columns.
fn write_fixture(path: &Path) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    let headers = [
        "Stop", "Route", "Depot", "Zone", "Window", "Notes", "Vehicle", "Shift", "Scan",
        "Status", "Attempt", "Status Time", "Driver Name", "Flee ID",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write(0, col as u16, *header).unwrap();
    }

    let rows = [
        ("R1", "Delivered", "2024-07-01 14:00:00", "J. Ortiz", "Fleet 7"),
        ("R1", "Delivered", "2024-07-01 15:30:00", "J. Ortiz", "Fleet 7"),
        ("R1", "In Transit", "2024-07-01 15:45:00", "J. Ortiz", "Fleet 7"),
        ("R2", "FAILED", "2024-07-01 16:00:00", "M. Chen", "Fleet 2"),
        ("", "Delivered", "2024-07-01 16:10:00", "", ""),
    ];
    for (i, (route, status, ts, driver, fleet)) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write(r, 1, *route).unwrap();
        sheet.write(r, 9, *status).unwrap();
        sheet.write(r, 11, *ts).unwrap();
        sheet.write(r, 12, *driver).unwrap();
        sheet.write(r, 13, *fleet).unwrap();
    }

    workbook.save(path).unwrap();
}

/// Fixture too narrow for the fixed column layout.
fn write_narrow_fixture(path: &Path) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in ["Stop", "Route", "Status"].iter().enumerate() {
        sheet.write(0, col as u16, *header).unwrap();
    }
    sheet.write(1, 1, "R1").unwrap();
    workbook.save(path).unwrap();
}

#[test]
fn transform_writes_the_report_workbook() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("routes.xlsx");
    let output = dir.path().join("report.xlsx");
    write_fixture(&input);

    let result = run(&[
        "transform",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ]);
    assert!(
        result.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("4 records"), "stdout: {stdout}");
    assert!(stdout.contains("1 exceptions"), "stdout: {stdout}");
    assert!(stdout.contains("2 routes"), "stdout: {stdout}");

    let bytes = std::fs::read(&output).expect("report file");
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn transform_defaults_the_output_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("routes.xlsx");
    write_fixture(&input);

    let result = run(&["transform", input.to_str().unwrap()]);
    assert!(result.status.success());
    assert!(PathBuf::from(dir.path().join("routes_report.xlsx")).exists());
}

#[test]
fn check_reports_counts_as_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("routes.xlsx");
    write_fixture(&input);

    let result = run(&["check", input.to_str().unwrap(), "--json"]);
    assert!(result.status.success());

    let stdout = String::from_utf8_lossy(&result.stdout);
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(report["total_rows"], 5);
    assert_eq!(report["records"], 4);
    assert_eq!(report["exceptions"], 1);
    assert_eq!(report["missing_route"], 1);
    assert_eq!(report["routes"], 2);
    assert_eq!(report["driver_column"], 13);
    assert_eq!(report["flee_column"], 14);
}

#[test]
fn narrow_sheet_fails_the_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("narrow.xlsx");
    write_narrow_fixture(&input);

    let result = run(&["transform", input.to_str().unwrap()]);
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("outside the sheet width"), "stderr: {stderr}");
}
