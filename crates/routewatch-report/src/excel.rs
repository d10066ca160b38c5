//! Six-sheet status workbook writer.
//!
//! Sheet order is fixed: RouteMonitor, Summary, Exceptions, one sheet per
//! window rule (3pm check, 6pm check), Meta. Column order within each sheet
//! is fixed too, so identical inputs always produce identical workbooks.
//!
//! RouteMonitor rows are filled by the status→color mapping from
//! `routewatch_core::color`; window-check rows are filled red when the
//! route fails the rule. Headers use the dark-blue banner styling of the
//! operational reports, with a frozen header row and an autofilter.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use routewatch_core::color::{alert_color, DisplayColor};
use routewatch_core::config::WindowRule;
use routewatch_core::{
    ExceptionEntry, RenderError, RouteMonitorRow, RouteSummary, RunMeta, WindowCheckResult,
};
use rust_xlsxwriter::{DocProperties, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::info;

/// Header banner fill (dark blue, white bold text)
const HEADER_FILL: u32 = 0x1F4E79;

/// Everything the renderer needs, already derived upstream
#[derive(Clone, Debug)]
pub struct ReportInput<'a> {
    pub monitor: &'a [RouteMonitorRow],
    pub summaries: &'a [RouteSummary],
    /// Distinct status values, global first-seen order (Summary columns)
    pub status_order: &'a [String],
    pub exceptions: &'a [ExceptionEntry],
    /// One entry per window rule, in sheet order
    pub windows: &'a [(WindowRule, Vec<WindowCheckResult>)],
    pub meta: &'a RunMeta,
}

/// Excel status report renderer
#[derive(Clone, Debug)]
pub struct ExcelReport {
    /// Column width cap in characters
    pub width_cap: usize,
    /// Minimum column width in characters
    pub width_min: usize,
    /// Freeze the header row of each data sheet
    pub freeze_header: bool,
    /// Add an autofilter over each data sheet
    pub autofilter: bool,
}

impl Default for ExcelReport {
    fn default() -> Self {
        Self {
            width_cap: 45,
            width_min: 10,
            freeze_header: true,
            autofilter: true,
        }
    }
}

impl ExcelReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column width cap
    pub fn width_cap(mut self, cap: usize) -> Self {
        self.width_cap = cap;
        self
    }

    /// Leave header rows unfrozen
    pub fn no_freeze(mut self) -> Self {
        self.freeze_header = false;
        self
    }

    /// Skip the autofilter
    pub fn no_autofilter(mut self) -> Self {
        self.autofilter = false;
        self
    }

    /// Generate the workbook bytes.
    pub fn render_to_bytes(&self, input: &ReportInput) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();

        // Pin document creation to the run timestamp so identical inputs
        // yield identical bytes.
        let properties =
            DocProperties::new().set_creation_datetime(&input.meta.generated_at.with_timezone(&Utc));
        workbook.set_properties(&properties);

        let formats = ReportFormats::new();

        self.add_monitor_sheet(&mut workbook, input, &formats)?;
        self.add_summary_sheet(&mut workbook, input, &formats)?;
        self.add_exceptions_sheet(&mut workbook, input, &formats)?;
        for (rule, results) in input.windows {
            self.add_window_sheet(&mut workbook, rule, results, &formats)?;
        }
        self.add_meta_sheet(&mut workbook, input.meta, &formats)?;

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))?;
        info!(bytes = buffer.len(), "rendered status workbook");
        Ok(buffer)
    }

    // ========================================================================
    // RouteMonitor
    // ========================================================================

    fn add_monitor_sheet(
        &self,
        workbook: &mut Workbook,
        input: &ReportInput,
        formats: &ReportFormats,
    ) -> Result<(), RenderError> {
        let headers = [
            "Route",
            "DriverName",
            "FleeName",
            "Total",
            "Success(Delivered)",
            "Failed(*FAIL*)",
            "Remaining",
            "CompletionRate",
            "1stDeliveryTime",
            "HoursSinceFirstDelivery",
            "DeliveriesPerHour",
            "LatestDeliveredTime",
            "MinutesSinceLast",
            "StatusFlag",
            "AlertBucket",
        ];
        let sheet = workbook.add_worksheet();
        sheet
            .set_name("RouteMonitor")
            .map_err(|e| RenderError::Format(e.to_string()))?;

        let mut fit = ColumnFit::new(&headers);
        write_header_row(sheet, &headers, &formats.header)?;

        for (i, row) in input.monitor.iter().enumerate() {
            let r = i as u32 + 1;
            let fmts = formats.for_color(alert_color(row.alert_bucket));

            let first = ts_text(row.first_delivery);
            let latest = ts_text(row.latest_delivery);

            write_text(sheet, r, 0, &row.route, &fmts.text)?;
            write_text(sheet, r, 1, row.driver_name.as_deref().unwrap_or(""), &fmts.text)?;
            write_text(sheet, r, 2, row.flee_name.as_deref().unwrap_or(""), &fmts.text)?;
            write_number(sheet, r, 3, row.total as f64, &fmts.integer)?;
            write_number(sheet, r, 4, row.delivered as f64, &fmts.integer)?;
            write_number(sheet, r, 5, row.failed as f64, &fmts.integer)?;
            write_number(sheet, r, 6, row.remaining as f64, &fmts.integer)?;
            write_number(sheet, r, 7, row.completion_rate, &fmts.percent)?;
            write_text(sheet, r, 8, &first, &fmts.text)?;
            write_opt_number(sheet, r, 9, row.hours_since_first, &fmts.decimal, &fmts.text)?;
            write_opt_number(sheet, r, 10, row.deliveries_per_hour, &fmts.decimal, &fmts.text)?;
            write_text(sheet, r, 11, &latest, &fmts.text)?;
            write_opt_number(sheet, r, 12, row.minutes_since_last, &fmts.number, &fmts.text)?;
            write_text(sheet, r, 13, row.status_flag.as_str(), &fmts.text)?;
            write_text(sheet, r, 14, row.alert_bucket.as_str(), &fmts.text)?;

            fit.note(0, &row.route);
            fit.note(1, row.driver_name.as_deref().unwrap_or(""));
            fit.note(2, row.flee_name.as_deref().unwrap_or(""));
            fit.note(8, &first);
            fit.note(11, &latest);
        }

        self.finish_sheet(sheet, &fit, input.monitor.len(), headers.len());
        Ok(())
    }

    // ========================================================================
    // Summary
    // ========================================================================

    fn add_summary_sheet(
        &self,
        workbook: &mut Workbook,
        input: &ReportInput,
        formats: &ReportFormats,
    ) -> Result<(), RenderError> {
        let mut headers: Vec<String> = vec!["Route".into(), "Total".into()];
        headers.extend(input.status_order.iter().cloned());

        let sheet = workbook.add_worksheet();
        sheet
            .set_name("Summary")
            .map_err(|e| RenderError::Format(e.to_string()))?;

        let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
        let mut fit = ColumnFit::new(&header_refs);
        write_header_row(sheet, &header_refs, &formats.header)?;

        for (i, summary) in input.summaries.iter().enumerate() {
            let r = i as u32 + 1;
            write_text(sheet, r, 0, &summary.route, &formats.plain.text)?;
            write_number(sheet, r, 1, summary.total as f64, &formats.plain.integer)?;
            for (c, status) in input.status_order.iter().enumerate() {
                write_number(
                    sheet,
                    r,
                    c as u16 + 2,
                    summary.count_for(status) as f64,
                    &formats.plain.integer,
                )?;
            }
            fit.note(0, &summary.route);
        }

        self.finish_sheet(sheet, &fit, input.summaries.len(), headers.len());
        Ok(())
    }

    // ========================================================================
    // Exceptions
    // ========================================================================

    fn add_exceptions_sheet(
        &self,
        workbook: &mut Workbook,
        input: &ReportInput,
        formats: &ReportFormats,
    ) -> Result<(), RenderError> {
        let headers = ["Row", "Reason", "Route", "Status", "RawTimestamp"];
        let sheet = workbook.add_worksheet();
        sheet
            .set_name("Exceptions")
            .map_err(|e| RenderError::Format(e.to_string()))?;

        let mut fit = ColumnFit::new(&headers);
        write_header_row(sheet, &headers, &formats.header)?;

        for (i, entry) in input.exceptions.iter().enumerate() {
            let r = i as u32 + 1;
            write_number(sheet, r, 0, f64::from(entry.source_row), &formats.plain.integer)?;
            write_text(sheet, r, 1, entry.reason.as_str(), &formats.plain.text)?;
            write_text(sheet, r, 2, &entry.route, &formats.plain.text)?;
            write_text(sheet, r, 3, &entry.status, &formats.plain.text)?;
            write_text(sheet, r, 4, &entry.raw_timestamp, &formats.plain.text)?;

            fit.note(2, &entry.route);
            fit.note(3, &entry.status);
            fit.note(4, &entry.raw_timestamp);
        }

        self.finish_sheet(sheet, &fit, input.exceptions.len(), headers.len());
        Ok(())
    }

    // ========================================================================
    // Window Checks
    // ========================================================================

    fn add_window_sheet(
        &self,
        workbook: &mut Workbook,
        rule: &WindowRule,
        results: &[WindowCheckResult],
        formats: &ReportFormats,
    ) -> Result<(), RenderError> {
        let headers = [
            "Route",
            "DeliveredAfterCutoff",
            "Total",
            "Ratio",
            "Threshold",
            "Result",
        ];
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(rule.sheet_name)
            .map_err(|e| RenderError::Format(e.to_string()))?;

        let mut fit = ColumnFit::new(&headers);
        write_header_row(sheet, &headers, &formats.header)?;

        for (i, result) in results.iter().enumerate() {
            let r = i as u32 + 1;
            let fmts = if result.passed {
                &formats.plain
            } else {
                &formats.red
            };
            let verdict = if result.passed { "PASS" } else { "FAIL" };

            write_text(sheet, r, 0, &result.route, &fmts.text)?;
            write_number(sheet, r, 1, result.delivered_after_cutoff as f64, &fmts.integer)?;
            write_number(sheet, r, 2, result.total as f64, &fmts.integer)?;
            write_number(sheet, r, 3, result.ratio, &fmts.percent)?;
            write_number(sheet, r, 4, rule.threshold, &fmts.percent)?;
            write_text(sheet, r, 5, verdict, &fmts.text)?;

            fit.note(0, &result.route);
        }

        self.finish_sheet(sheet, &fit, results.len(), headers.len());
        Ok(())
    }

    // ========================================================================
    // Meta
    // ========================================================================

    fn add_meta_sheet(
        &self,
        workbook: &mut Workbook,
        meta: &RunMeta,
        formats: &ReportFormats,
    ) -> Result<(), RenderError> {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name("Meta")
            .map_err(|e| RenderError::Format(e.to_string()))?;

        let generated = meta
            .generated_at
            .format("%Y-%m-%d %H:%M:%S %Z")
            .to_string();

        write_text(sheet, 0, 0, "GeneratedAt", &formats.header)?;
        write_text(sheet, 0, 1, &generated, &formats.plain.text)?;
        write_text(sheet, 1, 0, "SourceFile", &formats.header)?;
        write_text(sheet, 1, 1, &meta.source_file, &formats.plain.text)?;
        write_text(sheet, 2, 0, "TotalRows", &formats.header)?;
        write_number(sheet, 2, 1, meta.total_rows as f64, &formats.plain.integer)?;
        write_text(sheet, 3, 0, "StatusRecords", &formats.header)?;
        write_number(sheet, 3, 1, meta.record_count as f64, &formats.plain.integer)?;
        write_text(sheet, 4, 0, "Exceptions", &formats.header)?;
        write_number(sheet, 4, 1, meta.exception_count as f64, &formats.plain.integer)?;
        write_text(sheet, 5, 0, "Routes", &formats.header)?;
        write_number(sheet, 5, 1, meta.route_count as f64, &formats.plain.integer)?;

        sheet.set_column_width(0, 16).ok();
        sheet
            .set_column_width(1, self.width_cap.min(generated.len().max(meta.source_file.len()) + 2) as f64)
            .ok();
        Ok(())
    }

    /// Shared tail for the data sheets: widths, freeze pane, autofilter.
    fn finish_sheet(&self, sheet: &mut Worksheet, fit: &ColumnFit, rows: usize, cols: usize) {
        fit.apply(sheet, self.width_min, self.width_cap);
        if self.freeze_header {
            sheet.set_freeze_panes(1, 0).ok();
        }
        if self.autofilter {
            sheet
                .autofilter(0, 0, rows as u32, cols.saturating_sub(1) as u16)
                .ok();
        }
    }
}

// ============================================================================
// Formats
// ============================================================================

/// One family of cell formats, optionally carrying a row fill
struct CellFormats {
    text: Format,
    integer: Format,
    /// One decimal place ("0.0"), for minutes
    number: Format,
    /// Two decimal places ("0.00"), for hours and pace
    decimal: Format,
    /// "0.00%" for completion ratios
    percent: Format,
}

impl CellFormats {
    fn new(fill: Option<u32>) -> Self {
        let with_fill = |format: Format| match fill {
            Some(color) => format.set_background_color(color),
            None => format,
        };
        Self {
            text: with_fill(Format::new().set_border(FormatBorder::Thin)),
            integer: with_fill(Format::new().set_num_format("#,##0").set_border(FormatBorder::Thin)),
            number: with_fill(Format::new().set_num_format("0.0").set_border(FormatBorder::Thin)),
            decimal: with_fill(Format::new().set_num_format("0.00").set_border(FormatBorder::Thin)),
            percent: with_fill(Format::new().set_num_format("0.00%").set_border(FormatBorder::Thin)),
        }
    }
}

/// Reusable formats for the whole workbook
struct ReportFormats {
    header: Format,
    plain: CellFormats,
    yellow: CellFormats,
    red: CellFormats,
    purple: CellFormats,
}

impl ReportFormats {
    fn new() -> Self {
        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_background_color(HEADER_FILL)
            .set_font_color(0xFFFFFF)
            .set_border(FormatBorder::Thin);

        Self {
            header,
            plain: CellFormats::new(None),
            yellow: CellFormats::new(Some(DisplayColor::Yellow.rgb())),
            red: CellFormats::new(Some(DisplayColor::Red.rgb())),
            purple: CellFormats::new(Some(DisplayColor::Purple.rgb())),
        }
    }

    fn for_color(&self, color: Option<DisplayColor>) -> &CellFormats {
        match color {
            None => &self.plain,
            Some(DisplayColor::Yellow) => &self.yellow,
            Some(DisplayColor::Red) => &self.red,
            Some(DisplayColor::Purple) => &self.purple,
        }
    }
}

// ============================================================================
// Write Helpers
// ============================================================================

fn write_header_row(
    sheet: &mut Worksheet,
    headers: &[&str],
    format: &Format,
) -> Result<(), RenderError> {
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_with_format(0, col as u16, *header, format)
            .map_err(|e| RenderError::Format(e.to_string()))?;
    }
    Ok(())
}

fn write_text(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &str,
    format: &Format,
) -> Result<(), RenderError> {
    sheet
        .write_with_format(row, col, value, format)
        .map_err(|e| RenderError::Format(e.to_string()))?;
    Ok(())
}

fn write_number(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: f64,
    format: &Format,
) -> Result<(), RenderError> {
    sheet
        .write_with_format(row, col, value, format)
        .map_err(|e| RenderError::Format(e.to_string()))?;
    Ok(())
}

/// Absent metrics render as an empty cell, not a zero
fn write_opt_number(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<f64>,
    format: &Format,
    empty_format: &Format,
) -> Result<(), RenderError> {
    match value {
        Some(v) => write_number(sheet, row, col, v, format),
        None => write_text(sheet, row, col, "", empty_format),
    }
}

fn ts_text(ts: Option<DateTime<Tz>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

// ============================================================================
// Column Sizing
// ============================================================================

/// Tracks the widest content per column for content-sized widths
struct ColumnFit {
    widths: Vec<usize>,
}

impl ColumnFit {
    fn new(headers: &[&str]) -> Self {
        Self {
            widths: headers.iter().map(|h| h.len()).collect(),
        }
    }

    fn note(&mut self, col: usize, text: &str) {
        if let Some(w) = self.widths.get_mut(col) {
            *w = (*w).max(text.chars().count());
        }
    }

    fn apply(&self, sheet: &mut Worksheet, min: usize, cap: usize) {
        for (col, width) in self.widths.iter().enumerate() {
            let fitted = ((*width).max(min) + 2).min(cap);
            sheet.set_column_width(col as u16, fitted as f64).ok();
        }
    }
}
