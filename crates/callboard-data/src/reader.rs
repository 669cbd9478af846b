//! Upload parsing for Callboard.
//!
//! Converts a user-supplied tabular file (CSV/`.txt` via the `csv` crate,
//! `.xlsx`/`.xls`/`.xlsm`/`.ods` via `calamine`) into [`Record`]s for the
//! merge store. Only the `Date` column is required; a row with an
//! unparseable date fails the whole upload, while every other column is
//! optional and degrades to `None` per cell.

use std::io::{Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Reader as _, Sheets};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use callboard_core::error::{DashboardError, Result};
use callboard_core::models::Record;

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse a tabular file into records, dispatching on the file extension.
///
/// Fails with [`DashboardError::UnsupportedFormat`] for anything that is not
/// one of the upload formats accepted by the dashboard.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("csv") | Some("txt") => load_csv(path),
        Some("xlsx") | Some("xls") | Some("xlsm") | Some("ods") => load_spreadsheet(path),
        _ => Err(DashboardError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Parse upload content arriving from an in-memory reader rather than a file
/// on disk. `name` supplies the extension for format dispatch and is used in
/// error reporting.
pub fn load_records_from_reader<R: Read + Seek + Clone>(reader: R, name: &Path) -> Result<Vec<Record>> {
    let ext = name
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("csv") | Some("txt") => read_csv(reader, name),
        Some("xlsx") | Some("xls") | Some("xlsm") | Some("ods") => {
            let workbook = open_workbook_auto_from_rs(reader)
                .map_err(|e| DashboardError::Spreadsheet(e.to_string()))?;
            read_workbook(workbook, name)
        }
        _ => Err(DashboardError::UnsupportedFormat(name.to_path_buf())),
    }
}

// ── Column mapping ────────────────────────────────────────────────────────────

/// Source-schema column positions resolved from the header row.
///
/// Header matching is whitespace-trimmed and case-insensitive; only `Date`
/// is mandatory. Unknown extra columns are ignored.
struct ColumnIndex {
    date: usize,
    call_length: Option<usize>,
    quoted_wait_time: Option<usize>,
    specialist_id: Option<usize>,
    repeat_flag: Option<usize>,
    tier: Option<usize>,
    intent: Option<usize>,
    age: Option<usize>,
    gender: Option<usize>,
    msg_within_12h: Option<usize>,
    shift: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &[String], path: &Path) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let date = find("Date").ok_or_else(|| DashboardError::MissingDateColumn(path.to_path_buf()))?;

        Ok(Self {
            date,
            call_length: find("Call Length"),
            quoted_wait_time: find("Quoted_Wait_Time"),
            specialist_id: find("Specialist_ID"),
            repeat_flag: find("Initial Repeat Flag"),
            tier: find("SM Tier"),
            intent: find("Intent"),
            age: find("Age"),
            gender: find("Gender"),
            msg_within_12h: find("Msg Within 12 Hrs"),
            shift: find("Shift"),
        })
    }
}

// ── CSV loading ───────────────────────────────────────────────────────────────

fn load_csv(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv(file, path)
}

fn read_csv<R: Read>(reader: R, path: &Path) -> Result<Vec<Record>> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let columns = ColumnIndex::resolve(&headers, path)?;

    let mut records = Vec::new();
    // Row numbers in errors are 1-based and count the header row.
    for (i, row) in csv_reader.records().enumerate() {
        let row = row?;
        let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        records.push(map_row(&cells, &columns, i + 2)?);
    }

    debug!("Parsed {} records from {}", records.len(), path.display());
    Ok(records)
}

// ── Spreadsheet loading ───────────────────────────────────────────────────────

fn load_spreadsheet(path: &Path) -> Result<Vec<Record>> {
    let workbook =
        open_workbook_auto(path).map_err(|e| DashboardError::Spreadsheet(e.to_string()))?;
    read_workbook(workbook, path)
}

fn read_workbook<RS: Read + Seek>(mut workbook: Sheets<RS>, path: &Path) -> Result<Vec<Record>> {
    // The dashboard reads the first worksheet only, header row first.
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| DashboardError::Spreadsheet("workbook has no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| DashboardError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(cell_to_string).collect(),
        None => return Err(DashboardError::MissingDateColumn(path.to_path_buf())),
    };
    let columns = ColumnIndex::resolve(&headers, path)?;

    let mut records = Vec::new();
    for (i, row) in rows.enumerate() {
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
        // Trailing blank rows are common in spreadsheets; skip them.
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }
        records.push(map_row(&cells, &columns, i + 2)?);
    }

    debug!(
        "Parsed {} records from sheet \"{}\" of {}",
        records.len(),
        sheet_name,
        path.display()
    );
    Ok(records)
}

/// Normalise a spreadsheet cell to the string form the row mapper expects.
///
/// Date/time cells are rendered as ISO dates so they flow through the same
/// parsing path as CSV text.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(n) => n.to_string(),
        Data::Float(f) => format!("{}", f),
        Data::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        Data::Error(_) => String::new(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.date().format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

// ── Row mapping ───────────────────────────────────────────────────────────────

/// Build a [`Record`] from one row of string cells.
///
/// Strict on `Date` (the whole upload fails), lenient on everything else
/// (bad cells become `None` with a debug log).
fn map_row(cells: &[String], columns: &ColumnIndex, row: usize) -> Result<Record> {
    let raw_date = cell(cells, Some(columns.date)).unwrap_or_default();
    let date = parse_date(&raw_date).ok_or_else(|| DashboardError::DateParse {
        value: raw_date.clone(),
        row,
    })?;

    Ok(Record {
        date,
        call_length_minutes: parse_number(cell(cells, columns.call_length), row, "Call Length"),
        quoted_wait_time: parse_number(cell(cells, columns.quoted_wait_time), row, "Quoted_Wait_Time"),
        specialist_id: cell(cells, columns.specialist_id),
        is_repeat: parse_flag(cell(cells, columns.repeat_flag), row),
        tier: cell(cells, columns.tier),
        intent: cell(cells, columns.intent),
        age: parse_age(cell(cells, columns.age), row),
        gender: cell(cells, columns.gender),
        msg_within_12h: cell(cells, columns.msg_within_12h),
        shift: cell(cells, columns.shift),
    })
}

/// Trimmed cell content at an optional column position; `None` when the
/// column is absent or the cell is empty.
fn cell(cells: &[String], index: Option<usize>) -> Option<String> {
    let value = cells.get(index?)?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse a calendar date, accepting the common forms call-center exports
/// use. A trailing time component is ignored.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Strip any time component ("2023-01-05 14:30:00", "2023-01-05T14:30").
    let date_part = trimmed
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or(trimmed);

    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m/%d/%y"];
    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, format) {
            return Some(date);
        }
    }

    // Full datetime strings whose date part alone did not match.
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

/// Parse a finite non-negative numeric cell; anything else becomes `None`.
fn parse_number(value: Option<String>, row: usize, column: &str) -> Option<f64> {
    let raw = value?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
        Ok(v) if v.is_finite() => {
            warn!("Negative {} value {} at row {}; dropping cell", column, v, row);
            None
        }
        // "nan"/"inf" parse as f64 but carry no usable magnitude.
        _ => {
            debug!("Unparseable {} value \"{}\" at row {}", column, raw, row);
            None
        }
    }
}

/// Parse the caller age; fractional values from spreadsheet exports are
/// truncated to whole years.
fn parse_age(value: Option<String>, row: usize) -> Option<u32> {
    let raw = value?;
    match raw.parse::<f64>() {
        Ok(v) if v >= 0.0 => Some(v as u32),
        _ => {
            debug!("Unparseable Age value \"{}\" at row {}", raw, row);
            None
        }
    }
}

/// Parse the 0/1 repeat flag, tolerating boolean-ish text. A missing or
/// unrecognised cell counts as non-repeat.
fn parse_flag(value: Option<String>, row: usize) -> bool {
    let Some(raw) = value else {
        return false;
    };
    if let Ok(v) = raw.parse::<f64>() {
        return v != 0.0;
    }
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" => true,
        "false" | "no" | "n" => false,
        other => {
            debug!("Unrecognised repeat flag \"{}\" at row {}", other, row);
            false
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
