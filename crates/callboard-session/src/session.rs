//! Per-session ownership of the cumulative dataset.
//!
//! One [`DashboardSession`] exists per user session; it is the only place
//! the dataset is replaced. Uploads commit only on a fully successful parse,
//! so a rejected file never disturbs previously ingested data. Views and
//! availability lists are recomputed on every call — the dashboard's
//! interaction model is one full recomputation per filter change.

use std::path::Path;

use tracing::{debug, warn};

use callboard_core::error::Result;
use callboard_core::models::FilterSelection;
use callboard_data::aggregate::AggregateView;
use callboard_data::export::to_csv_string;
use callboard_data::reader::load_records;
use callboard_data::store::Dataset;

// ── Public types ──────────────────────────────────────────────────────────────

/// Summary of one successful upload, for the upload confirmation widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOutcome {
    /// Rows parsed from the uploaded file.
    pub rows_read: usize,
    /// Rows actually added after duplicate collapsing.
    pub rows_added: usize,
    /// Dataset size after the merge.
    pub total_rows: usize,
}

// ── DashboardSession ──────────────────────────────────────────────────────────

/// The session-scoped owner of the cumulative dataset.
///
/// Sessions start empty; the first upload initializes the dataset and every
/// subsequent upload merges into it. There is no way to remove ingested rows
/// short of starting a new session.
#[derive(Debug, Default)]
pub struct DashboardSession {
    dataset: Dataset,
    /// Human-readable description of the last rejected upload, if any.
    last_error: Option<String>,
}

impl DashboardSession {
    /// Create a session with an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Ingestion ─────────────────────────────────────────────────────────

    /// Parse `path` and merge its records into the session dataset.
    ///
    /// Commit-on-success: when parsing fails the dataset is left exactly as
    /// it was, the error is retained for [`last_error`](Self::last_error),
    /// and the caller gets the parse error back to surface as an upload
    /// rejection.
    pub fn upload(&mut self, path: &Path) -> Result<UploadOutcome> {
        let records = match load_records(path) {
            Ok(records) => records,
            Err(e) => {
                warn!("Upload rejected for {}: {}", path.display(), e);
                self.last_error = Some(e.to_string());
                return Err(e);
            }
        };

        let rows_read = records.len();
        let before = self.dataset.len();
        self.dataset = self.dataset.merge(records);
        self.last_error = None;

        let outcome = UploadOutcome {
            rows_read,
            rows_added: self.dataset.len() - before,
            total_rows: self.dataset.len(),
        };
        debug!(
            "Upload {}: {} rows read, {} added, {} total",
            path.display(),
            outcome.rows_read,
            outcome.rows_added,
            outcome.total_rows
        );
        Ok(outcome)
    }

    // ── Views ─────────────────────────────────────────────────────────────

    /// The cumulative dataset (read-only).
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Years available in the year selector, newest first.
    pub fn years(&self) -> Vec<i32> {
        self.dataset.years()
    }

    /// Months available in the month selector for `year`, calendar order.
    pub fn months(&self, year: i32) -> Result<Vec<u32>> {
        self.dataset.months_in(year)
    }

    /// Compute the aggregate view for a (year, month) selection.
    ///
    /// Always succeeds; an empty selection yields a view whose metrics are
    /// all undefined sentinels.
    pub fn view(&self, year: i32, month: u32) -> AggregateView {
        let selection = FilterSelection::new(year, month);
        AggregateView::compute(selection, self.dataset.filter_month(selection))
    }

    /// Raw CSV of the currently filtered subset, for the download link.
    pub fn export_filtered(&self, year: i32, month: u32) -> Result<String> {
        let subset = self.dataset.filter_month(FilterSelection::new(year, month));
        to_csv_string(&subset)
    }

    /// Description of the most recent rejected upload, cleared by the next
    /// successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use callboard_core::models::Metric;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const SCENARIO_CSV: &[&str] = &[
        "Date,Initial Repeat Flag",
        "2023-01-05,1",
        "2023-01-20,0",
        "2023-02-01,1",
    ];

    fn write_file(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    // ── Upload flow ───────────────────────────────────────────────────────────

    #[test]
    fn test_first_upload_initializes_dataset() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "initial.csv", SCENARIO_CSV);

        let mut session = DashboardSession::new();
        let outcome = session.upload(&path).unwrap();

        assert_eq!(outcome.rows_read, 3);
        assert_eq!(outcome.rows_added, 3);
        assert_eq!(outcome.total_rows, 3);
        assert_eq!(session.dataset().len(), 3);
    }

    #[test]
    fn test_reupload_identical_file_adds_nothing() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "initial.csv", SCENARIO_CSV);

        let mut session = DashboardSession::new();
        session.upload(&path).unwrap();
        let second = session.upload(&path).unwrap();

        assert_eq!(second.rows_read, 3);
        assert_eq!(second.rows_added, 0);
        assert_eq!(second.total_rows, 3);
    }

    #[test]
    fn test_failed_upload_keeps_existing_dataset() {
        let dir = TempDir::new().unwrap();
        let good = write_file(dir.path(), "good.csv", SCENARIO_CSV);
        let bad = write_file(dir.path(), "bad.csv", &["Date", "not-a-date"]);

        let mut session = DashboardSession::new();
        session.upload(&good).unwrap();
        assert!(session.upload(&bad).is_err());

        assert_eq!(session.dataset().len(), 3);
        assert!(session.last_error().unwrap().contains("not-a-date"));
    }

    #[test]
    fn test_successful_upload_clears_last_error() {
        let dir = TempDir::new().unwrap();
        let good = write_file(dir.path(), "good.csv", SCENARIO_CSV);
        let bad = write_file(dir.path(), "bad.csv", &["Intent", "Billing"]);

        let mut session = DashboardSession::new();
        assert!(session.upload(&bad).is_err());
        assert!(session.last_error().is_some());

        session.upload(&good).unwrap();
        assert!(session.last_error().is_none());
    }

    // ── Selection and views ───────────────────────────────────────────────────

    #[test]
    fn test_scenario_filter_january() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "initial.csv", SCENARIO_CSV);

        let mut session = DashboardSession::new();
        session.upload(&path).unwrap();

        assert_eq!(session.years(), vec![2023]);
        assert_eq!(session.months(2023).unwrap(), vec![1, 2]);

        let view = session.view(2023, 1);
        assert_eq!(view.total_records, 2);
        assert_eq!(view.total_repeats, 1);
        assert_eq!(view.total_non_repeats, 1);
        assert_eq!(view.repeat_percent, Metric::Defined(50));
    }

    #[test]
    fn test_view_of_empty_selection_is_sentinel_not_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "initial.csv", SCENARIO_CSV);

        let mut session = DashboardSession::new();
        session.upload(&path).unwrap();

        let view = session.view(2023, 7);
        assert!(view.is_empty());
        assert_eq!(view.repeat_percent, Metric::Undefined);
        assert_eq!(view.avg_call_length, Metric::Undefined);
    }

    #[test]
    fn test_months_for_absent_year_errors() {
        let session = DashboardSession::new();
        assert!(session.months(2023).is_err());
    }

    // ── Export ────────────────────────────────────────────────────────────────

    #[test]
    fn test_export_filtered_contains_subset_only() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "initial.csv", SCENARIO_CSV);

        let mut session = DashboardSession::new();
        session.upload(&path).unwrap();

        let csv = session.export_filtered(2023, 1).unwrap();
        assert!(csv.contains("2023-01-05"));
        assert!(csv.contains("2023-01-20"));
        assert!(!csv.contains("2023-02-01"));
    }
}
