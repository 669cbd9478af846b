use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the Callboard data core.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// An uploaded file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension is not one of the supported tabular formats.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(PathBuf),

    /// A CSV document could not be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A spreadsheet workbook could not be opened or read.
    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(String),

    /// The required `Date` column is absent from the header row.
    #[error("Missing required Date column in {0}")]
    MissingDateColumn(PathBuf),

    /// A date cell did not match any recognised calendar format.
    #[error("Invalid date value \"{value}\" at row {row}")]
    DateParse { value: String, row: usize },

    /// A requested year has no records in the dataset.
    #[error("No records for year {0}")]
    EmptySelection(i32),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the Callboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = DashboardError::FileRead {
            path: PathBuf::from("/uploads/january.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/uploads/january.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_unsupported_format() {
        let err = DashboardError::UnsupportedFormat(PathBuf::from("report.pdf"));
        assert_eq!(err.to_string(), "Unsupported file format: report.pdf");
    }

    #[test]
    fn test_error_display_missing_date_column() {
        let err = DashboardError::MissingDateColumn(PathBuf::from("calls.csv"));
        assert_eq!(err.to_string(), "Missing required Date column in calls.csv");
    }

    #[test]
    fn test_error_display_date_parse() {
        let err = DashboardError::DateParse {
            value: "not-a-date".to_string(),
            row: 7,
        };
        assert_eq!(err.to_string(), "Invalid date value \"not-a-date\" at row 7");
    }

    #[test]
    fn test_error_display_empty_selection() {
        let err = DashboardError::EmptySelection(2021);
        assert_eq!(err.to_string(), "No records for year 2021");
    }

    #[test]
    fn test_error_display_spreadsheet() {
        let err = DashboardError::Spreadsheet("workbook is encrypted".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to read spreadsheet: workbook is encrypted"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DashboardError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_csv() {
        let csv_err = csv::ReaderBuilder::new()
            .from_reader("a,b\n1".as_bytes())
            .records()
            .next()
            .unwrap()
            .unwrap_err();
        let err: DashboardError = csv_err.into();
        assert!(err.to_string().contains("CSV error"));
    }
}
