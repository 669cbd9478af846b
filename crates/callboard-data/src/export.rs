//! Raw-CSV export of a filtered subset.
//!
//! The presentation layer offers the currently filtered records as a CSV
//! download; the header row uses the original source column names so the
//! export round-trips with the upload format.

use std::io::Write;

use callboard_core::error::Result;
use callboard_core::models::Record;

/// Export header row, matching the upload schema.
pub const EXPORT_HEADERS: [&str; 11] = [
    "Date",
    "Call Length",
    "Quoted_Wait_Time",
    "Specialist_ID",
    "Initial Repeat Flag",
    "SM Tier",
    "Intent",
    "Age",
    "Gender",
    "Msg Within 12 Hrs",
    "Shift",
];

/// Write `records` as CSV to `writer`, one row per record.
///
/// `None` fields become empty cells; the repeat flag is serialized back to
/// its 0/1 source form.
pub fn write_csv<W: Write>(records: &[Record], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPORT_HEADERS)?;

    for record in records {
        csv_writer.write_record([
            record.date.format("%Y-%m-%d").to_string(),
            record.call_length_minutes.map(format_number).unwrap_or_default(),
            record.quoted_wait_time.map(format_number).unwrap_or_default(),
            record.specialist_id.clone().unwrap_or_default(),
            if record.is_repeat { "1" } else { "0" }.to_string(),
            record.tier.clone().unwrap_or_default(),
            record.intent.clone().unwrap_or_default(),
            record.age.map(|a| a.to_string()).unwrap_or_default(),
            record.gender.clone().unwrap_or_default(),
            record.msg_within_12h.clone().unwrap_or_default(),
            record.shift.clone().unwrap_or_default(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Render `records` as an in-memory CSV string for download links.
pub fn to_csv_string(records: &[Record]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    Ok(String::from_utf8(buf).map_err(anyhow::Error::new)?)
}

/// Whole numbers print without a trailing `.0` so exports match the source
/// cells they came from.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use callboard_core::models::Record;

    fn full_record() -> Record {
        Record {
            date: "2023-01-05".parse().unwrap(),
            call_length_minutes: Some(12.5),
            quoted_wait_time: Some(4.0),
            specialist_id: Some("S-100".to_string()),
            is_repeat: true,
            tier: Some("Gold".to_string()),
            intent: Some("Billing".to_string()),
            age: Some(34),
            gender: Some("F".to_string()),
            msg_within_12h: Some("Yes".to_string()),
            shift: Some("1".to_string()),
        }
    }

    fn sparse_record() -> Record {
        Record {
            date: "2023-01-20".parse().unwrap(),
            call_length_minutes: None,
            quoted_wait_time: None,
            specialist_id: None,
            is_repeat: false,
            tier: None,
            intent: None,
            age: None,
            gender: None,
            msg_within_12h: None,
            shift: None,
        }
    }

    #[test]
    fn test_export_header_row() {
        let csv = to_csv_string(&[]).unwrap();
        assert_eq!(
            csv.lines().next().unwrap(),
            "Date,Call Length,Quoted_Wait_Time,Specialist_ID,Initial Repeat Flag,\
             SM Tier,Intent,Age,Gender,Msg Within 12 Hrs,Shift"
        );
    }

    #[test]
    fn test_export_full_record() {
        let csv = to_csv_string(&[full_record()]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "2023-01-05,12.5,4,S-100,1,Gold,Billing,34,F,Yes,1");
    }

    #[test]
    fn test_export_sparse_record_empty_cells() {
        let csv = to_csv_string(&[sparse_record()]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "2023-01-20,,,,0,,,,,,");
    }

    #[test]
    fn test_export_one_row_per_record() {
        let csv = to_csv_string(&[full_record(), sparse_record()]).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn test_export_round_trips_through_reader() {
        let csv = to_csv_string(&[full_record(), sparse_record()]).unwrap();
        let records = crate::reader::load_records_from_reader(
            std::io::Cursor::new(csv),
            std::path::Path::new("export.csv"),
        )
        .unwrap();
        assert_eq!(records, vec![full_record(), sparse_record()]);
    }
}
