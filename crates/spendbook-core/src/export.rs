//! CSV export of an expense snapshot.

use std::{
    fs::{self, File},
    io::Write,
    path::Path,
};

use chrono::{NaiveDate, SecondsFormat};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use spendbook_domain::Expense;

use crate::{format::DateFormatter, CoreError, StandardFormatter};

pub const CSV_HEADERS: [&str; 5] = ["Date", "Description", "Category", "Amount", "Created At"];

/// Default download name for an export produced on `today`.
pub fn export_file_name(today: NaiveDate) -> String {
    format!("expenses_{}.csv", today.format("%Y-%m-%d"))
}

/// Writes the header and one row per expense, in snapshot order. Returns the row count.
///
/// Every text field is quoted and embedded quotes are doubled, so descriptions
/// containing commas, quotes or newlines survive a round trip through any CSV reader.
pub fn write_csv<W: Write>(expenses: &[Expense], out: W) -> Result<usize, CoreError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);
    writer.write_record(CSV_HEADERS)?;
    let dates = StandardFormatter;
    for expense in expenses {
        writer.write_record([
            dates.format_date(expense.date.date_naive()),
            expense.description.clone(),
            expense.category.to_string(),
            format!("{:.2}", expense.amount),
            expense
                .created_at
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
        ])?;
    }
    writer.flush()?;
    Ok(expenses.len())
}

pub fn to_csv_string(expenses: &[Expense]) -> Result<String, CoreError> {
    let mut buffer = Vec::new();
    write_csv(expenses, &mut buffer)?;
    String::from_utf8(buffer).map_err(|err| CoreError::Serde(err.to_string()))
}

/// Exports to `path`, staging through a sibling temporary file.
pub fn export_to_path(expenses: &[Expense], path: &Path) -> Result<usize, CoreError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let written = File::create(&tmp)
        .map_err(CoreError::from)
        .and_then(|file| write_csv(expenses, file))
        .and_then(|rows| fs::rename(&tmp, path).map(|()| rows).map_err(CoreError::from));
    let rows = match written {
        Ok(rows) => rows,
        Err(err) => {
            let _ = fs::remove_file(&tmp);
            return Err(err);
        }
    };
    tracing::info!(path = %path.display(), rows, "exported expenses");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use spendbook_domain::Category;

    fn expense(description: &str, amount: f64) -> Expense {
        Expense {
            id: "1".into(),
            amount,
            category: Category::Food,
            description: description.into(),
            date: Utc.with_ymd_and_hms(2025, 1, 5, 0, 0, 0).unwrap(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 5, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn export_escapes_quotes_and_commas() {
        let output = to_csv_string(&[expense("Coffee, \"large\"", 4.5)]).unwrap();
        insta::assert_snapshot!(output.trim_end(), @r#"
        "Date","Description","Category","Amount","Created At"
        "Jan 05, 2025","Coffee, ""large""","Food",4.50,"2025-01-05T08:00:00Z"
        "#);
    }

    #[test]
    fn export_round_trips_through_csv_reader() {
        let tricky = "Line one\nline \"two\", done";
        let output = to_csv_string(&[expense(tricky, 12.0)]).unwrap();

        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(|row| row.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], tricky);
        assert_eq!(&rows[0][3], "12.00");
    }

    #[test]
    fn empty_snapshot_writes_header_only() {
        let output = to_csv_string(&[]).unwrap();
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn file_name_uses_iso_date() {
        let today = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
        assert_eq!(export_file_name(today), "expenses_2025-11-03.csv");
    }

    #[test]
    fn export_to_path_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("expenses.csv");
        let rows = export_to_path(&[expense("Bagel", 3.25)], &path).unwrap();
        assert_eq!(rows, 1);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"Bagel\""));
    }

    #[test]
    fn failed_export_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expenses.csv");
        std::fs::create_dir(&path).unwrap();

        let result = export_to_path(&[expense("Bagel", 3.25)], &path);

        assert!(result.is_err());
        assert!(path.is_dir());
        assert!(!dir.path().join("expenses.csv.tmp").exists());
    }
}
