//! CSV result file

use super::{OutputResult, ResultSink};
use crate::extract::ListingRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Builds `{dir}/exp_list_{keyword}_{timestamp}.csv`
///
/// Path separators in the keyword are replaced so the file stays in `dir`.
pub fn result_path(dir: impl AsRef<Path>, keyword: &str, timestamp: &str) -> PathBuf {
    let keyword: String = keyword
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    dir.as_ref()
        .join(format!("exp_list_{}_{}.csv", keyword, timestamp))
}

/// Writes `records` to `path` as BOM-prefixed UTF-8 CSV
///
/// The header row is always written, even for an empty run. An absent salary
/// becomes an empty field.
pub fn write_records(records: &[ListingRecord], path: &Path) -> OutputResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(ListingRecord::HEADERS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

/// [`ResultSink`] writing a single CSV file
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for CsvSink {
    fn write(&mut self, records: &[ListingRecord]) -> OutputResult<()> {
        write_records(records, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputError;

    fn record(name: &str, salary: Option<&str>) -> ListingRecord {
        ListingRecord {
            company_name: name.to_string(),
            tagline: "未経験歓迎, 土日休み".to_string(),
            employment_status: "正社員".to_string(),
            first_year_salary: salary.map(str::to_string),
        }
    }

    #[test]
    fn test_result_path() {
        let path = result_path("results", "営業", "2024-01-02-03-04-05");
        assert_eq!(
            path,
            PathBuf::from("results/exp_list_営業_2024-01-02-03-04-05.csv")
        );
    }

    #[test]
    fn test_result_path_sanitizes_separators() {
        let path = result_path("results", "a/b\\c", "ts");
        assert_eq!(path, PathBuf::from("results/exp_list_a_b_c_ts.csv"));
    }

    #[test]
    fn test_write_records_with_bom_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");

        let records = vec![
            record("株式会社A", Some("400万円～600万円")),
            record("株式会社B", None),
        ];
        write_records(&records, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            "company_name,tagline,employment_status,first_year_salary"
        );
        assert_eq!(
            lines[1],
            "株式会社A,\"未経験歓迎, 土日休み\",正社員,400万円～600万円"
        );
        // absent salary is kept as an empty trailing field
        assert_eq!(lines[2], "株式会社B,\"未経験歓迎, 土日休み\",正社員,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_write_empty_run_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write_records(&[], &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text.trim_start_matches('\u{feff}').trim_end(),
            "company_name,tagline,employment_status,first_year_salary"
        );
    }

    #[test]
    fn test_csv_sink_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be opened as a file
        let mut sink = CsvSink::new(dir.path());
        let err = sink.write(&[record("a", None)]).unwrap_err();
        assert!(matches!(err, OutputError::Io(_)));
    }

    #[test]
    fn test_csv_sink_round_trip_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvSink::new(dir.path().join("order.csv"));
        let records: Vec<_> = (0..5)
            .map(|i| record(&format!("company-{}", i), None))
            .collect();
        sink.write(&records).unwrap();

        let mut reader = csv::Reader::from_path(sink.path()).unwrap();
        let names: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[0].to_string())
            .collect();
        assert_eq!(
            names,
            vec!["company-0", "company-1", "company-2", "company-3", "company-4"]
        );
    }
}
