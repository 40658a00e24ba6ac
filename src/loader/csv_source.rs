//! CSV row source
//!
//! Streams records from a headered CSV file as raw rows. Nothing beyond
//! the current record is held in memory.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{StringRecord, Trim};

use crate::normalizer::RawRow;

use super::errors::{LoaderError, LoaderResult};

/// Lazy iterator of raw rows over a CSV source.
///
/// Records may be shorter than the header row; the missing trailing
/// columns are absent from the row. Yields `Err` for records the CSV
/// decoder could not read. Callers
/// distinguish a malformed record from a failing source with
/// `csv::Error::is_io_error`.
pub struct CsvSource<R> {
    records: csv::StringRecordsIntoIter<R>,
    headers: StringRecord,
}

impl CsvSource<File> {
    /// Opens a CSV file whose first line is the header row
    pub fn open(path: &Path) -> LoaderResult<Self> {
        if !path.is_file() {
            return Err(LoaderError::source_not_found(path));
        }

        let file = File::open(path).map_err(|e| {
            LoaderError::source_unreadable(format!("{}: {}", path.display(), e), 0)
        })?;

        Self::from_reader(file)
    }
}

impl<R: Read> CsvSource<R> {
    /// Wraps any reader producing headered CSV
    pub fn from_reader(reader: R) -> LoaderResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| LoaderError::source_unreadable(format!("header row: {}", e), 0))?
            .clone();

        Ok(Self {
            records: reader.into_records(),
            headers,
        })
    }

    /// Column names from the header row
    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    fn to_row(&self, record: &StringRecord) -> RawRow {
        let mut row = RawRow::new();
        for (column, value) in self.headers.iter().zip(record.iter()) {
            row.insert(column, Some(value.to_string()));
        }
        row
    }
}

impl<R: Read> Iterator for CsvSource<R> {
    type Item = Result<RawRow, csv::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(record.map(|r| self.to_row(&r)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::columns;

    const SAMPLE: &str = "\
VIN (1-10),County,Make,Model,Model Year
5YJ3E1EA0K,King,TESLA,MODEL 3,2019
1N4AZ0CP5D,Pierce,NISSAN,LEAF,2013
";

    #[test]
    fn test_rows_keyed_by_header() {
        let source = CsvSource::from_reader(SAMPLE.as_bytes()).unwrap();
        let rows: Vec<RawRow> = source.map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(columns::VIN), Some("5YJ3E1EA0K"));
        assert_eq!(rows[1].get(columns::COUNTY), Some("Pierce"));
        assert_eq!(rows[1].get(columns::STATE), None);
    }

    #[test]
    fn test_short_record_leaves_trailing_columns_absent() {
        let data = "VIN (1-10),Make,Electric Range\nA,B,200\nC,D\n";
        let rows: Vec<RawRow> = CsvSource::from_reader(data.as_bytes())
            .unwrap()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get(columns::MAKE), Some("D"));
        assert_eq!(rows[1].get(columns::ELECTRIC_RANGE), None);
    }

    #[test]
    fn test_invalid_utf8_is_malformed_not_io() {
        let mut data = b"VIN (1-10),Make\nA,B\n".to_vec();
        data.extend_from_slice(b"C,\xff\xfe\n");
        data.extend_from_slice(b"D,E\n");
        let results: Vec<_> = CsvSource::from_reader(data.as_slice()).unwrap().collect();

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        assert!(!err.is_io_error());
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_empty_cells_kept_as_empty_text() {
        let data = "VIN (1-10),County\nA,\n";
        let row = CsvSource::from_reader(data.as_bytes())
            .unwrap()
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(row.get(columns::COUNTY), Some(""));
    }

    #[test]
    fn test_missing_file() {
        let err = CsvSource::open(Path::new("/nonexistent/ev.csv")).err().unwrap();
        assert_eq!(err.code().code(), "EV_LOAD_SOURCE_NOT_FOUND");
    }
}
