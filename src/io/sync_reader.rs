//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over command records from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Design
//!
//! The SyncReader uses csv::Reader to read and deserialize rows one at a time,
//! so memory use does not grow with the file. Each row's line number (the
//! header is line 1) travels with the record and with any error.
//!
//! ```no_run
//! use rust_accounts_engine::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("commands.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Dispatching: {:?}", record),
//!         Err(e) => eprintln!("Skipping: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Row-level errors are yielded as Err variants; parse failures are
//!   recoverable, an I/O failure mid-file is not (see
//!   `ProcessingError::is_recoverable`)

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{CommandRecord, ProcessingError};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: u64,
}

impl SyncReader {
    /// Open a command file for streaming iteration
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (trailing optional columns may be omitted)
    /// - Use an 8KB buffer
    ///
    /// # Errors
    ///
    /// `FileNotFound` if the path does not exist, `IoError` for any other
    /// failure to open it.
    pub fn new(path: &Path) -> Result<Self, ProcessingError> {
        let file = File::open(path).map_err(|e| ProcessingError::open_failed(path, e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 1,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<CommandRecord, ProcessingError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvRecord>();
        let row = deserializer.next()?;
        self.line_num += 1;

        Some(match row {
            Ok(csv_record) => convert_csv_record(csv_record, self.line_num),
            Err(e) if e.is_io_error() => Err(e.into()),
            Err(e) => Err(ProcessingError::ParseError {
                line: Some(self.line_num),
                message: e.to_string(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CommandType;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "command,customer,account,type,amount\n";

    fn create_temp_csv(rows: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(HEADER.as_bytes())
            .and_then(|_| file.write_all(rows.as_bytes()))
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_sync_reader_fails_on_missing_file() {
        let result = SyncReader::new(Path::new("nonexistent.csv"));
        assert!(matches!(result, Err(ProcessingError::FileNotFound { .. })));
    }

    #[test]
    fn test_sync_reader_iterates_records() {
        let file = create_temp_csv("open,1,,savings,150\ndeposit,1,1,,40.5\nlist,1,,,\n");

        let records: Vec<_> = SyncReader::new(file.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].command, CommandType::Open);
        assert_eq!(records[0].account_type_id, Some(2));
        assert_eq!(records[1].account_id, Some(1));
        assert_eq!(records[1].amount, Some(Decimal::new(405, 1)));
        assert_eq!(records[2].command, CommandType::List);
    }

    #[test]
    fn test_sync_reader_tracks_line_numbers() {
        let file = create_temp_csv("list,1,,,\nlist,2,,,\nlist,3,,,\n");

        let lines: Vec<u64> = SyncReader::new(file.path())
            .unwrap()
            .filter_map(Result::ok)
            .map(|record| record.line)
            .collect();

        assert_eq!(lines, vec![2, 3, 4]);
    }

    #[test]
    fn test_sync_reader_continues_after_errors() {
        let file = create_temp_csv(
            "open,1,,savings,150\n\
             deposit,abc,1,,10\n\
             transfer,1,1,,10\n\
             deposit,1,1,,ten\n\
             list,1,,,\n",
        );

        let records: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        assert_eq!(records.len(), 5);
        assert!(records[0].is_ok());
        assert!(matches!(
            records[1],
            Err(ProcessingError::ParseError { line: Some(3), .. })
        ));
        assert!(matches!(
            records[2],
            Err(ProcessingError::InvalidRecord { line: 4, .. })
        ));
        assert!(matches!(
            records[3],
            Err(ProcessingError::InvalidRecord { line: 5, .. })
        ));
        assert!(records[4].is_ok());
        assert!(records[1..4]
            .iter()
            .all(|r| r.as_ref().is_err_and(ProcessingError::is_recoverable)));
    }

    #[test]
    fn test_sync_reader_handles_whitespace_and_short_rows() {
        let file = create_temp_csv("  OPEN  ,  1  ,  ,  savings ,  100.00  \nlist,1\n");

        let records: Vec<_> = SyncReader::new(file.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].amount, Some(Decimal::new(10000, 2)));
        assert_eq!(records[1].command, CommandType::List);
        assert_eq!(records[1].account_id, None);
    }

    #[test]
    fn test_sync_reader_empty_file_after_header() {
        let file = create_temp_csv("");
        assert_eq!(SyncReader::new(file.path()).unwrap().count(), 0);
    }
}
