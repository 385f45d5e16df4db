//! Asynchronous CSV reader with batch interface
//!
//! Streams command records from a CSV source in batches for the concurrent
//! strategy.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of CommandRecords
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{CommandRecord, ProcessingError};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous CSV reader
///
/// Keeps memory use bounded by the batch size. Rows that cannot be parsed are
/// logged and skipped.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: u64,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 1,
        }
    }

    /// Read up to `batch_size` command records
    ///
    /// Returns an empty vector once the input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying reader fails. Malformed rows are
    /// skipped instead.
    pub async fn read_batch(&mut self, batch_size: usize) -> Result<Vec<CommandRecord>, ProcessingError> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            let row = match records.next().await {
                Some(row) => row,
                None => break,
            };
            self.line_num += 1;

            let converted = match row {
                Ok(csv_record) => convert_csv_record(csv_record, self.line_num),
                Err(e) if e.is_io_error() => Err(ProcessingError::IoError {
                    message: e.to_string(),
                }),
                Err(e) => Err(ProcessingError::ParseError {
                    line: Some(self.line_num),
                    message: e.to_string(),
                }),
            };

            match converted {
                Ok(record) => batch.push(record),
                Err(e) if e.is_recoverable() => tracing::warn!(error = %e, "skipping row"),
                Err(e) => return Err(e),
            }
        }

        Ok(batch)
    }
}
