//! Sequential processing strategy
//!
//! Dispatches every command in file order on a single-threaded runtime. The
//! SyncReader streams rows one at a time, so memory use is bounded by the
//! number of accounts rather than the size of the file.
//!
//! Account ids are assigned in file order, which makes the output of this
//! strategy fully deterministic.

use crate::config::ServiceConfig;
use crate::core::dispatcher::dispatch;
use crate::core::repository::InMemoryAccountRepository;
use crate::core::service::AccountService;
use crate::io::csv_format::write_accounts_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::ProcessingStrategy;
use crate::types::ProcessingError;
use std::io::Write;
use std::path::Path;

/// Sequential processing strategy
///
/// # Examples
///
/// ```no_run
/// use rust_accounts_engine::config::ServiceConfig;
/// use rust_accounts_engine::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(ServiceConfig::default());
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("commands.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone)]
pub struct SyncProcessingStrategy {
    service_config: ServiceConfig,
}

impl SyncProcessingStrategy {
    pub fn new(service_config: ServiceConfig) -> Self {
        Self { service_config }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Process commands in file order and write the snapshot
    ///
    /// 1. Opens the file with a SyncReader (fails fast if it is missing)
    /// 2. Dispatches each record through a fresh account service
    /// 3. Logs and skips malformed rows, stops on a read failure
    /// 4. Writes every account, open or closed, to output
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), ProcessingError> {
        let reader = SyncReader::new(input_path)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .map_err(|e| ProcessingError::runtime(format!("Failed to create tokio runtime: {}", e)))?;

        let service = AccountService::new(
            InMemoryAccountRepository::new(),
            self.service_config.clone(),
        );

        runtime.block_on(async {
            for result in reader {
                match result {
                    Ok(record) => {
                        dispatch(&service, record).await;
                    }
                    Err(e) if e.is_recoverable() => tracing::warn!(error = %e, "skipping row"),
                    Err(e) => return Err(e),
                }
            }

            Ok::<(), ProcessingError>(())
        })?;

        write_accounts_csv(&service.repository().all_accounts(), output)
    }
}
