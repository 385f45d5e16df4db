//! Concurrent batch processing strategy
//!
//! This module provides a multi-threaded implementation of the
//! ProcessingStrategy trait. Commands are read in batches and each batch is
//! partitioned by customer for parallel dispatch.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchProcessor (customer partitioning + tasks)
//!         └── AccountService (business rules)
//!             └── InMemoryAccountRepository (thread-safe account state)
//! ```
//!
//! # Ordering
//!
//! - Batches are processed one after another, so a customer's commands keep
//!   file order even when they span batches
//! - Within a batch, different customers run in parallel
//! - Account ids of different customers in the same batch are assigned in
//!   whatever order their tasks reach storage; with `batch_size = 1` the
//!   output matches the sequential strategy exactly

use crate::config::ServiceConfig;
use crate::core::batch_processor::BatchProcessor;
use crate::core::repository::InMemoryAccountRepository;
use crate::core::service::AccountService;
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_accounts_csv;
use crate::strategy::ProcessingStrategy;
use crate::types::ProcessingError;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Configuration for batch processing
///
/// Controls how commands are batched and the number of worker threads used
/// within each batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of commands per batch
    pub batch_size: usize,
    /// Number of worker threads
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig, replacing zero values by their defaults
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size,
                default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            tracing::warn!(
                "Invalid max_concurrent_batches ({}), using default ({})",
                max_concurrent_batches,
                default.max_concurrent_batches
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Concurrent batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    service_config: ServiceConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig, service_config: ServiceConfig) -> Self {
        Self {
            config,
            service_config,
        }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Process commands batch by batch and write the snapshot
    ///
    /// 1. Creates a multi-threaded tokio runtime
    /// 2. Shares one account service across the batch processor's tasks
    /// 3. Reads a batch, dispatches it, and waits before reading the next
    /// 4. Writes every account, open or closed, to output
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), ProcessingError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| ProcessingError::runtime(format!("Failed to create tokio runtime: {}", e)))?;

        let service = Arc::new(AccountService::new(
            InMemoryAccountRepository::new(),
            self.service_config.clone(),
        ));
        let processor = BatchProcessor::new(Arc::clone(&service));

        runtime.block_on(async {
            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| ProcessingError::open_failed(input_path, e))?;

            // csv-async reads futures-io, not tokio-io
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            loop {
                let batch = reader.read_batch(self.config.batch_size).await?;
                if batch.is_empty() {
                    break;
                }

                let outcomes = processor.process_batch(batch).await;
                tracing::debug!(
                    dispatched = outcomes.len(),
                    rejected = outcomes.iter().filter(|o| !o.is_success()).count(),
                    "batch complete"
                );
            }

            Ok::<(), ProcessingError>(())
        })?;

        write_accounts_csv(&service.repository().all_accounts(), output)
    }
}
