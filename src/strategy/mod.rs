//! Processing strategy module for command files
//!
//! This module defines the Strategy pattern for complete command-file pipelines,
//! covering CSV parsing, dispatch through the account service and the final
//! account snapshot. Strategies are selected at runtime.

use crate::cli::StrategyType;
use crate::config::ServiceConfig;
use crate::types::ProcessingError;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete command-file pipelines
///
/// Each strategy reads command records from a CSV file, dispatches them to a
/// fresh account service and writes the resulting account snapshot to output.
pub trait ProcessingStrategy: Send + Sync {
    /// Process commands from input file and write the snapshot to output
    ///
    /// Rejected commands and malformed rows are logged and skipped; they never
    /// cause this method to fail.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened
    /// - The async runtime cannot be created
    /// - Output cannot be written
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), ProcessingError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - Sequential or concurrent processing
/// * `batch_config` - Batching parameters (ignored for sequential)
/// * `service_config` - Business thresholds for the account service
pub fn create_strategy(
    strategy_type: StrategyType,
    batch_config: Option<BatchConfig>,
    service_config: ServiceConfig,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sequential => Box::new(SyncProcessingStrategy::new(service_config)),
        StrategyType::Concurrent => {
            let batch_config = batch_config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(batch_config, service_config))
        }
    }
}

