//! Batch processing with customer-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which dispatches a batch
//! of command records concurrently while keeping each customer's commands in
//! file order.
//!
//! # Design
//!
//! A batch is partitioned by customer id. Each partition runs sequentially in
//! its own tokio task and partitions run concurrently. Every command that reads
//! and then writes an account only touches accounts of its own customer, so no
//! two tasks ever race on the same account.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor<R>
//!     └── Arc<AccountService<R>>  (shared business rules and storage)
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::dispatcher::{dispatch, CommandOutcome};
use crate::core::service::AccountService;
use crate::core::traits::AccountRepository;
use crate::types::{CommandRecord, CustomerId};

/// Batch processor with customer-based partitioning
pub struct BatchProcessor<R> {
    service: Arc<AccountService<R>>,
}

impl<R> Clone for BatchProcessor<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<R: AccountRepository + 'static> BatchProcessor<R> {
    pub fn new(service: Arc<AccountService<R>>) -> Self {
        Self { service }
    }

    /// Partition a batch of commands by customer id
    ///
    /// # Guarantees
    ///
    /// - Each command appears in exactly one partition
    /// - Commands of each customer keep their original order
    pub fn partition_by_customer(
        &self,
        batch: Vec<CommandRecord>,
    ) -> HashMap<CustomerId, Vec<CommandRecord>> {
        let mut customer_batches: HashMap<CustomerId, Vec<CommandRecord>> = HashMap::new();

        for record in batch {
            customer_batches
                .entry(record.customer_id)
                .or_default()
                .push(record);
        }

        customer_batches
    }

    /// Dispatch one customer's commands in order
    ///
    /// Rejected commands are recorded in their outcome and do not stop the
    /// remaining commands.
    pub async fn process_customer_commands(
        &self,
        commands: Vec<CommandRecord>,
    ) -> Vec<CommandOutcome> {
        let mut outcomes = Vec::with_capacity(commands.len());

        for record in commands {
            outcomes.push(dispatch(&self.service, record).await);
        }

        outcomes
    }

    /// Dispatch a batch with one task per customer
    ///
    /// Outcomes of different customers may interleave in any order. A task that
    /// panics is logged and its outcomes are lost.
    pub async fn process_batch(&self, batch: Vec<CommandRecord>) -> Vec<CommandOutcome> {
        let customer_batches = self.partition_by_customer(batch);

        let mut tasks = Vec::with_capacity(customer_batches.len());
        for (customer_id, commands) in customer_batches {
            let processor = self.clone();
            let task = tokio::spawn(async move {
                processor.process_customer_commands(commands).await
            });
            tasks.push((customer_id, task));
        }

        let mut outcomes = Vec::new();
        for (customer_id, task) in tasks {
            match task.await {
                Ok(customer_outcomes) => outcomes.extend(customer_outcomes),
                Err(e) => {
                    tracing::error!(customer_id, error = %e, "customer task panicked");
                }
            }
        }

        outcomes
    }
}
