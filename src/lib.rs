//! Rust Accounts Engine Library
//! # Overview
//!
//! This library enforces the business rules of a small retail bank: customers
//! open savings and checking accounts, move money in and out, and close
//! accounts once they are empty. A CSV command file can be replayed through the
//! rules with a sequential or a concurrent strategy.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, requests, error enums)
//! - [`config`] - Business thresholds
//! - [`core`] - Business logic components:
//!   - [`core::service`] - The five account operations
//!   - [`core::validation`] - Request validators
//!   - [`core::repository`] - Thread-safe in-memory account storage
//!   - [`core::dispatcher`] - Command record to service call
//!   - [`core::batch_processor`] - Per-customer concurrent dispatch
//! - [`io`] - CSV reading and snapshot writing
//! - [`strategy`] - Sequential and concurrent pipelines
//! - [`cli`] - CLI arguments parsing
//! - [`telemetry`] - Logging setup
//!
//! # Account rules
//!
//! - A customer's first account must be a savings account
//! - Opening balances must reach the configured minimum
//! - Withdrawals may not overdraw an account
//! - Only an account with a zero balance can be closed, and closing is final

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod strategy;
pub mod telemetry;
pub mod types;

pub use config::{ConfigError, ServiceConfig};
pub use self::core::{AccountRepository, AccountService, InMemoryAccountRepository};
pub use io::write_accounts_csv;
pub use types::{
    Account, AccountId, AccountKey, AccountType, BalanceChange, CustomerId, NewAccount,
    ProcessingError, ServiceError,
};
