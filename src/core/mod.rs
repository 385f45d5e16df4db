//! Core business logic module
//!
//! This module contains the account processing components:
//! - `traits` - Storage and validation abstractions
//! - `validation` - Request validators
//! - `repository` - Thread-safe in-memory account storage
//! - `service` - Account business rules
//! - `dispatcher` - Maps command records to service calls
//! - `batch_processor` - Per-customer partitioned concurrent dispatch

pub mod batch_processor;
pub mod dispatcher;
pub mod repository;
pub mod service;
pub mod traits;
pub mod validation;

pub use batch_processor::BatchProcessor;
pub use dispatcher::{dispatch, CommandOutcome, Payload};
pub use repository::InMemoryAccountRepository;
pub use service::AccountService;
pub use traits::{AccountRepository, Validator};
pub use validation::{AccountCreateValidator, BalanceChangeValidator, ValidationErrors};
