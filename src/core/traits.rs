//! Core traits for account storage and request validation
//!
//! The account service depends only on these abstractions, so it can run
//! against the in-memory repository, a durable store, or a purpose-built fake
//! in tests.

use crate::core::validation::ValidationErrors;
use crate::types::{Account, AccountId, CustomerId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Storage capability for accounts
///
/// Mutating calls report how many records they affected; zero is the uniform
/// failure signal. Implementations translate their own faults (connectivity,
/// constraint violations) into that signal instead of panicking.
///
/// An implementation must guarantee that a reported count of 1 means exactly
/// that write was durably applied. Any locking needed to prevent lost updates
/// lives here, not in the service.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// All accounts of a customer, ordered by account id
    async fn list_by_customer(&self, customer_id: CustomerId) -> Vec<Account>;

    /// The account matching both ids, if any
    async fn get_by_customer_and_account(
        &self,
        customer_id: CustomerId,
        account_id: AccountId,
    ) -> Option<Account>;

    /// Persist a new account, returning the id storage assigned
    ///
    /// Any id on the input is ignored. `None` means nothing was stored.
    async fn create(&self, account: &Account) -> Option<AccountId>;

    /// Mark an account inactive, stamping its closing time
    async fn soft_delete_by_id(&self, account_id: AccountId, closed_on: DateTime<Utc>) -> u64;

    /// Overwrite an account's balance
    async fn update_balance_by_id(&self, account_id: AccountId, new_balance: Decimal) -> u64;
}

/// Stateless shape and range checks on a request
pub trait Validator<T>: Send + Sync {
    /// Check every rule, collecting all failures
    fn validate(&self, item: &T) -> Result<(), ValidationErrors>;
}
