//! Account business rules
//!
//! `AccountService` runs one business operation per entry point: it consults
//! the validators, reads current state from the repository, enforces the
//! cross-account policy and issues at most one write. Every operation returns
//! its own closed error enum.
//!
//! # Ordering of checks
//!
//! - validation errors are raised before any repository access
//! - policy errors are raised after a read but before any write
//! - `FailedTo*` errors are raised only after a write reported no effect
//!
//! # Savings-account policy
//!
//! A customer's first account must be a savings account, and a customer with
//! accounts but no savings account may not open anything else. The rule is
//! evaluated from a fresh read of the customer's accounts on every call.
//!
//! # Concurrency
//!
//! The service holds only configuration, validators and a repository handle,
//! so it can be shared behind an `Arc` by any number of tasks. Preventing lost
//! updates on a single account is the repository's job.

use crate::config::ServiceConfig;
use crate::core::traits::{AccountRepository, Validator};
use crate::core::validation::{AccountCreateValidator, BalanceChangeValidator};
use crate::types::{
    Account, AccountId, AccountKey, AccountType, BalanceChange, CloseAccountError, CreateAccountError,
    CustomerId, DepositError, ListAccountsError, NewAccount, WithdrawError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::field::Empty;
use tracing::{debug, info, instrument};

/// Account service over a repository `R`
pub struct AccountService<R> {
    repository: R,
    config: ServiceConfig,
    create_validator: Box<dyn Validator<NewAccount>>,
    balance_change_validator: Box<dyn Validator<BalanceChange>>,
}

/// Where a balance lookup stopped
enum LookupFailure {
    NotFound,
    Closed,
}

impl<R: AccountRepository> AccountService<R> {
    /// Create a service with the standard validators for `config`
    pub fn new(repository: R, config: ServiceConfig) -> Self {
        let create_validator = AccountCreateValidator::new(config.clone());
        Self::with_validators(
            repository,
            config,
            Box::new(create_validator),
            Box::new(BalanceChangeValidator),
        )
    }

    /// Create a service with caller-supplied validators
    pub fn with_validators(
        repository: R,
        config: ServiceConfig,
        create_validator: Box<dyn Validator<NewAccount>>,
        balance_change_validator: Box<dyn Validator<BalanceChange>>,
    ) -> Self {
        Self {
            repository,
            config,
            create_validator,
            balance_change_validator,
        }
    }

    /// The underlying repository
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// The configuration the service was built with
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// List a customer's accounts
    ///
    /// An empty list is a success: the customer simply holds no accounts.
    ///
    /// # Errors
    ///
    /// * `BadRequest` - `customer_id` is not positive
    #[instrument(skip(self))]
    pub async fn list_accounts(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Account>, ListAccountsError> {
        if customer_id < 1 {
            return Err(ListAccountsError::BadRequest);
        }

        let accounts = self.repository.list_by_customer(customer_id).await;
        debug!(count = accounts.len(), "listed accounts");

        Ok(accounts)
    }

    /// Open a new account
    ///
    /// `None` stands for a request that could not be formed.
    ///
    /// # Returns
    ///
    /// The stored account with its assigned id, active, carrying the
    /// configured default minimum balance.
    ///
    /// # Errors
    ///
    /// * `BadRequest` - no request
    /// * `RequestNotValid` - bad customer id, unsupported type, or opening
    ///   balance below the configured minimum or finer than whole cents
    /// * `MissingSavingsAccount` - the customer must open a savings account first
    /// * `FailedToCreateAccount` - storage assigned no id
    #[instrument(skip_all, fields(customer_id = request.as_ref().map(|r| r.customer_id)))]
    pub async fn create_account(
        &self,
        request: Option<NewAccount>,
    ) -> Result<Account, CreateAccountError> {
        let request = request.ok_or(CreateAccountError::BadRequest)?;

        if let Err(errors) = self.create_validator.validate(&request) {
            debug!(%errors, "create request rejected");
            return Err(CreateAccountError::RequestNotValid);
        }
        let account_type = request
            .account_type()
            .ok_or(CreateAccountError::RequestNotValid)?;

        let existing = self.repository.list_by_customer(request.customer_id).await;
        if !savings_policy_allows(&existing, account_type) {
            return Err(CreateAccountError::MissingSavingsAccount);
        }

        let mut account = Account::open(
            request.customer_id,
            account_type,
            request.initial_balance,
            self.config.default_minimum_balance,
            Utc::now(),
        );

        let account_id = self
            .repository
            .create(&account)
            .await
            .ok_or(CreateAccountError::FailedToCreateAccount)?;
        account.account_id = account_id;

        info!(account_id, %account_type, balance = %account.balance, "account opened");
        Ok(account)
    }

    /// Close (soft delete) an account
    ///
    /// # Returns
    ///
    /// The account as closed: inactive, with its closing time set.
    ///
    /// # Errors
    ///
    /// * `BadRequest` - customer or account id not positive
    /// * `AccountNotFound` - no account with both ids
    /// * `AccountDeleted` - already closed
    /// * `FundsStillAvailable` - balance is not exactly zero
    /// * `FailedToCloseAccount` - storage affected no record
    #[instrument(skip_all, fields(customer_id = key.customer_id, account_id = key.account_id))]
    pub async fn close_account(&self, key: AccountKey) -> Result<Account, CloseAccountError> {
        if key.customer_id < 1 || key.account_id < 1 {
            return Err(CloseAccountError::BadRequest);
        }

        let mut account = self
            .find_active(key.customer_id, key.account_id)
            .await
            .map_err(|failure| match failure {
                LookupFailure::NotFound => CloseAccountError::AccountNotFound,
                LookupFailure::Closed => CloseAccountError::AccountDeleted,
            })?;

        if !account.balance.is_zero() {
            return Err(CloseAccountError::FundsStillAvailable);
        }

        let closed_on = Utc::now();
        let affected = self
            .repository
            .soft_delete_by_id(account.account_id, closed_on)
            .await;
        if affected == 0 {
            return Err(CloseAccountError::FailedToCloseAccount);
        }

        account.close(closed_on);
        info!("account closed");
        Ok(account)
    }

    /// Credit funds to an account
    ///
    /// The resulting balance has no upper bound.
    ///
    /// # Errors
    ///
    /// * `BadRequest` - no request
    /// * `RequestNotValid` - ids not positive, or amount not positive or
    ///   finer than whole cents
    /// * `AccountNotFound` - no account with both ids
    /// * `AccountDeleted` - the account is closed
    /// * `FailedToDepositToAccount` - the balance overflowed or storage affected
    ///   no record
    #[instrument(skip_all, fields(customer_id = Empty, account_id = Empty))]
    pub async fn deposit(&self, request: Option<BalanceChange>) -> Result<Account, DepositError> {
        let request = request.ok_or(DepositError::BadRequest)?;
        record_target(&request);

        if let Err(errors) = self.balance_change_validator.validate(&request) {
            debug!(%errors, "deposit rejected");
            return Err(DepositError::RequestNotValid);
        }

        let mut account = self
            .find_active(request.customer_id, request.account_id)
            .await
            .map_err(|failure| match failure {
                LookupFailure::NotFound => DepositError::AccountNotFound,
                LookupFailure::Closed => DepositError::AccountDeleted,
            })?;

        let new_balance = account
            .balance
            .checked_add(request.amount)
            .ok_or(DepositError::FailedToDepositToAccount)?;

        let affected = self
            .repository
            .update_balance_by_id(account.account_id, new_balance)
            .await;
        if affected == 0 {
            return Err(DepositError::FailedToDepositToAccount);
        }

        account.balance = new_balance;
        info!(amount = %request.amount, balance = %new_balance, "deposit applied");
        Ok(account)
    }

    /// Debit funds from an account
    ///
    /// Only the zero floor is enforced; the account's minimum balance is not.
    ///
    /// # Errors
    ///
    /// * `BadRequest` - no request
    /// * `RequestNotValid` - ids not positive, or amount not positive or
    ///   finer than whole cents
    /// * `AccountNotFound` - no account with both ids
    /// * `AccountDeleted` - the account is closed
    /// * `WithdrawalWillOverdraftAccount` - the amount exceeds the balance;
    ///   nothing is written
    /// * `FailedToWithdrawFromAccount` - storage affected no record
    #[instrument(skip_all, fields(customer_id = Empty, account_id = Empty))]
    pub async fn withdraw(&self, request: Option<BalanceChange>) -> Result<Account, WithdrawError> {
        let request = request.ok_or(WithdrawError::BadRequest)?;
        record_target(&request);

        if let Err(errors) = self.balance_change_validator.validate(&request) {
            debug!(%errors, "withdrawal rejected");
            return Err(WithdrawError::RequestNotValid);
        }

        let mut account = self
            .find_active(request.customer_id, request.account_id)
            .await
            .map_err(|failure| match failure {
                LookupFailure::NotFound => WithdrawError::AccountNotFound,
                LookupFailure::Closed => WithdrawError::AccountDeleted,
            })?;

        let new_balance = match account.balance.checked_sub(request.amount) {
            Some(balance) if balance >= Decimal::ZERO => balance,
            _ => return Err(WithdrawError::WithdrawalWillOverdraftAccount),
        };

        let affected = self
            .repository
            .update_balance_by_id(account.account_id, new_balance)
            .await;
        if affected == 0 {
            return Err(WithdrawError::FailedToWithdrawFromAccount);
        }

        account.balance = new_balance;
        info!(amount = %request.amount, balance = %new_balance, "withdrawal applied");
        Ok(account)
    }

    /// Fetch an account that belongs to the customer and is still open
    async fn find_active(
        &self,
        customer_id: CustomerId,
        account_id: AccountId,
    ) -> Result<Account, LookupFailure> {
        let account = self
            .repository
            .get_by_customer_and_account(customer_id, account_id)
            .await
            .ok_or(LookupFailure::NotFound)?;

        if !account.active {
            return Err(LookupFailure::Closed);
        }

        Ok(account)
    }
}

/// Savings-account prerequisite for opening `requested`
///
/// Closed accounts still count as held accounts.
fn savings_policy_allows(existing: &[Account], requested: AccountType) -> bool {
    if existing.is_empty() {
        requested == AccountType::Savings
    } else {
        existing.iter().any(Account::is_savings)
    }
}

fn record_target(request: &BalanceChange) {
    let span = tracing::Span::current();
    span.record("customer_id", request.customer_id);
    span.record("account_id", request.account_id);
}
