//! Request validators
//!
//! Validators check the shape and range of a request before the service
//! touches storage. They hold no state beyond their thresholds and report
//! every broken rule, not just the first.

use crate::config::ServiceConfig;
use crate::core::traits::Validator;
use crate::types::{fits_money_scale, BalanceChange, NewAccount, MONEY_SCALE};
use rust_decimal::Decimal;
use std::fmt;

/// One broken rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// The offending field
    pub field: &'static str,
    /// Why it was rejected
    pub message: String,
}

/// All rules a request broke (never empty when returned as an error)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    failures: Vec<ValidationFailure>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a broken rule
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.failures.push(ValidationFailure {
            field,
            message: message.into(),
        });
    }

    /// Record a broken rule unless `passed` holds
    fn check(&mut self, passed: bool, field: &'static str, message: impl Into<String>) {
        if !passed {
            self.add(field, message);
        }
    }

    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// `Ok` when no rule was broken
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for failure in &self.failures {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", failure.field, failure.message)?;
            first = false;
        }
        Ok(())
    }
}

/// Validates account creation requests
#[derive(Debug, Clone)]
pub struct AccountCreateValidator {
    config: ServiceConfig,
}

impl AccountCreateValidator {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }
}

impl Validator<NewAccount> for AccountCreateValidator {
    fn validate(&self, request: &NewAccount) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.check(
            request.customer_id > 0,
            "customer_id",
            "Customer id must be greater than 0.",
        );
        errors.check(
            request
                .account_type()
                .is_some_and(|account_type| self.config.supports(account_type)),
            "account_type",
            "Account type requested not in system.",
        );
        errors.check(
            request.initial_balance >= self.config.minimum_opening_balance,
            "initial_balance",
            format!(
                "Account balance must be at least {} to create.",
                self.config.minimum_opening_balance
            ),
        );
        errors.check(
            fits_money_scale(request.initial_balance),
            "initial_balance",
            format!("Account balance must have at most {MONEY_SCALE} decimal places."),
        );

        errors.into_result()
    }
}

/// Validates deposit and withdrawal requests
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceChangeValidator;

impl Validator<BalanceChange> for BalanceChangeValidator {
    fn validate(&self, request: &BalanceChange) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.check(
            request.customer_id > 0,
            "customer_id",
            "Customer id must be greater than 0.",
        );
        errors.check(
            request.account_id > 0,
            "account_id",
            "Account id must be greater than 0.",
        );
        errors.check(
            request.amount > Decimal::ZERO,
            "amount",
            "Amount must be greater than 0.",
        );
        errors.check(
            fits_money_scale(request.amount),
            "amount",
            format!("Amount must have at most {MONEY_SCALE} decimal places."),
        );

        errors.into_result()
    }
}
