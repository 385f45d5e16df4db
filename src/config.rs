//! Service configuration
//!
//! `ServiceConfig` carries the business thresholds the account service and its
//! validators are built from. It is constructed once at startup, usually from
//! CLI arguments with environment variable fallbacks (see [`crate::cli`]).
//!
//! # Defaults
//!
//! - minimum opening balance: 100
//! - default minimum balance recorded on new accounts: 100
//! - supported account types: checking and savings

use crate::types::{fits_money_scale, AccountType, MONEY_SCALE};
use rust_decimal::Decimal;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A monetary threshold is negative
    #[error("{name} must not be negative, got {value}")]
    NegativeAmount {
        /// The setting name
        name: &'static str,
        /// The rejected value
        value: Decimal,
    },

    /// A monetary threshold is finer than whole cents
    #[error("{name} must have at most {scale} decimal places, got {value}", scale = MONEY_SCALE)]
    TooPrecise {
        /// The setting name
        name: &'static str,
        /// The rejected value
        value: Decimal,
    },

    /// No account type would be accepted
    #[error("at least one account type must be supported")]
    NoAccountTypes,
}

/// Business thresholds for the account service
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Smallest initial balance accepted when opening an account
    pub minimum_opening_balance: Decimal,

    /// Minimum balance threshold recorded on every new account
    pub default_minimum_balance: Decimal,

    /// Account types that may be opened
    pub supported_account_types: Vec<AccountType>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            minimum_opening_balance: Decimal::ONE_HUNDRED,
            default_minimum_balance: Decimal::ONE_HUNDRED,
            supported_account_types: AccountType::ALL.to_vec(),
        }
    }
}

impl ServiceConfig {
    /// Create a validated configuration
    ///
    /// Duplicate account types are collapsed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - either threshold is negative or finer than whole cents
    /// - `supported_account_types` is empty
    pub fn new(
        minimum_opening_balance: Decimal,
        default_minimum_balance: Decimal,
        supported_account_types: Vec<AccountType>,
    ) -> Result<Self, ConfigError> {
        if minimum_opening_balance < Decimal::ZERO {
            return Err(ConfigError::NegativeAmount {
                name: "minimum_opening_balance",
                value: minimum_opening_balance,
            });
        }

        if default_minimum_balance < Decimal::ZERO {
            return Err(ConfigError::NegativeAmount {
                name: "default_minimum_balance",
                value: default_minimum_balance,
            });
        }

        for (name, value) in [
            ("minimum_opening_balance", minimum_opening_balance),
            ("default_minimum_balance", default_minimum_balance),
        ] {
            if !fits_money_scale(value) {
                return Err(ConfigError::TooPrecise { name, value });
            }
        }

        let mut types = Vec::with_capacity(supported_account_types.len());
        for account_type in supported_account_types {
            if !types.contains(&account_type) {
                types.push(account_type);
            }
        }

        if types.is_empty() {
            return Err(ConfigError::NoAccountTypes);
        }

        Ok(Self {
            minimum_opening_balance,
            default_minimum_balance,
            supported_account_types: types,
        })
    }

    /// Whether accounts of this type may be opened
    pub fn supports(&self, account_type: AccountType) -> bool {
        self.supported_account_types.contains(&account_type)
    }
}
