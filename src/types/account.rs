//! Account-related types for the Rust Accounts Engine
//!
//! This module defines the Account structure, the closed set of account types
//! and the identifiers used to address customer-owned accounts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Customer identifier
///
/// Signed so that non-positive identifiers coming from callers can be
/// represented and rejected by the service.
pub type CustomerId = i64;

/// Account identifier
///
/// Assigned by storage on creation and never reused.
pub type AccountId = i64;

/// Decimal places carried by every monetary value
pub const MONEY_SCALE: u32 = 2;

/// Whether `value` is representable in whole cents
///
/// Trailing zeros do not count, so `100.100` fits and `100.004` does not.
pub fn fits_money_scale(value: Decimal) -> bool {
    value.normalize().scale() <= MONEY_SCALE
}

/// Account types supported by the engine
///
/// The discriminants are the stable type ids used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum AccountType {
    /// Day-to-day account; requires the customer to hold a savings account
    Checking = 1,

    /// Anchor account every customer must open first
    Savings = 2,
}

impl AccountType {
    /// Every account type known to the engine
    pub const ALL: [AccountType; 2] = [AccountType::Checking, AccountType::Savings];

    /// Look up an account type by its numeric id
    ///
    /// Returns `None` for ids outside the known set.
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(AccountType::Checking),
            2 => Some(AccountType::Savings),
            _ => None,
        }
    }

    /// Numeric type id
    pub fn id(self) -> i32 {
        self as i32
    }

    /// Lowercase display name, as used in CSV input and output
    pub fn name(self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AccountType {
    type Err = String;

    /// Parse an account type from its name (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "checking" => Ok(AccountType::Checking),
            "savings" => Ok(AccountType::Savings),
            other => Err(format!("Unknown account type '{}'", other)),
        }
    }
}

/// Customer account state
///
/// Balance is never negative. An account becomes inactive exactly once, when it
/// is closed, and `closed_on` is set if and only if `active` is false.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The account id (zero until storage assigns one)
    pub account_id: AccountId,

    /// The owning customer
    pub customer_id: CustomerId,

    /// The kind of account
    pub account_type: AccountType,

    /// Current balance
    pub balance: Decimal,

    /// Minimum balance threshold recorded at opening
    ///
    /// Carried on the account but not enforced by withdrawals or closing;
    /// only the zero floor is.
    pub minimum_balance: Decimal,

    /// Whether the account is open
    pub active: bool,

    /// When the account was opened
    pub opened_on: DateTime<Utc>,

    /// When the account was closed, if it has been
    pub closed_on: Option<DateTime<Utc>>,
}

impl Account {
    /// Create a new, active account that has not yet been persisted
    ///
    /// # Arguments
    ///
    /// * `customer_id` - The owning customer
    /// * `account_type` - The kind of account
    /// * `balance` - The opening balance
    /// * `minimum_balance` - The minimum balance threshold to record
    /// * `opened_on` - The opening timestamp
    pub fn open(
        customer_id: CustomerId,
        account_type: AccountType,
        balance: Decimal,
        minimum_balance: Decimal,
        opened_on: DateTime<Utc>,
    ) -> Self {
        Account {
            account_id: 0,
            customer_id,
            account_type,
            balance,
            minimum_balance,
            active: true,
            opened_on,
            closed_on: None,
        }
    }

    /// Whether this is a savings account
    pub fn is_savings(&self) -> bool {
        self.account_type == AccountType::Savings
    }

    /// Mark the account closed at the given instant
    ///
    /// Has no effect on an account that is already closed, so the first
    /// closing timestamp is kept.
    pub fn close(&mut self, closed_on: DateTime<Utc>) {
        if self.active {
            self.active = false;
            self.closed_on = Some(closed_on);
        }
    }
}
