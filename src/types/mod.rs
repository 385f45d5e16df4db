//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account, account types and identifiers
//! - `request`: Service requests and command-file records
//! - `error`: Operation error enums and pipeline errors

pub mod account;
pub mod error;
pub mod request;

pub use account::{fits_money_scale, Account, AccountId, AccountType, CustomerId, MONEY_SCALE};
pub use error::{
    CloseAccountError, CreateAccountError, DepositError, ErrorStage, ListAccountsError,
    ProcessingError, ServiceError, WithdrawError,
};
pub use request::{AccountKey, BalanceChange, CommandRecord, CommandType, NewAccount};
