//! Request types accepted by the account service and the command file
//!
//! Service requests (`NewAccount`, `AccountKey`, `BalanceChange`) are the inputs
//! of the service operations. `CommandRecord` is one parsed row of the command
//! file, from which the dispatcher builds a service request.

use super::account::{AccountId, AccountType, CustomerId};
use rust_decimal::Decimal;

/// A proposed account, before storage assigns it an id
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    /// The customer opening the account
    pub customer_id: CustomerId,

    /// Raw account type id
    ///
    /// Kept unparsed so unsupported ids reach validation.
    pub account_type_id: i32,

    /// Opening balance
    pub initial_balance: Decimal,
}

impl NewAccount {
    pub fn new(customer_id: CustomerId, account_type: AccountType, initial_balance: Decimal) -> Self {
        NewAccount {
            customer_id,
            account_type_id: account_type.id(),
            initial_balance,
        }
    }

    /// The requested account type, if the id is a known one
    pub fn account_type(&self) -> Option<AccountType> {
        AccountType::from_id(self.account_type_id)
    }
}

/// Identifies one account of one customer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountKey {
    pub customer_id: CustomerId,
    pub account_id: AccountId,
}

/// An instruction to move money into or out of one account
///
/// The amount is always positive once validated; the direction comes from
/// the operation it is passed to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceChange {
    pub customer_id: CustomerId,
    pub account_id: AccountId,
    pub amount: Decimal,
}

/// Commands accepted in the command file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    /// List a customer's accounts
    List,

    /// Open a new account
    Open,

    /// Close (soft delete) an account
    Close,

    /// Credit funds to an account
    Deposit,

    /// Debit funds from an account
    Withdraw,
}

impl CommandType {
    pub fn name(self) -> &'static str {
        match self {
            CommandType::List => "list",
            CommandType::Open => "open",
            CommandType::Close => "close",
            CommandType::Deposit => "deposit",
            CommandType::Withdraw => "withdraw",
        }
    }
}

/// One command as read from the input file
///
/// Optional fields are the ones a given command may omit; the dispatcher
/// decides which of them a command needs.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandRecord {
    /// 1-based line number in the input file (header is line 1)
    pub line: u64,

    /// The command to run
    pub command: CommandType,

    /// The customer the command acts for
    pub customer_id: CustomerId,

    /// Target account (close, deposit, withdraw)
    pub account_id: Option<AccountId>,

    /// Requested account type id (open)
    pub account_type_id: Option<i32>,

    /// Opening balance (open) or amount to move (deposit, withdraw)
    pub amount: Option<Decimal>,
}

impl CommandRecord {
    /// Build the create request, or `None` when the row lacks a type or amount
    pub fn to_new_account(&self) -> Option<NewAccount> {
        let account_type_id = self.account_type_id?;
        let initial_balance = self.amount?;
        Some(NewAccount {
            customer_id: self.customer_id,
            account_type_id,
            initial_balance,
        })
    }

    /// Build the close request; a missing account id becomes 0 and is rejected
    /// by the service
    pub fn to_account_key(&self) -> AccountKey {
        AccountKey {
            customer_id: self.customer_id,
            account_id: self.account_id.unwrap_or(0),
        }
    }

    /// Build the balance change, or `None` when the row lacks an account or amount
    pub fn to_balance_change(&self) -> Option<BalanceChange> {
        Some(BalanceChange {
            customer_id: self.customer_id,
            account_id: self.account_id?,
            amount: self.amount?,
        })
    }
}
