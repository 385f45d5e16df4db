//! Error types for the Rust Accounts Engine
//!
//! Service operations never fail with a generic error. Each operation returns
//! its own closed enumeration, so callers matching on the outcome are checked
//! for exhaustiveness by the compiler:
//!
//! - [`ListAccountsError`]
//! - [`CreateAccountError`]
//! - [`CloseAccountError`]
//! - [`DepositError`]
//! - [`WithdrawError`]
//!
//! Every operation error converts into [`ServiceError`], the full closed set of
//! error codes, for callers that handle all operations uniformly.
//!
//! [`ProcessingError`] covers the command-file pipeline: file access, CSV
//! parsing and configuration. Most of these are fatal; malformed rows are
//! logged and skipped.

use crate::config::ConfigError;
use thiserror::Error;

const BAD_REQUEST: &str = "Bad request";
const REQUEST_NOT_VALID: &str = "Request failed validation";
const ACCOUNT_NOT_FOUND: &str = "Account not found";
const ACCOUNT_DELETED: &str = "Account has been closed";
const MISSING_SAVINGS_ACCOUNT: &str = "Missing at least one savings account.";
const FUNDS_STILL_AVAILABLE: &str =
    "Funds are still available in account. Please empty account before closing.";
const WITHDRAWAL_WILL_OVERDRAFT: &str =
    "Withdrawal will overdraft account. Please try again with a different amount";
const FAILED_TO_CREATE: &str = "Failed to create account.";
const FAILED_TO_CLOSE: &str = "Failed to close account.";
const FAILED_TO_DEPOSIT: &str = "Failed to deposit money to account.";
const FAILED_TO_WITHDRAW: &str = "Failed to withdraw money from account.";

/// Errors of the ListAccounts operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ListAccountsError {
    /// The customer id is not a positive integer
    #[error("{}", BAD_REQUEST)]
    BadRequest,
}

/// Errors of the CreateAccount operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CreateAccountError {
    /// No request was supplied
    #[error("{}", BAD_REQUEST)]
    BadRequest,

    /// The request failed creation validation
    #[error("{}", REQUEST_NOT_VALID)]
    RequestNotValid,

    /// The customer must hold a savings account first
    #[error("{}", MISSING_SAVINGS_ACCOUNT)]
    MissingSavingsAccount,

    /// Storage did not assign an id
    #[error("{}", FAILED_TO_CREATE)]
    FailedToCreateAccount,
}

/// Errors of the CloseAccount operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CloseAccountError {
    /// Customer or account id is not positive
    #[error("{}", BAD_REQUEST)]
    BadRequest,

    /// No account matches the customer and account ids
    #[error("{}", ACCOUNT_NOT_FOUND)]
    AccountNotFound,

    /// The account is already closed
    #[error("{}", ACCOUNT_DELETED)]
    AccountDeleted,

    /// The balance is not exactly zero
    #[error("{}", FUNDS_STILL_AVAILABLE)]
    FundsStillAvailable,

    /// Storage reported no record affected
    #[error("{}", FAILED_TO_CLOSE)]
    FailedToCloseAccount,
}

/// Errors of the Deposit operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DepositError {
    /// No request was supplied
    #[error("{}", BAD_REQUEST)]
    BadRequest,

    /// The request failed balance-change validation
    #[error("{}", REQUEST_NOT_VALID)]
    RequestNotValid,

    /// No account matches the customer and account ids
    #[error("{}", ACCOUNT_NOT_FOUND)]
    AccountNotFound,

    /// The account is closed
    #[error("{}", ACCOUNT_DELETED)]
    AccountDeleted,

    /// The new balance could not be computed or stored
    #[error("{}", FAILED_TO_DEPOSIT)]
    FailedToDepositToAccount,
}

/// Errors of the Withdraw operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WithdrawError {
    /// No request was supplied
    #[error("{}", BAD_REQUEST)]
    BadRequest,

    /// The request failed balance-change validation
    #[error("{}", REQUEST_NOT_VALID)]
    RequestNotValid,

    /// No account matches the customer and account ids
    #[error("{}", ACCOUNT_NOT_FOUND)]
    AccountNotFound,

    /// The account is closed
    #[error("{}", ACCOUNT_DELETED)]
    AccountDeleted,

    /// The amount exceeds the current balance
    #[error("{}", WITHDRAWAL_WILL_OVERDRAFT)]
    WithdrawalWillOverdraftAccount,

    /// Storage reported no record affected
    #[error("{}", FAILED_TO_WITHDRAW)]
    FailedToWithdrawFromAccount,
}

/// Where in an operation an error was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStage {
    /// Before any storage access
    Validation,

    /// After a read, before any write
    Policy,

    /// A write was attempted and did not take effect
    Persistence,
}

/// The full closed set of account service error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ServiceError {
    #[error("{}", BAD_REQUEST)]
    BadRequest,
    #[error("{}", REQUEST_NOT_VALID)]
    RequestNotValid,
    #[error("{}", ACCOUNT_NOT_FOUND)]
    AccountNotFound,
    #[error("{}", ACCOUNT_DELETED)]
    AccountDeleted,
    #[error("{}", FAILED_TO_CREATE)]
    FailedToCreateAccount,
    #[error("{}", FAILED_TO_CLOSE)]
    FailedToCloseAccount,
    #[error("{}", FAILED_TO_DEPOSIT)]
    FailedToDepositToAccount,
    #[error("{}", FAILED_TO_WITHDRAW)]
    FailedToWithdrawFromAccount,
    #[error("{}", FUNDS_STILL_AVAILABLE)]
    FundsStillAvailable,
    #[error("{}", MISSING_SAVINGS_ACCOUNT)]
    MissingSavingsAccount,
    #[error("{}", WITHDRAWAL_WILL_OVERDRAFT)]
    WithdrawalWillOverdraftAccount,
}

impl ServiceError {
    /// Stable identifier of the error code
    pub fn code(self) -> &'static str {
        match self {
            ServiceError::BadRequest => "BadRequest",
            ServiceError::RequestNotValid => "RequestNotValid",
            ServiceError::AccountNotFound => "AccountNotFound",
            ServiceError::AccountDeleted => "AccountDeleted",
            ServiceError::FailedToCreateAccount => "FailedToCreateAccount",
            ServiceError::FailedToCloseAccount => "FailedToCloseAccount",
            ServiceError::FailedToDepositToAccount => "FailedToDepositToAccount",
            ServiceError::FailedToWithdrawFromAccount => "FailedToWithdrawFromAccount",
            ServiceError::FundsStillAvailable => "FundsStillAvailable",
            ServiceError::MissingSavingsAccount => "MissingSavingsAccount",
            ServiceError::WithdrawalWillOverdraftAccount => "WithdrawalWillOverdraftAccount",
        }
    }

    /// The stage of the operation that produced this error
    pub fn stage(self) -> ErrorStage {
        match self {
            ServiceError::BadRequest | ServiceError::RequestNotValid => ErrorStage::Validation,
            ServiceError::AccountNotFound
            | ServiceError::AccountDeleted
            | ServiceError::FundsStillAvailable
            | ServiceError::MissingSavingsAccount
            | ServiceError::WithdrawalWillOverdraftAccount => ErrorStage::Policy,
            ServiceError::FailedToCreateAccount
            | ServiceError::FailedToCloseAccount
            | ServiceError::FailedToDepositToAccount
            | ServiceError::FailedToWithdrawFromAccount => ErrorStage::Persistence,
        }
    }

    /// Whether the caller may retry the same request
    ///
    /// Only failed writes are retryable; the service never retries itself.
    pub fn is_retryable(self) -> bool {
        self.stage() == ErrorStage::Persistence
    }
}

impl From<ListAccountsError> for ServiceError {
    fn from(error: ListAccountsError) -> Self {
        match error {
            ListAccountsError::BadRequest => ServiceError::BadRequest,
        }
    }
}

impl From<CreateAccountError> for ServiceError {
    fn from(error: CreateAccountError) -> Self {
        match error {
            CreateAccountError::BadRequest => ServiceError::BadRequest,
            CreateAccountError::RequestNotValid => ServiceError::RequestNotValid,
            CreateAccountError::MissingSavingsAccount => ServiceError::MissingSavingsAccount,
            CreateAccountError::FailedToCreateAccount => ServiceError::FailedToCreateAccount,
        }
    }
}

impl From<CloseAccountError> for ServiceError {
    fn from(error: CloseAccountError) -> Self {
        match error {
            CloseAccountError::BadRequest => ServiceError::BadRequest,
            CloseAccountError::AccountNotFound => ServiceError::AccountNotFound,
            CloseAccountError::AccountDeleted => ServiceError::AccountDeleted,
            CloseAccountError::FundsStillAvailable => ServiceError::FundsStillAvailable,
            CloseAccountError::FailedToCloseAccount => ServiceError::FailedToCloseAccount,
        }
    }
}

impl From<DepositError> for ServiceError {
    fn from(error: DepositError) -> Self {
        match error {
            DepositError::BadRequest => ServiceError::BadRequest,
            DepositError::RequestNotValid => ServiceError::RequestNotValid,
            DepositError::AccountNotFound => ServiceError::AccountNotFound,
            DepositError::AccountDeleted => ServiceError::AccountDeleted,
            DepositError::FailedToDepositToAccount => ServiceError::FailedToDepositToAccount,
        }
    }
}

impl From<WithdrawError> for ServiceError {
    fn from(error: WithdrawError) -> Self {
        match error {
            WithdrawError::BadRequest => ServiceError::BadRequest,
            WithdrawError::RequestNotValid => ServiceError::RequestNotValid,
            WithdrawError::AccountNotFound => ServiceError::AccountNotFound,
            WithdrawError::AccountDeleted => ServiceError::AccountDeleted,
            WithdrawError::WithdrawalWillOverdraftAccount => {
                ServiceError::WithdrawalWillOverdraftAccount
            }
            WithdrawError::FailedToWithdrawFromAccount => ServiceError::FailedToWithdrawFromAccount,
        }
    }
}

/// Errors of the command-file processing pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessingError {
    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents processing from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// Recoverable: the malformed row is skipped.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// A row parsed as CSV but does not describe a command
    ///
    /// Recoverable: the row is skipped.
    #[error("Invalid record at line {line}: {message}")]
    InvalidRecord {
        /// Line number of the row
        line: u64,
        /// What is wrong with the row
        message: String,
    },

    /// The async runtime could not be built
    #[error("Runtime error: {message}")]
    Runtime {
        /// Description of the failure
        message: String,
    },

    /// Invalid service configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<std::io::Error> for ProcessingError {
    fn from(error: std::io::Error) -> Self {
        ProcessingError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for ProcessingError {
    fn from(error: csv::Error) -> Self {
        if error.is_io_error() {
            return ProcessingError::IoError {
                message: error.to_string(),
            };
        }

        let line = error.position().map(|pos| pos.line());

        ProcessingError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl ProcessingError {
    /// Create a FileNotFound error
    pub fn file_not_found(path: &std::path::Path) -> Self {
        ProcessingError::FileNotFound {
            path: path.display().to_string(),
        }
    }

    /// Classify a failure to open `path`
    ///
    /// A missing file becomes `FileNotFound`; anything else is an `IoError`.
    pub fn open_failed(path: &std::path::Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::file_not_found(path),
            _ => Self::from(error),
        }
    }

    /// Create an InvalidRecord error
    pub fn invalid_record(line: u64, message: impl Into<String>) -> Self {
        ProcessingError::InvalidRecord {
            line,
            message: message.into(),
        }
    }

    /// Create a Runtime error
    pub fn runtime(message: impl Into<String>) -> Self {
        ProcessingError::Runtime {
            message: message.into(),
        }
    }

    /// Whether processing can continue after this error
    ///
    /// Readers and strategies skip rows that fail with a recoverable error
    /// and abort on anything else.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ProcessingError::ParseError { .. } | ProcessingError::InvalidRecord { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::bad_request(ServiceError::BadRequest, "BadRequest", ErrorStage::Validation)]
    #[case::not_valid(ServiceError::RequestNotValid, "RequestNotValid", ErrorStage::Validation)]
    #[case::not_found(ServiceError::AccountNotFound, "AccountNotFound", ErrorStage::Policy)]
    #[case::deleted(ServiceError::AccountDeleted, "AccountDeleted", ErrorStage::Policy)]
    #[case::funds(ServiceError::FundsStillAvailable, "FundsStillAvailable", ErrorStage::Policy)]
    #[case::savings(ServiceError::MissingSavingsAccount, "MissingSavingsAccount", ErrorStage::Policy)]
    #[case::overdraft(
        ServiceError::WithdrawalWillOverdraftAccount,
        "WithdrawalWillOverdraftAccount",
        ErrorStage::Policy
    )]
    #[case::create(ServiceError::FailedToCreateAccount, "FailedToCreateAccount", ErrorStage::Persistence)]
    #[case::close(ServiceError::FailedToCloseAccount, "FailedToCloseAccount", ErrorStage::Persistence)]
    #[case::deposit(
        ServiceError::FailedToDepositToAccount,
        "FailedToDepositToAccount",
        ErrorStage::Persistence
    )]
    #[case::withdraw(
        ServiceError::FailedToWithdrawFromAccount,
        "FailedToWithdrawFromAccount",
        ErrorStage::Persistence
    )]
    fn test_code_and_stage(
        #[case] error: ServiceError,
        #[case] code: &str,
        #[case] stage: ErrorStage,
    ) {
        assert_eq!(error.code(), code);
        assert_eq!(error.stage(), stage);
        assert_eq!(error.is_retryable(), stage == ErrorStage::Persistence);
    }

    #[rstest]
    #[case::funds(
        ServiceError::FundsStillAvailable,
        "Funds are still available in account. Please empty account before closing."
    )]
    #[case::savings(ServiceError::MissingSavingsAccount, "Missing at least one savings account.")]
    #[case::deposit(ServiceError::FailedToDepositToAccount, "Failed to deposit money to account.")]
    fn test_service_error_display(#[case] error: ServiceError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_operation_errors_share_display_with_service_error() {
        assert_eq!(
            WithdrawError::WithdrawalWillOverdraftAccount.to_string(),
            ServiceError::WithdrawalWillOverdraftAccount.to_string()
        );
        assert_eq!(
            CloseAccountError::AccountDeleted.to_string(),
            ServiceError::AccountDeleted.to_string()
        );
    }

    #[rstest]
    #[case::list(ServiceError::from(ListAccountsError::BadRequest), ServiceError::BadRequest)]
    #[case::create(
        ServiceError::from(CreateAccountError::MissingSavingsAccount),
        ServiceError::MissingSavingsAccount
    )]
    #[case::close(
        ServiceError::from(CloseAccountError::FundsStillAvailable),
        ServiceError::FundsStillAvailable
    )]
    #[case::deposit(
        ServiceError::from(DepositError::FailedToDepositToAccount),
        ServiceError::FailedToDepositToAccount
    )]
    #[case::withdraw(
        ServiceError::from(WithdrawError::WithdrawalWillOverdraftAccount),
        ServiceError::WithdrawalWillOverdraftAccount
    )]
    fn test_operation_error_conversion(#[case] result: ServiceError, #[case] expected: ServiceError) {
        assert_eq!(result, expected);
    }

    #[rstest]
    #[case::file_not_found(
        ProcessingError::FileNotFound { path: "commands.csv".to_string() },
        "File not found: commands.csv"
    )]
    #[case::parse_error_with_line(
        ProcessingError::ParseError { line: Some(42), message: "Invalid field".to_string() },
        "CSV parse error at line 42: Invalid field"
    )]
    #[case::parse_error_without_line(
        ProcessingError::ParseError { line: None, message: "Invalid field".to_string() },
        "CSV parse error: Invalid field"
    )]
    #[case::invalid_record(
        ProcessingError::invalid_record(3, "Unknown command 'transfer'"),
        "Invalid record at line 3: Unknown command 'transfer'"
    )]
    fn test_processing_error_display(#[case] error: ProcessingError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: ProcessingError = io_error.into();
        assert!(matches!(error, ProcessingError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
        assert!(!error.is_recoverable());
    }

    #[test]
    fn test_csv_io_error_is_not_recoverable() {
        let csv_error = csv::Error::from(std::io::Error::other("device went away"));

        let error = ProcessingError::from(csv_error);

        assert!(matches!(error, ProcessingError::IoError { .. }));
        assert!(!error.is_recoverable());
    }

    #[test]
    fn test_invalid_record_is_recoverable() {
        assert!(ProcessingError::invalid_record(2, "bad").is_recoverable());
    }
}
