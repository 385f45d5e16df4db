//! Command dispatch
//!
//! Turns one `CommandRecord` from the command file into one account service
//! call and records the outcome. Rejections are logged, never propagated:
//! a rejected command does not stop the file from being processed.

use crate::core::service::AccountService;
use crate::core::traits::AccountRepository;
use crate::types::{Account, CommandRecord, CommandType, ServiceError};
use tracing::{info, warn};

/// Successful result of a command
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The account an open, close, deposit or withdraw acted on
    Account(Account),

    /// The accounts a list returned
    Accounts(Vec<Account>),
}

/// The record that was dispatched and what came of it
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutcome {
    pub record: CommandRecord,
    pub result: Result<Payload, ServiceError>,
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run one command against the service
pub async fn dispatch<R: AccountRepository>(
    service: &AccountService<R>,
    record: CommandRecord,
) -> CommandOutcome {
    let result = match record.command {
        CommandType::List => service
            .list_accounts(record.customer_id)
            .await
            .map(Payload::Accounts)
            .map_err(ServiceError::from),
        CommandType::Open => service
            .create_account(record.to_new_account())
            .await
            .map(Payload::Account)
            .map_err(ServiceError::from),
        CommandType::Close => service
            .close_account(record.to_account_key())
            .await
            .map(Payload::Account)
            .map_err(ServiceError::from),
        CommandType::Deposit => service
            .deposit(record.to_balance_change())
            .await
            .map(Payload::Account)
            .map_err(ServiceError::from),
        CommandType::Withdraw => service
            .withdraw(record.to_balance_change())
            .await
            .map(Payload::Account)
            .map_err(ServiceError::from),
    };

    match &result {
        Ok(Payload::Accounts(accounts)) => info!(
            line = record.line,
            command = record.command.name(),
            customer_id = record.customer_id,
            count = accounts.len(),
            "command applied"
        ),
        Ok(Payload::Account(account)) => info!(
            line = record.line,
            command = record.command.name(),
            customer_id = record.customer_id,
            account_id = account.account_id,
            "command applied"
        ),
        Err(error) => warn!(
            line = record.line,
            command = record.command.name(),
            customer_id = record.customer_id,
            code = error.code(),
            retryable = error.is_retryable(),
            "command rejected: {error}"
        ),
    }

    CommandOutcome { record, result }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::core::repository::InMemoryAccountRepository;
    use crate::types::AccountType;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn service() -> AccountService<InMemoryAccountRepository> {
        AccountService::new(InMemoryAccountRepository::new(), ServiceConfig::default())
    }

    fn record(
        command: CommandType,
        account_id: Option<i64>,
        account_type_id: Option<i32>,
        amount: Option<i64>,
    ) -> CommandRecord {
        CommandRecord {
            line: 2,
            command,
            customer_id: 1,
            account_id,
            account_type_id,
            amount: amount.map(|value| Decimal::new(value, 0)),
        }
    }

    fn open_savings(amount: i64) -> CommandRecord {
        record(
            CommandType::Open,
            None,
            Some(AccountType::Savings.id()),
            Some(amount),
        )
    }

    #[tokio::test]
    async fn test_dispatch_open_then_list() {
        let service = service();

        let account = match dispatch(&service, open_savings(150)).await.result {
            Ok(Payload::Account(account)) => account,
            other => panic!("expected an account, got {other:?}"),
        };

        let listed = dispatch(&service, record(CommandType::List, None, None, None)).await;
        assert_eq!(listed.result, Ok(Payload::Accounts(vec![account])));
    }

    #[tokio::test]
    async fn test_dispatch_keeps_record() {
        let service = service();
        let input = open_savings(150);

        let outcome = dispatch(&service, input.clone()).await;

        assert_eq!(outcome.record, input);
        assert!(outcome.is_success());
    }

    #[rstest]
    #[case::open_without_amount(record(CommandType::Open, None, Some(2), None), ServiceError::BadRequest)]
    #[case::open_without_type(record(CommandType::Open, None, None, Some(150)), ServiceError::BadRequest)]
    #[case::close_without_account(record(CommandType::Close, None, None, None), ServiceError::BadRequest)]
    #[case::deposit_without_account(record(CommandType::Deposit, None, None, Some(10)), ServiceError::BadRequest)]
    #[case::withdraw_without_amount(record(CommandType::Withdraw, Some(1), None, None), ServiceError::BadRequest)]
    #[case::open_checking_first(record(CommandType::Open, None, Some(1), Some(150)), ServiceError::MissingSavingsAccount)]
    #[case::deposit_unknown_account(record(CommandType::Deposit, Some(9), None, Some(10)), ServiceError::AccountNotFound)]
    #[tokio::test]
    async fn test_dispatch_rejections(#[case] input: CommandRecord, #[case] expected: ServiceError) {
        let outcome = dispatch(&service(), input).await;

        assert_eq!(outcome.result, Err(expected));
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_dispatch_balance_flow() {
        let service = service();
        dispatch(&service, open_savings(200)).await;

        let deposit = dispatch(&service, record(CommandType::Deposit, Some(1), None, Some(40))).await;
        let overdraft =
            dispatch(&service, record(CommandType::Withdraw, Some(1), None, Some(300))).await;
        let withdraw =
            dispatch(&service, record(CommandType::Withdraw, Some(1), None, Some(240))).await;
        let close = dispatch(&service, record(CommandType::Close, Some(1), None, None)).await;

        match deposit.result {
            Ok(Payload::Account(account)) => assert_eq!(account.balance, Decimal::new(240, 0)),
            other => panic!("unexpected deposit result {other:?}"),
        }
        assert_eq!(
            overdraft.result,
            Err(ServiceError::WithdrawalWillOverdraftAccount)
        );
        assert!(withdraw.is_success());
        match close.result {
            Ok(Payload::Account(account)) => assert!(!account.active),
            other => panic!("unexpected close result {other:?}"),
        }
    }
}
