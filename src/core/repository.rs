//! Thread-safe in-memory account repository
//!
//! This module provides `InMemoryAccountRepository`, an [`AccountRepository`]
//! backed by a concurrent map.
//!
//! # Design
//!
//! Accounts are stored in a `DashMap` keyed by account id. DashMap shards its
//! entries behind fine-grained locks, so reads and writes to different accounts
//! proceed in parallel while writes to the same account are serialized. Ids come
//! from an atomic sequence starting at 1 and are never reused.
//!
//! # Lost updates
//!
//! Each write is applied under the entry lock, but the service reads a balance
//! and writes the new one in two calls. Two callers racing on the same account
//! can therefore overwrite each other. The batch processor routes every command
//! of a customer through a single task, which rules this out for the
//! command-file pipeline.

use crate::core::traits::AccountRepository;
use crate::types::{Account, AccountId, CustomerId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicI64, Ordering};

/// Thread-safe account store
#[derive(Debug)]
pub struct InMemoryAccountRepository {
    /// Accounts by account id
    accounts: DashMap<AccountId, Account>,

    /// Next id to hand out
    next_id: AtomicI64,
}

impl InMemoryAccountRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Snapshot of every account, ordered by account id
    ///
    /// Accounts created or modified by other tasks after this call returns are
    /// not reflected.
    pub fn all_accounts(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by_key(|account| account.account_id);
        accounts
    }

    /// Number of stored accounts, open or closed
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn list_by_customer(&self, customer_id: CustomerId) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .filter(|entry| entry.value().customer_id == customer_id)
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by_key(|account| account.account_id);
        accounts
    }

    async fn get_by_customer_and_account(
        &self,
        customer_id: CustomerId,
        account_id: AccountId,
    ) -> Option<Account> {
        self.accounts
            .get(&account_id)
            .filter(|entry| entry.value().customer_id == customer_id)
            .map(|entry| entry.value().clone())
    }

    async fn create(&self, account: &Account) -> Option<AccountId> {
        if account.balance < Decimal::ZERO {
            tracing::warn!(
                customer_id = account.customer_id,
                balance = %account.balance,
                "refusing to store account with negative balance"
            );
            return None;
        }

        let account_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut stored = account.clone();
        stored.account_id = account_id;
        self.accounts.insert(account_id, stored);

        Some(account_id)
    }

    async fn soft_delete_by_id(&self, account_id: AccountId, closed_on: DateTime<Utc>) -> u64 {
        match self.accounts.get_mut(&account_id) {
            Some(mut entry) if entry.active => {
                entry.close(closed_on);
                1
            }
            _ => 0,
        }
    }

    async fn update_balance_by_id(&self, account_id: AccountId, new_balance: Decimal) -> u64 {
        if new_balance < Decimal::ZERO {
            tracing::warn!(
                account_id,
                balance = %new_balance,
                "refusing to store negative balance"
            );
            return 0;
        }

        match self.accounts.get_mut(&account_id) {
            Some(mut entry) if entry.active => {
                entry.balance = new_balance;
                1
            }
            _ => 0,
        }
    }
}
