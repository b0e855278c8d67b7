// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Repository Interfaces
//!
//! Persistence contracts for each aggregate, defined in the domain layer and
//! implemented in `crate::infrastructure::repositories`.
//!
//! | Trait | Aggregate | Implementations |
//! |-------|-----------|----------------|
//! | `AccountRepository` | `Account` | `InMemoryAccountRepository`, `PostgresAccountRepository` |
//! | `MemberRepository` | `Member` | `InMemoryMemberRepository`, `PostgresMemberRepository` |
//! | `MembersGroupRepository` | `MembersGroup` | `InMemoryMembersGroupRepository`, `PostgresMembersGroupRepository` |
//! | `TransactionRepository` | `Transaction` | `InMemoryTransactionRepository`, `PostgresTransactionRepository` |
//! | `ReceiptRepository` | `Receipt` | `InMemoryReceiptRepository`, `PostgresReceiptRepository` |
//! | `ExpenditureRepository` | `Expenditure` | `InMemoryExpenditureRepository`, `PostgresExpenditureRepository` |
//! | `TransferRepository` | `Transfer` | `InMemoryTransferRepository`, `PostgresTransferRepository` |
//! | `UserRepository` | `User` | `InMemoryUserRepository`, `PostgresUserRepository` |
//!
//! ## Shared contract
//!
//! - `create` inserts and returns the stored row.
//! - `update` stamps `updated_at` and fails with [`RepositoryError::NotFound`]
//!   when no row has the given id.
//! - `delete` fails with [`RepositoryError::NotFound`] when no row was removed.
//! - `find_by_*` return `Ok(None)` for a miss; services decide what a miss means.
//! - Date ranges are inclusive on both bounds.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::account::{Account, AccountId};
use crate::domain::expenditure::{Expenditure, ExpenditureId};
use crate::domain::member::{Member, MemberId};
use crate::domain::members_group::{GroupId, GroupWithMemberCount, MembersGroup};
use crate::domain::period::DateRange;
use crate::domain::receipt::{Receipt, ReceiptId};
use crate::domain::transaction::{Transaction, TransactionId, TransactionType};
use crate::domain::transfer::{Transfer, TransferId};
use crate::domain::user::{User, UserId, UserRole};

/// Storage backend enum for pluggable persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    InMemory,
    PostgreSQL(PostgresConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    pub connection_string: String,
    pub max_connections: u32,
}

/// Ordered by account name.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create(&self, account: &Account) -> Result<Account, RepositoryError>;
    async fn update(&self, account: &Account) -> Result<Account, RepositoryError>;
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Account>, RepositoryError>;
    async fn list_all(&self) -> Result<Vec<Account>, RepositoryError>;
    /// Soft delete; succeeds again on an already inactive account.
    async fn deactivate(&self, id: AccountId) -> Result<(), RepositoryError>;
}

/// Ordered by full name.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn create(&self, member: &Member) -> Result<Member, RepositoryError>;
    async fn update(&self, member: &Member) -> Result<Member, RepositoryError>;
    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>, RepositoryError>;
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Member>, RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, RepositoryError>;
    async fn find_by_group(&self, group_id: GroupId) -> Result<Vec<Member>, RepositoryError>;
    async fn list_all(&self) -> Result<Vec<Member>, RepositoryError>;
    /// Case-insensitive substring match over name, phone and email.
    async fn search(&self, term: &str) -> Result<Vec<Member>, RepositoryError>;
    async fn count_by_group(&self, group_id: GroupId) -> Result<i64, RepositoryError>;
    async fn delete(&self, id: MemberId) -> Result<(), RepositoryError>;
}

/// Ordered by group name.
#[async_trait]
pub trait MembersGroupRepository: Send + Sync {
    async fn create(&self, group: &MembersGroup) -> Result<MembersGroup, RepositoryError>;
    async fn update(&self, group: &MembersGroup) -> Result<MembersGroup, RepositoryError>;
    async fn find_by_id(&self, id: GroupId) -> Result<Option<MembersGroup>, RepositoryError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<MembersGroup>, RepositoryError>;
    async fn list_all(&self) -> Result<Vec<MembersGroup>, RepositoryError>;
    async fn list_with_member_counts(&self) -> Result<Vec<GroupWithMemberCount>, RepositoryError>;
    async fn delete(&self, id: GroupId) -> Result<(), RepositoryError>;
}

/// Ordered by transaction date, newest first.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn create(&self, tx: &Transaction) -> Result<Transaction, RepositoryError>;
    async fn update(&self, tx: &Transaction) -> Result<Transaction, RepositoryError>;
    async fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, RepositoryError>;
    async fn find_by_reference(&self, reference: &str) -> Result<Option<Transaction>, RepositoryError>;
    async fn find_by_account(&self, account_id: AccountId) -> Result<Vec<Transaction>, RepositoryError>;
    async fn find_by_member(&self, member_id: MemberId) -> Result<Vec<Transaction>, RepositoryError>;
    async fn find_by_type(&self, kind: TransactionType) -> Result<Vec<Transaction>, RepositoryError>;
    /// Filters on `transaction_date`.
    async fn find_by_date_range(&self, range: DateRange) -> Result<Vec<Transaction>, RepositoryError>;
    async fn list_all(&self) -> Result<Vec<Transaction>, RepositoryError>;
    async fn delete(&self, id: TransactionId) -> Result<(), RepositoryError>;
}

/// Ordered by creation time, newest first. Range filters use `created_at`.
#[async_trait]
pub trait ReceiptRepository: Send + Sync {
    async fn create(&self, receipt: &Receipt) -> Result<Receipt, RepositoryError>;
    async fn update(&self, receipt: &Receipt) -> Result<Receipt, RepositoryError>;
    async fn find_by_id(&self, id: ReceiptId) -> Result<Option<Receipt>, RepositoryError>;
    async fn find_by_transaction(&self, tx_id: TransactionId) -> Result<Vec<Receipt>, RepositoryError>;
    async fn find_by_account(&self, account_id: AccountId) -> Result<Vec<Receipt>, RepositoryError>;
    async fn find_by_date_range(&self, range: DateRange) -> Result<Vec<Receipt>, RepositoryError>;
    async fn list_all(&self) -> Result<Vec<Receipt>, RepositoryError>;
    /// Sum of receipt amounts for an income account; zero when none match.
    async fn total_by_account(
        &self,
        account_id: AccountId,
        range: Option<DateRange>,
    ) -> Result<Decimal, RepositoryError>;
    async fn delete(&self, id: ReceiptId) -> Result<(), RepositoryError>;
}

/// Ordered by creation time, newest first. Range filters use `created_at`.
#[async_trait]
pub trait ExpenditureRepository: Send + Sync {
    async fn create(&self, expenditure: &Expenditure) -> Result<Expenditure, RepositoryError>;
    async fn update(&self, expenditure: &Expenditure) -> Result<Expenditure, RepositoryError>;
    async fn find_by_id(&self, id: ExpenditureId) -> Result<Option<Expenditure>, RepositoryError>;
    async fn find_by_transaction(&self, tx_id: TransactionId) -> Result<Vec<Expenditure>, RepositoryError>;
    async fn find_by_account(&self, account_id: AccountId) -> Result<Vec<Expenditure>, RepositoryError>;
    async fn find_by_date_range(&self, range: DateRange) -> Result<Vec<Expenditure>, RepositoryError>;
    async fn list_all(&self) -> Result<Vec<Expenditure>, RepositoryError>;
    async fn delete(&self, id: ExpenditureId) -> Result<(), RepositoryError>;
}

/// Ordered by creation time, newest first. Range filters use `created_at`.
#[async_trait]
pub trait TransferRepository: Send + Sync {
    async fn create(&self, transfer: &Transfer) -> Result<Transfer, RepositoryError>;
    async fn update(&self, transfer: &Transfer) -> Result<Transfer, RepositoryError>;
    async fn find_by_id(&self, id: TransferId) -> Result<Option<Transfer>, RepositoryError>;
    async fn find_by_transaction(&self, tx_id: TransactionId) -> Result<Vec<Transfer>, RepositoryError>;
    async fn find_by_credit_account(&self, account_id: AccountId) -> Result<Vec<Transfer>, RepositoryError>;
    async fn find_by_date_range(&self, range: DateRange) -> Result<Vec<Transfer>, RepositoryError>;
    async fn list_all(&self) -> Result<Vec<Transfer>, RepositoryError>;
    /// Sum of transfer amounts into a credit account; zero when none match.
    async fn total_by_credit_account(
        &self,
        account_id: AccountId,
        range: Option<DateRange>,
    ) -> Result<Decimal, RepositoryError>;
    async fn delete(&self, id: TransferId) -> Result<(), RepositoryError>;
}

/// Ordered by creation time, newest first.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, RepositoryError>;
    async fn update(&self, user: &User) -> Result<User, RepositoryError>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    async fn find_by_role(&self, role: UserRole) -> Result<Vec<User>, RepositoryError>;
    async fn list_all(&self) -> Result<Vec<User>, RepositoryError>;
    async fn list_active(&self) -> Result<Vec<User>, RepositoryError>;
    async fn deactivate(&self, id: UserId) -> Result<(), RepositoryError>;
    async fn update_last_login(&self, id: UserId) -> Result<(), RepositoryError>;
    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), RepositoryError>;
    async fn delete(&self, id: UserId) -> Result<(), RepositoryError>;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound("Row not found".to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                RepositoryError::Serialization(err.to_string())
            }
            _ => RepositoryError::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}
