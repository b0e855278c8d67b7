// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! Infrastructure implementations of the repository contracts defined in
//! `crate::domain::repository`.
//!
//! # Available Implementations
//!
//! ## PostgreSQL Repositories
//!
//! Backed by a shared `sqlx::PgPool`, one module per aggregate
//! (`postgres_account`, `postgres_member`, ...).
//!
//! ## In-Memory Repositories
//!
//! `Arc<RwLock<HashMap>>` storage for development and tests. They mirror the
//! PostgreSQL behaviour that callers can observe: unique columns are enforced
//! on write, `update`/`delete` of a missing id is `NotFound`, listings come
//! back in the same order the SQL queries use.

pub mod postgres_account;
pub mod postgres_expenditure;
pub mod postgres_member;
pub mod postgres_members_group;
pub mod postgres_receipt;
pub mod postgres_transaction;
pub mod postgres_transfer;
pub mod postgres_user;

pub use postgres_account::PostgresAccountRepository;
pub use postgres_expenditure::PostgresExpenditureRepository;
pub use postgres_member::PostgresMemberRepository;
pub use postgres_members_group::PostgresMembersGroupRepository;
pub use postgres_receipt::PostgresReceiptRepository;
pub use postgres_transaction::PostgresTransactionRepository;
pub use postgres_transfer::PostgresTransferRepository;
pub use postgres_user::PostgresUserRepository;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::account::{Account, AccountId};
use crate::domain::expenditure::{Expenditure, ExpenditureId};
use crate::domain::member::{Member, MemberId};
use crate::domain::members_group::{GroupId, GroupView, GroupWithMemberCount, MembersGroup};
use crate::domain::period::DateRange;
use crate::domain::receipt::{Receipt, ReceiptId};
use crate::domain::repository::{
    AccountRepository, ExpenditureRepository, MemberRepository, MembersGroupRepository,
    ReceiptRepository, RepositoryError, TransactionRepository, TransferRepository,
    UserRepository,
};
use crate::domain::transaction::{Transaction, TransactionId, TransactionType};
use crate::domain::transfer::{Transfer, TransferId};
use crate::domain::user::{User, UserId, UserRole};

type Table<K, V> = Arc<RwLock<HashMap<K, V>>>;

fn read<K, V>(table: &Table<K, V>) -> Result<RwLockReadGuard<'_, HashMap<K, V>>, RepositoryError> {
    table
        .read()
        .map_err(|_| RepositoryError::Unknown("in-memory store lock poisoned".to_string()))
}

fn write<K, V>(table: &Table<K, V>) -> Result<RwLockWriteGuard<'_, HashMap<K, V>>, RepositoryError> {
    table
        .write()
        .map_err(|_| RepositoryError::Unknown("in-memory store lock poisoned".to_string()))
}

fn unique_violation(constraint: &str) -> RepositoryError {
    RepositoryError::Database(format!(
        "duplicate key value violates unique constraint \"{}\"",
        constraint
    ))
}

fn missing<K: std::fmt::Display>(entity: &str, id: K) -> RepositoryError {
    RepositoryError::NotFound(format!("{} {}", entity, id))
}

fn remove<K: Eq + Hash + std::fmt::Display + Copy, V>(
    table: &Table<K, V>,
    entity: &str,
    id: K,
) -> Result<(), RepositoryError> {
    write(table)?
        .remove(&id)
        .map(|_| ())
        .ok_or_else(|| missing(entity, id))
}

/// Store `row` under `id` if it already exists, stamping `updated_at`.
macro_rules! replace_existing {
    ($table:expr, $entity:expr, $row:expr) => {{
        let mut rows = write($table)?;
        if !rows.contains_key(&$row.id) {
            return Err(missing($entity, $row.id));
        }
        let mut stored = $row.clone();
        stored.updated_at = Utc::now();
        rows.insert(stored.id, stored.clone());
        Ok(stored)
    }};
}

fn newest_first<T, F>(mut rows: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> chrono::DateTime<Utc>,
{
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
    rows
}

// ============================================================================
// Accounts
// ============================================================================

#[derive(Clone, Default)]
pub struct InMemoryAccountRepository {
    accounts: Table<AccountId, Account>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: &Account) -> Result<Account, RepositoryError> {
        let mut accounts = write(&self.accounts)?;
        if accounts.values().any(|a| a.name == account.name) {
            return Err(unique_violation("accounts_account_name_key"));
        }
        accounts.insert(account.id, account.clone());
        Ok(account.clone())
    }

    async fn update(&self, account: &Account) -> Result<Account, RepositoryError> {
        if read(&self.accounts)?
            .values()
            .any(|a| a.id != account.id && a.name == account.name)
        {
            return Err(unique_violation("accounts_account_name_key"));
        }
        replace_existing!(&self.accounts, "account", account)
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        Ok(read(&self.accounts)?.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Account>, RepositoryError> {
        Ok(read(&self.accounts)?.values().find(|a| a.name == name).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Account>, RepositoryError> {
        let mut accounts: Vec<Account> = read(&self.accounts)?.values().cloned().collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(accounts)
    }

    async fn deactivate(&self, id: AccountId) -> Result<(), RepositoryError> {
        let mut accounts = write(&self.accounts)?;
        let account = accounts.get_mut(&id).ok_or_else(|| missing("account", id))?;
        account.deactivate();
        Ok(())
    }
}

// ============================================================================
// Members
// ============================================================================

#[derive(Clone, Default)]
pub struct InMemoryMemberRepository {
    members: Table<MemberId, Member>,
}

impl InMemoryMemberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(rows: impl Iterator<Item = Member>) -> Vec<Member> {
        let mut rows: Vec<Member> = rows.collect();
        rows.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        rows
    }

    fn check_unique(rows: &HashMap<MemberId, Member>, member: &Member) -> Result<(), RepositoryError> {
        for other in rows.values().filter(|m| m.id != member.id) {
            if other.phone_number == member.phone_number {
                return Err(unique_violation("members_phone_number_key"));
            }
            if member.email.is_some() && other.email == member.email {
                return Err(unique_violation("members_email_key"));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn create(&self, member: &Member) -> Result<Member, RepositoryError> {
        let mut members = write(&self.members)?;
        Self::check_unique(&members, member)?;
        members.insert(member.id, member.clone());
        Ok(member.clone())
    }

    async fn update(&self, member: &Member) -> Result<Member, RepositoryError> {
        Self::check_unique(&*read(&self.members)?, member)?;
        replace_existing!(&self.members, "member", member)
    }

    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>, RepositoryError> {
        Ok(read(&self.members)?.get(&id).cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Member>, RepositoryError> {
        Ok(read(&self.members)?
            .values()
            .find(|m| m.phone_number == phone)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, RepositoryError> {
        Ok(read(&self.members)?
            .values()
            .find(|m| m.email.as_deref() == Some(email))
            .cloned())
    }

    async fn find_by_group(&self, group_id: GroupId) -> Result<Vec<Member>, RepositoryError> {
        let members = read(&self.members)?;
        Ok(Self::sorted(
            members.values().filter(|m| m.group_id == Some(group_id)).cloned(),
        ))
    }

    async fn list_all(&self) -> Result<Vec<Member>, RepositoryError> {
        Ok(Self::sorted(read(&self.members)?.values().cloned()))
    }

    async fn search(&self, term: &str) -> Result<Vec<Member>, RepositoryError> {
        let members = read(&self.members)?;
        Ok(Self::sorted(
            members.values().filter(|m| m.matches_search(term)).cloned(),
        ))
    }

    async fn count_by_group(&self, group_id: GroupId) -> Result<i64, RepositoryError> {
        Ok(read(&self.members)?
            .values()
            .filter(|m| m.group_id == Some(group_id))
            .count() as i64)
    }

    async fn delete(&self, id: MemberId) -> Result<(), RepositoryError> {
        remove(&self.members, "member", id)
    }
}

// ============================================================================
// Members Groups
// ============================================================================

/// Member counts are read from the member store this repository is linked
/// to; [`InMemoryMembersGroupRepository::new`] links an empty one.
#[derive(Clone, Default)]
pub struct InMemoryMembersGroupRepository {
    groups: Table<GroupId, MembersGroup>,
    members: Table<MemberId, Member>,
}

impl InMemoryMembersGroupRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_members(members: &InMemoryMemberRepository) -> Self {
        Self {
            groups: Table::default(),
            members: members.members.clone(),
        }
    }
}

#[async_trait]
impl MembersGroupRepository for InMemoryMembersGroupRepository {
    async fn create(&self, group: &MembersGroup) -> Result<MembersGroup, RepositoryError> {
        let mut groups = write(&self.groups)?;
        if groups.values().any(|g| g.name == group.name) {
            return Err(unique_violation("members_groups_group_name_key"));
        }
        groups.insert(group.id, group.clone());
        Ok(group.clone())
    }

    async fn update(&self, group: &MembersGroup) -> Result<MembersGroup, RepositoryError> {
        if read(&self.groups)?
            .values()
            .any(|g| g.id != group.id && g.name == group.name)
        {
            return Err(unique_violation("members_groups_group_name_key"));
        }
        replace_existing!(&self.groups, "members group", group)
    }

    async fn find_by_id(&self, id: GroupId) -> Result<Option<MembersGroup>, RepositoryError> {
        Ok(read(&self.groups)?.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<MembersGroup>, RepositoryError> {
        Ok(read(&self.groups)?.values().find(|g| g.name == name).cloned())
    }

    async fn list_all(&self) -> Result<Vec<MembersGroup>, RepositoryError> {
        let mut groups: Vec<MembersGroup> = read(&self.groups)?.values().cloned().collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }

    async fn list_with_member_counts(&self) -> Result<Vec<GroupWithMemberCount>, RepositoryError> {
        let groups = self.list_all().await?;
        let members = read(&self.members)?;
        Ok(groups
            .iter()
            .map(|group| GroupWithMemberCount {
                group: GroupView::from(group),
                member_count: members
                    .values()
                    .filter(|m| m.group_id == Some(group.id))
                    .count() as i64,
            })
            .collect())
    }

    async fn delete(&self, id: GroupId) -> Result<(), RepositoryError> {
        remove(&self.groups, "members group", id)
    }
}

// ============================================================================
// Transactions
// ============================================================================

#[derive(Clone, Default)]
pub struct InMemoryTransactionRepository {
    transactions: Table<TransactionId, Transaction>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn select<P>(&self, predicate: P) -> Result<Vec<Transaction>, RepositoryError>
    where
        P: Fn(&Transaction) -> bool,
    {
        let rows = read(&self.transactions)?
            .values()
            .filter(|t| predicate(t))
            .cloned()
            .collect();
        Ok(newest_first(rows, |t| t.transaction_date))
    }

    fn check_unique(
        rows: &HashMap<TransactionId, Transaction>,
        tx: &Transaction,
    ) -> Result<(), RepositoryError> {
        if tx.reference.is_some()
            && rows
                .values()
                .any(|t| t.id != tx.id && t.reference == tx.reference)
        {
            return Err(unique_violation("transactions_transaction_ref_key"));
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn create(&self, tx: &Transaction) -> Result<Transaction, RepositoryError> {
        let mut rows = write(&self.transactions)?;
        Self::check_unique(&rows, tx)?;
        rows.insert(tx.id, tx.clone());
        Ok(tx.clone())
    }

    async fn update(&self, tx: &Transaction) -> Result<Transaction, RepositoryError> {
        Self::check_unique(&*read(&self.transactions)?, tx)?;
        replace_existing!(&self.transactions, "transaction", tx)
    }

    async fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, RepositoryError> {
        Ok(read(&self.transactions)?.get(&id).cloned())
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Transaction>, RepositoryError> {
        Ok(read(&self.transactions)?
            .values()
            .find(|t| t.reference.as_deref() == Some(reference))
            .cloned())
    }

    async fn find_by_account(&self, account_id: AccountId) -> Result<Vec<Transaction>, RepositoryError> {
        self.select(|t| t.debit_account_id == account_id)
    }

    async fn find_by_member(&self, member_id: MemberId) -> Result<Vec<Transaction>, RepositoryError> {
        self.select(|t| t.member_id == Some(member_id))
    }

    async fn find_by_type(&self, kind: TransactionType) -> Result<Vec<Transaction>, RepositoryError> {
        self.select(|t| t.transaction_type == kind)
    }

    async fn find_by_date_range(&self, range: DateRange) -> Result<Vec<Transaction>, RepositoryError> {
        self.select(|t| range.contains(t.transaction_date))
    }

    async fn list_all(&self) -> Result<Vec<Transaction>, RepositoryError> {
        self.select(|_| true)
    }

    async fn delete(&self, id: TransactionId) -> Result<(), RepositoryError> {
        remove(&self.transactions, "transaction", id)
    }
}

// ============================================================================
// Receipts
// ============================================================================

#[derive(Clone, Default)]
pub struct InMemoryReceiptRepository {
    receipts: Table<ReceiptId, Receipt>,
}

impl InMemoryReceiptRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn select<P>(&self, predicate: P) -> Result<Vec<Receipt>, RepositoryError>
    where
        P: Fn(&Receipt) -> bool,
    {
        let rows = read(&self.receipts)?
            .values()
            .filter(|r| predicate(r))
            .cloned()
            .collect();
        Ok(newest_first(rows, |r| r.created_at))
    }
}

#[async_trait]
impl ReceiptRepository for InMemoryReceiptRepository {
    async fn create(&self, receipt: &Receipt) -> Result<Receipt, RepositoryError> {
        write(&self.receipts)?.insert(receipt.id, receipt.clone());
        Ok(receipt.clone())
    }

    async fn update(&self, receipt: &Receipt) -> Result<Receipt, RepositoryError> {
        replace_existing!(&self.receipts, "receipt", receipt)
    }

    async fn find_by_id(&self, id: ReceiptId) -> Result<Option<Receipt>, RepositoryError> {
        Ok(read(&self.receipts)?.get(&id).cloned())
    }

    async fn find_by_transaction(&self, tx_id: TransactionId) -> Result<Vec<Receipt>, RepositoryError> {
        self.select(|r| r.transaction_id == tx_id)
    }

    async fn find_by_account(&self, account_id: AccountId) -> Result<Vec<Receipt>, RepositoryError> {
        self.select(|r| r.income_account_id == account_id)
    }

    async fn find_by_date_range(&self, range: DateRange) -> Result<Vec<Receipt>, RepositoryError> {
        self.select(|r| range.contains(r.created_at))
    }

    async fn list_all(&self) -> Result<Vec<Receipt>, RepositoryError> {
        self.select(|_| true)
    }

    async fn total_by_account(
        &self,
        account_id: AccountId,
        range: Option<DateRange>,
    ) -> Result<Decimal, RepositoryError> {
        Ok(read(&self.receipts)?
            .values()
            .filter(|r| r.income_account_id == account_id)
            .filter(|r| range.map_or(true, |range| range.contains(r.created_at)))
            .map(|r| r.amount)
            .sum())
    }

    async fn delete(&self, id: ReceiptId) -> Result<(), RepositoryError> {
        remove(&self.receipts, "receipt", id)
    }
}

// ============================================================================
// Expenditures
// ============================================================================

#[derive(Clone, Default)]
pub struct InMemoryExpenditureRepository {
    expenditures: Table<ExpenditureId, Expenditure>,
}

impl InMemoryExpenditureRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn select<P>(&self, predicate: P) -> Result<Vec<Expenditure>, RepositoryError>
    where
        P: Fn(&Expenditure) -> bool,
    {
        let rows = read(&self.expenditures)?
            .values()
            .filter(|e| predicate(e))
            .cloned()
            .collect();
        Ok(newest_first(rows, |e| e.created_at))
    }
}

#[async_trait]
impl ExpenditureRepository for InMemoryExpenditureRepository {
    async fn create(&self, expenditure: &Expenditure) -> Result<Expenditure, RepositoryError> {
        write(&self.expenditures)?.insert(expenditure.id, expenditure.clone());
        Ok(expenditure.clone())
    }

    async fn update(&self, expenditure: &Expenditure) -> Result<Expenditure, RepositoryError> {
        replace_existing!(&self.expenditures, "expenditure", expenditure)
    }

    async fn find_by_id(&self, id: ExpenditureId) -> Result<Option<Expenditure>, RepositoryError> {
        Ok(read(&self.expenditures)?.get(&id).cloned())
    }

    async fn find_by_transaction(&self, tx_id: TransactionId) -> Result<Vec<Expenditure>, RepositoryError> {
        self.select(|e| e.transaction_id == tx_id)
    }

    async fn find_by_account(&self, account_id: AccountId) -> Result<Vec<Expenditure>, RepositoryError> {
        self.select(|e| e.bank_account_id == account_id)
    }

    async fn find_by_date_range(&self, range: DateRange) -> Result<Vec<Expenditure>, RepositoryError> {
        self.select(|e| range.contains(e.created_at))
    }

    async fn list_all(&self) -> Result<Vec<Expenditure>, RepositoryError> {
        self.select(|_| true)
    }

    async fn delete(&self, id: ExpenditureId) -> Result<(), RepositoryError> {
        remove(&self.expenditures, "expenditure", id)
    }
}

// ============================================================================
// Transfers
// ============================================================================

#[derive(Clone, Default)]
pub struct InMemoryTransferRepository {
    transfers: Table<TransferId, Transfer>,
}

impl InMemoryTransferRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn select<P>(&self, predicate: P) -> Result<Vec<Transfer>, RepositoryError>
    where
        P: Fn(&Transfer) -> bool,
    {
        let rows = read(&self.transfers)?
            .values()
            .filter(|t| predicate(t))
            .cloned()
            .collect();
        Ok(newest_first(rows, |t| t.created_at))
    }
}

#[async_trait]
impl TransferRepository for InMemoryTransferRepository {
    async fn create(&self, transfer: &Transfer) -> Result<Transfer, RepositoryError> {
        write(&self.transfers)?.insert(transfer.id, transfer.clone());
        Ok(transfer.clone())
    }

    async fn update(&self, transfer: &Transfer) -> Result<Transfer, RepositoryError> {
        replace_existing!(&self.transfers, "transfer", transfer)
    }

    async fn find_by_id(&self, id: TransferId) -> Result<Option<Transfer>, RepositoryError> {
        Ok(read(&self.transfers)?.get(&id).cloned())
    }

    async fn find_by_transaction(&self, tx_id: TransactionId) -> Result<Vec<Transfer>, RepositoryError> {
        self.select(|t| t.transaction_id == tx_id)
    }

    async fn find_by_credit_account(&self, account_id: AccountId) -> Result<Vec<Transfer>, RepositoryError> {
        self.select(|t| t.credit_account_id == account_id)
    }

    async fn find_by_date_range(&self, range: DateRange) -> Result<Vec<Transfer>, RepositoryError> {
        self.select(|t| range.contains(t.created_at))
    }

    async fn list_all(&self) -> Result<Vec<Transfer>, RepositoryError> {
        self.select(|_| true)
    }

    async fn total_by_credit_account(
        &self,
        account_id: AccountId,
        range: Option<DateRange>,
    ) -> Result<Decimal, RepositoryError> {
        Ok(read(&self.transfers)?
            .values()
            .filter(|t| t.credit_account_id == account_id)
            .filter(|t| range.map_or(true, |range| range.contains(t.created_at)))
            .map(|t| t.amount)
            .sum())
    }

    async fn delete(&self, id: TransferId) -> Result<(), RepositoryError> {
        remove(&self.transfers, "transfer", id)
    }
}

// ============================================================================
// Users
// ============================================================================

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Table<UserId, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn select<P>(&self, predicate: P) -> Result<Vec<User>, RepositoryError>
    where
        P: Fn(&User) -> bool,
    {
        let rows = read(&self.users)?
            .values()
            .filter(|u| predicate(u))
            .cloned()
            .collect();
        Ok(newest_first(rows, |u| u.created_at))
    }

    fn check_unique(rows: &HashMap<UserId, User>, user: &User) -> Result<(), RepositoryError> {
        for other in rows.values().filter(|u| u.id != user.id) {
            if other.username == user.username {
                return Err(unique_violation("users_username_key"));
            }
            if other.email == user.email {
                return Err(unique_violation("users_email_key"));
            }
        }
        Ok(())
    }

    fn modify<F>(&self, id: UserId, change: F) -> Result<(), RepositoryError>
    where
        F: FnOnce(&mut User),
    {
        let mut users = write(&self.users)?;
        let user = users.get_mut(&id).ok_or_else(|| missing("user", id))?;
        change(user);
        user.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<User, RepositoryError> {
        let mut users = write(&self.users)?;
        Self::check_unique(&users, user)?;
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> Result<User, RepositoryError> {
        Self::check_unique(&*read(&self.users)?, user)?;
        replace_existing!(&self.users, "user", user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(read(&self.users)?.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(read(&self.users)?
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(read(&self.users)?.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_role(&self, role: UserRole) -> Result<Vec<User>, RepositoryError> {
        self.select(|u| u.role == role)
    }

    async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        self.select(|_| true)
    }

    async fn list_active(&self) -> Result<Vec<User>, RepositoryError> {
        self.select(|u| u.is_active)
    }

    async fn deactivate(&self, id: UserId) -> Result<(), RepositoryError> {
        self.modify(id, |u| u.is_active = false)
    }

    async fn update_last_login(&self, id: UserId) -> Result<(), RepositoryError> {
        self.modify(id, |u| u.last_login = Some(Utc::now()))
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), RepositoryError> {
        self.modify(id, |u| u.password_hash = password_hash.to_string())
    }

    async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        remove(&self.users, "user", id)
    }
}
