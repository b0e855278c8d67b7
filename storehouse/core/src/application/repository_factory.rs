// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0
//! Repository Factory - Application Layer
//!
//! Creates concrete repository implementations for the configured storage
//! backend. The domain layer only sees the traits; this module is the one
//! place that names the in-memory and PostgreSQL types.

use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repository::{
    AccountRepository, ExpenditureRepository, MemberRepository, MembersGroupRepository,
    ReceiptRepository, StorageBackend, TransactionRepository, TransferRepository, UserRepository,
};
use crate::infrastructure::repositories::{
    InMemoryAccountRepository, InMemoryExpenditureRepository, InMemoryMemberRepository,
    InMemoryMembersGroupRepository, InMemoryReceiptRepository, InMemoryTransactionRepository,
    InMemoryTransferRepository, InMemoryUserRepository, PostgresAccountRepository,
    PostgresExpenditureRepository, PostgresMemberRepository, PostgresMembersGroupRepository,
    PostgresReceiptRepository, PostgresTransactionRepository, PostgresTransferRepository,
    PostgresUserRepository,
};

/// One handle per aggregate, all pointing at the same backend.
#[derive(Clone)]
pub struct Repositories {
    pub accounts: Arc<dyn AccountRepository>,
    pub members: Arc<dyn MemberRepository>,
    pub groups: Arc<dyn MembersGroupRepository>,
    pub transactions: Arc<dyn TransactionRepository>,
    pub receipts: Arc<dyn ReceiptRepository>,
    pub expenditures: Arc<dyn ExpenditureRepository>,
    pub transfers: Arc<dyn TransferRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    /// Process-local storage. The group repository shares the member table so
    /// that member counts stay consistent.
    pub fn in_memory() -> Self {
        let members = InMemoryMemberRepository::new();
        let groups = InMemoryMembersGroupRepository::with_members(&members);
        Self {
            accounts: Arc::new(InMemoryAccountRepository::new()),
            members: Arc::new(members),
            groups: Arc::new(groups),
            transactions: Arc::new(InMemoryTransactionRepository::new()),
            receipts: Arc::new(InMemoryReceiptRepository::new()),
            expenditures: Arc::new(InMemoryExpenditureRepository::new()),
            transfers: Arc::new(InMemoryTransferRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            accounts: Arc::new(PostgresAccountRepository::new(pool.clone())),
            members: Arc::new(PostgresMemberRepository::new(pool.clone())),
            groups: Arc::new(PostgresMembersGroupRepository::new(pool.clone())),
            transactions: Arc::new(PostgresTransactionRepository::new(pool.clone())),
            receipts: Arc::new(PostgresReceiptRepository::new(pool.clone())),
            expenditures: Arc::new(PostgresExpenditureRepository::new(pool.clone())),
            transfers: Arc::new(PostgresTransferRepository::new(pool.clone())),
            users: Arc::new(PostgresUserRepository::new(pool)),
        }
    }
}

/// Creates the repository set for the configured backend. `pool` is only
/// consulted for [`StorageBackend::PostgreSQL`]; without one the in-memory
/// set is returned.
pub fn create_repositories(backend: &StorageBackend, pool: Option<PgPool>) -> Repositories {
    match (backend, pool) {
        (StorageBackend::PostgreSQL(_), Some(pool)) => Repositories::postgres(pool),
        (StorageBackend::PostgreSQL(_), None) => {
            tracing::warn!("PostgreSQL backend selected without a pool, using in-memory storage");
            Repositories::in_memory()
        }
        (StorageBackend::InMemory, _) => Repositories::in_memory(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::member::Member;
    use crate::domain::members_group::MembersGroup;

    #[tokio::test]
    async fn test_in_memory_groups_see_members() {
        let repos = create_repositories(&StorageBackend::InMemory, None);
        let group = repos
            .groups
            .create(&MembersGroup::new("Choir".into(), None, "system".into()))
            .await
            .unwrap();
        repos
            .members
            .create(&Member::new(
                "Ann".into(),
                "0712000001".into(),
                None,
                None,
                Some(group.id),
                "system".into(),
            ))
            .await
            .unwrap();

        let counts = repos.groups.list_with_member_counts().await.unwrap();
        assert_eq!(counts[0].member_count, 1);
    }
}
