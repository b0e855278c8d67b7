// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0
//! Service wiring.
//!
//! Builds every `Standard*Service` from one [`Repositories`] set. The HTTP
//! layer holds a clone of [`Services`] as its router state.

use std::sync::Arc;

use crate::application::account_service::{AccountService, StandardAccountService};
use crate::application::expenditure_service::{ExpenditureService, StandardExpenditureService};
use crate::application::member_service::{MemberService, StandardMemberService};
use crate::application::members_group_service::{MembersGroupService, StandardMembersGroupService};
use crate::application::receipt_service::{ReceiptService, StandardReceiptService};
use crate::application::repository_factory::Repositories;
use crate::application::transaction_service::{StandardTransactionService, TransactionService};
use crate::application::transfer_service::{StandardTransferService, TransferService};
use crate::application::user_service::{StandardUserService, UserService};
use crate::infrastructure::password::{Argon2CredentialHasher, CredentialHasher};

#[derive(Clone)]
pub struct Services {
    pub accounts: Arc<dyn AccountService>,
    pub members: Arc<dyn MemberService>,
    pub groups: Arc<dyn MembersGroupService>,
    pub transactions: Arc<dyn TransactionService>,
    pub receipts: Arc<dyn ReceiptService>,
    pub expenditures: Arc<dyn ExpenditureService>,
    pub transfers: Arc<dyn TransferService>,
    pub users: Arc<dyn UserService>,
}

impl Services {
    pub fn new(repos: &Repositories) -> Self {
        Self::with_hasher(repos, Arc::new(Argon2CredentialHasher::new()))
    }

    pub fn with_hasher(repos: &Repositories, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            accounts: Arc::new(StandardAccountService::new(repos.accounts.clone())),
            members: Arc::new(StandardMemberService::new(
                repos.members.clone(),
                repos.groups.clone(),
                repos.transactions.clone(),
            )),
            groups: Arc::new(StandardMembersGroupService::new(
                repos.groups.clone(),
                repos.members.clone(),
            )),
            transactions: Arc::new(StandardTransactionService::new(
                repos.transactions.clone(),
                repos.accounts.clone(),
                repos.members.clone(),
            )),
            receipts: Arc::new(StandardReceiptService::new(
                repos.receipts.clone(),
                repos.transactions.clone(),
                repos.accounts.clone(),
            )),
            expenditures: Arc::new(StandardExpenditureService::new(
                repos.expenditures.clone(),
                repos.transactions.clone(),
                repos.accounts.clone(),
            )),
            transfers: Arc::new(StandardTransferService::new(
                repos.transfers.clone(),
                repos.transactions.clone(),
                repos.accounts.clone(),
            )),
            users: Arc::new(StandardUserService::new(repos.users.clone(), hasher)),
        }
    }

    /// Fully in-memory service set.
    pub fn in_memory() -> Self {
        Self::new(&Repositories::in_memory())
    }
}
