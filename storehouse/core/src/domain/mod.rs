// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Layer
//!
//! Entities, value objects and validation rules of the church ledger, plus
//! the repository contracts that the infrastructure layer implements.
//!
//! | Module | Aggregate / concern |
//! |--------|---------------------|
//! | [`account`] | Ledger accounts (soft-deleted only) |
//! | [`member`] | Contributing members |
//! | [`members_group`] | Member cohorts |
//! | [`transaction`] | Parent ledger entry |
//! | [`receipt`], [`expenditure`], [`transfer`] | Child records of a transaction |
//! | [`user`] | Login principals |
//! | [`validation`] | Pure format and strength rules |
//! | [`period`] | Inclusive date ranges |
//! | [`repository`] | Persistence contracts |
//! | [`config`] | Service configuration manifest |

/// Declares a UUID-backed identifier newtype with the usual conversions.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub uuid::Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(uuid::Uuid::parse_str(s)?))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_string(s)
            }
        }
    };
}

pub mod validation;
pub mod period;
pub mod account;
pub mod member;
pub mod members_group;
pub mod transaction;
pub mod receipt;
pub mod expenditure;
pub mod transfer;
pub mod user;
pub mod repository;
pub mod config;

pub use account::{Account, AccountId, AccountType, AccountView};
pub use expenditure::{Expenditure, ExpenditureId, ExpenditureView};
pub use member::{Member, MemberId, MemberView};
pub use members_group::{GroupId, GroupView, GroupWithMemberCount, MembersGroup};
pub use period::DateRange;
pub use receipt::{Receipt, ReceiptId, ReceiptView};
pub use transaction::{Transaction, TransactionId, TransactionType, TransactionView};
pub use transfer::{Transfer, TransferId, TransferView};
pub use user::{User, UserId, UserRole, UserView};
pub use validation::ValidationError;
