// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0
//! Service Errors
//!
//! Every application service returns [`ServiceError`]. Callers that only need
//! the broad category (the HTTP layer, the CLI) match on [`ErrorKind`] through
//! [`ServiceError::kind`].

use thiserror::Error;

use crate::domain::repository::RepositoryError;
use crate::domain::validation::ValidationError;
use crate::infrastructure::password::CredentialError;

/// Broad failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Unauthorized,
    Persistence,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("member not found: {0}")]
    MemberNotFound(String),

    #[error("members group not found: {0}")]
    GroupNotFound(String),

    #[error("transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("{entity} with name '{name}' already exists")]
    DuplicateName { entity: &'static str, name: String },

    #[error("member with phone number '{0}' already exists")]
    DuplicatePhone(String),

    #[error("{entity} with email '{email}' already exists")]
    DuplicateEmail { entity: &'static str, email: String },

    #[error("username '{0}' already exists")]
    DuplicateUsername(String),

    #[error("transaction with reference '{0}' already exists")]
    DuplicateReference(String),

    #[error("cannot delete group with {0} member(s)")]
    GroupNotEmpty(i64),

    #[error("cannot delete member referenced by {0} transaction(s)")]
    MemberHasTransactions(usize),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("user account is deactivated")]
    AccountDeactivated,

    #[error(transparent)]
    Repository(RepositoryError),

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::NotFound { .. }
            | ServiceError::AccountNotFound(_)
            | ServiceError::MemberNotFound(_)
            | ServiceError::GroupNotFound(_)
            | ServiceError::TransactionNotFound(_) => ErrorKind::NotFound,
            ServiceError::DuplicateName { .. }
            | ServiceError::DuplicatePhone(_)
            | ServiceError::DuplicateEmail { .. }
            | ServiceError::DuplicateUsername(_)
            | ServiceError::DuplicateReference(_)
            | ServiceError::GroupNotEmpty(_)
            | ServiceError::MemberHasTransactions(_) => ErrorKind::Conflict,
            ServiceError::InvalidCredentials | ServiceError::AccountDeactivated => {
                ErrorKind::Unauthorized
            }
            ServiceError::Repository(RepositoryError::NotFound(_)) => ErrorKind::NotFound,
            ServiceError::Repository(_) | ServiceError::Credential(_) => ErrorKind::Persistence,
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        ServiceError::Repository(err)
    }
}

/// Convert a repository `NotFound` raised by an update or delete into the
/// entity-specific service error; everything else passes through.
pub(crate) fn map_missing(entity: &'static str, id: impl ToString) -> impl FnOnce(RepositoryError) -> ServiceError {
    move |err| match err {
        RepositoryError::NotFound(_) => ServiceError::not_found(entity, id),
        other => ServiceError::Repository(other),
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            ServiceError::from(ValidationError::InvalidAmount(Decimal::ZERO)).kind(),
            ErrorKind::Validation
        );
        assert_eq!(ServiceError::AccountNotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(ServiceError::GroupNotEmpty(2).kind(), ErrorKind::Conflict);
        assert_eq!(ServiceError::InvalidCredentials.kind(), ErrorKind::Unauthorized);
        assert_eq!(ServiceError::AccountDeactivated.kind(), ErrorKind::Unauthorized);
        assert_eq!(
            ServiceError::from(RepositoryError::Database("down".into())).kind(),
            ErrorKind::Persistence
        );
        assert_eq!(
            ServiceError::from(RepositoryError::NotFound("row".into())).kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_validation_message_is_transparent() {
        let err = ServiceError::from(ValidationError::InvalidPhone("abc".into()));
        assert_eq!(err.to_string(), "invalid phone number format: 'abc'");
    }

    #[test]
    fn test_map_missing() {
        let err = map_missing("member", "42")(RepositoryError::NotFound("row".into()));
        assert!(matches!(err, ServiceError::NotFound { entity: "member", .. }));
        let err = map_missing("member", "42")(RepositoryError::Database("down".into()));
        assert!(matches!(err, ServiceError::Repository(RepositoryError::Database(_))));
    }
}
