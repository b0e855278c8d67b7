// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

//! Account Service
//!
//! Application service for ledger accounts.
//!
//! # Flow (create)
//!
//! 1. Name is required and at most 100 characters
//! 2. Account type must be one of the five literal values
//! 3. No other account may already use the name (exact match)
//! 4. Persist with `is_active = true`
//!
//! Accounts are never hard-deleted; `deactivate` is the only removal path.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::error::{map_missing, ServiceError, ServiceResult};
use crate::domain::account::{Account, AccountId, AccountType};
use crate::domain::repository::AccountRepository;
use crate::domain::validation::{validate_length, validate_local_share, validate_required};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccountRequest {
    pub account_name: String,
    pub account_type: String,
    #[serde(default)]
    pub local_share: Option<Decimal>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Fields left as `None` are not touched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAccountRequest {
    pub account_name: Option<String>,
    pub account_type: Option<String>,
    pub local_share: Option<Decimal>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

#[async_trait]
pub trait AccountService: Send + Sync {
    async fn create(&self, request: CreateAccountRequest, created_by: &str) -> ServiceResult<Account>;
    async fn update(&self, id: AccountId, request: UpdateAccountRequest) -> ServiceResult<Account>;
    /// Soft delete. Succeeds again on an already inactive account.
    async fn deactivate(&self, id: AccountId) -> ServiceResult<()>;
    async fn get(&self, id: AccountId) -> ServiceResult<Account>;
    async fn list_all(&self) -> ServiceResult<Vec<Account>>;
}

pub struct StandardAccountService {
    accounts: Arc<dyn AccountRepository>,
}

impl StandardAccountService {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    fn validate_name(name: &str) -> ServiceResult<()> {
        validate_required("account name", name)?;
        validate_length("account name", name, Account::MAX_NAME_LENGTH)?;
        Ok(())
    }

    async fn ensure_name_free(&self, name: &str, except: Option<AccountId>) -> ServiceResult<()> {
        match self.accounts.find_by_name(name).await? {
            Some(existing) if Some(existing.id) != except => Err(ServiceError::DuplicateName {
                entity: "account",
                name: name.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl AccountService for StandardAccountService {
    async fn create(&self, request: CreateAccountRequest, created_by: &str) -> ServiceResult<Account> {
        Self::validate_name(&request.account_name)?;
        let account_type = AccountType::parse(&request.account_type)?;
        if let Some(share) = request.local_share {
            validate_local_share(share)?;
        }
        self.ensure_name_free(&request.account_name, None).await?;

        let account = Account::new(
            request.account_name,
            account_type,
            request.local_share,
            request.notes,
            created_by.to_string(),
        );
        let account = self.accounts.create(&account).await?;

        metrics::counter!("storehouse_records_created_total", "entity" => "account").increment(1);
        info!(account_id = %account.id, name = %account.name, "Account created");
        Ok(account)
    }

    async fn update(&self, id: AccountId, request: UpdateAccountRequest) -> ServiceResult<Account> {
        let mut account = self.get(id).await?;

        if let Some(name) = request.account_name {
            Self::validate_name(&name)?;
            if name != account.name {
                self.ensure_name_free(&name, Some(id)).await?;
            }
            account.name = name;
        }
        if let Some(raw) = request.account_type {
            account.account_type = AccountType::parse(&raw)?;
        }
        if let Some(share) = request.local_share {
            validate_local_share(share)?;
            account.local_share = Some(share);
        }
        if let Some(notes) = request.notes {
            account.notes = Some(notes);
        }
        if let Some(active) = request.is_active {
            account.is_active = active;
        }

        let account = self
            .accounts
            .update(&account)
            .await
            .map_err(map_missing("account", id))?;
        info!(account_id = %id, "Account updated");
        Ok(account)
    }

    async fn deactivate(&self, id: AccountId) -> ServiceResult<()> {
        self.get(id).await?;
        self.accounts
            .deactivate(id)
            .await
            .map_err(map_missing("account", id))?;
        info!(account_id = %id, "Account deactivated");
        Ok(())
    }

    async fn get(&self, id: AccountId) -> ServiceResult<Account> {
        debug!("Fetching account {}", id);
        self.accounts
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("account", id))
    }

    async fn list_all(&self) -> ServiceResult<Vec<Account>> {
        Ok(self.accounts.list_all().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::ErrorKind;
    use crate::domain::validation::ValidationError;
    use crate::infrastructure::repositories::InMemoryAccountRepository;

    fn service() -> StandardAccountService {
        StandardAccountService::new(Arc::new(InMemoryAccountRepository::new()))
    }

    fn request(name: &str, account_type: &str) -> CreateAccountRequest {
        CreateAccountRequest {
            account_name: name.to_string(),
            account_type: account_type.to_string(),
            local_share: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let svc = service();
        let created = svc.create(request("Main Bank", "Bank"), "treasurer").await.unwrap();
        assert!(!created.id.0.is_nil());
        assert!(created.is_active);
        assert_eq!(created.created_by, "treasurer");

        let fetched = svc.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_liability_literal_accepted() {
        let svc = service();
        let created = svc.create(request("Loans", "liability"), "system").await.unwrap();
        assert_eq!(created.account_type, AccountType::Liability);
    }

    #[tokio::test]
    async fn test_invalid_type_rejected() {
        let svc = service();
        let err = svc.create(request("Petty Cash", "Cash"), "system").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::InvalidAccountType(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_name_is_conflict() {
        let svc = service();
        svc.create(request("Tithes", "Income"), "system").await.unwrap();
        let err = svc.create(request("Tithes", "Income"), "system").await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateName { .. }));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_blank_and_long_names_rejected() {
        let svc = service();
        assert_eq!(
            svc.create(request("  ", "Bank"), "system").await.unwrap_err().kind(),
            ErrorKind::Validation
        );
        let long = "x".repeat(Account::MAX_NAME_LENGTH + 1);
        assert_eq!(
            svc.create(request(&long, "Bank"), "system").await.unwrap_err().kind(),
            ErrorKind::Validation
        );
    }

    #[tokio::test]
    async fn test_local_share_outside_fraction_rejected() {
        let svc = service();
        let mut req = request("Conference Levy", "liability");
        req.local_share = Some(Decimal::TEN);
        let err = svc.create(req, "system").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::InvalidLocalShare(_))
        ));

        let mut req = request("Conference Levy", "liability");
        req.local_share = Some("0.25".parse().unwrap());
        let account = svc.create(req, "system").await.unwrap();

        let update = UpdateAccountRequest {
            local_share: Some("1.5".parse().unwrap()),
            ..Default::default()
        };
        assert_eq!(
            svc.update(account.id, update).await.unwrap_err().kind(),
            ErrorKind::Validation
        );
    }

    #[tokio::test]
    async fn test_deactivate_twice_succeeds() {
        let svc = service();
        let account = svc.create(request("Missions", "Expense"), "system").await.unwrap();
        svc.deactivate(account.id).await.unwrap();
        svc.deactivate(account.id).await.unwrap();
        assert!(!svc.get(account.id).await.unwrap().is_active);
    }

    #[tokio::test]
    async fn test_deactivate_unknown_is_not_found() {
        let svc = service();
        let err = svc.deactivate(AccountId::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_partial_update_only_touches_supplied_fields() {
        let svc = service();
        let account = svc.create(request("Building Fund", "Asset"), "system").await.unwrap();
        let updated = svc
            .update(
                account.id,
                UpdateAccountRequest {
                    notes: Some("phase two".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.notes.as_deref(), Some("phase two"));
        assert_eq!(updated.name, account.name);
        assert_eq!(updated.account_type, account.account_type);
        assert_eq!(updated.is_active, account.is_active);
        assert!(updated.updated_at >= account.updated_at);
    }

    #[tokio::test]
    async fn test_rename_to_taken_name_is_conflict() {
        let svc = service();
        svc.create(request("Welfare", "Expense"), "system").await.unwrap();
        let other = svc.create(request("Youth", "Expense"), "system").await.unwrap();
        let err = svc
            .update(
                other.id,
                UpdateAccountRequest {
                    account_name: Some("Welfare".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateName { .. }));
    }
}
