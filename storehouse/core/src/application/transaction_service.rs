// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

//! Transaction Service
//!
//! A transaction is the parent ledger event: a typed, positive amount drawn
//! against a debit account and optionally attributed to a member. Receipts,
//! expenditures and transfers are recorded against it separately.
//!
//! # Flow (create)
//!
//! 1. Type is one of `receipts`, `withdrawal`, `expenses`, `transfer`
//! 2. Amount is strictly positive
//! 3. Reference, when given, is at most 20 characters and unused
//! 4. Debit account exists (`AccountNotFound` otherwise)
//! 5. Member, when given, exists (`MemberNotFound` otherwise)
//! 6. Persist; the transaction date defaults to now

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::error::{map_missing, ServiceError, ServiceResult};
use crate::domain::account::AccountId;
use crate::domain::member::MemberId;
use crate::domain::period::DateRange;
use crate::domain::repository::{AccountRepository, MemberRepository, TransactionRepository};
use crate::domain::transaction::{Transaction, TransactionId, TransactionType, TransactionView};
use crate::domain::validation::{parse_id, validate_amount, validate_length};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(default)]
    pub transaction_ref: Option<String>,
    #[serde(default)]
    pub transaction_date: Option<DateTime<Utc>>,
    pub transaction_type: String,
    pub amount: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
    pub debit_account_id: String,
    #[serde(default)]
    pub member_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTransactionRequest {
    pub transaction_ref: Option<String>,
    pub transaction_date: Option<DateTime<Utc>>,
    pub transaction_type: Option<String>,
    pub amount: Option<Decimal>,
    pub notes: Option<String>,
    pub debit_account_id: Option<String>,
    /// `Some("")` detaches the member.
    pub member_id: Option<String>,
}

#[async_trait]
pub trait TransactionService: Send + Sync {
    async fn create(&self, request: CreateTransactionRequest, created_by: &str) -> ServiceResult<Transaction>;
    async fn update(&self, id: TransactionId, request: UpdateTransactionRequest) -> ServiceResult<Transaction>;
    async fn delete(&self, id: TransactionId) -> ServiceResult<()>;
    async fn get(&self, id: TransactionId) -> ServiceResult<Transaction>;
    /// Transaction with its debit account and member eagerly loaded.
    async fn get_detailed(&self, id: TransactionId) -> ServiceResult<TransactionView>;
    async fn find_by_reference(&self, reference: &str) -> ServiceResult<Transaction>;
    async fn list_by_account(&self, account_id: AccountId) -> ServiceResult<Vec<Transaction>>;
    async fn list_by_member(&self, member_id: MemberId) -> ServiceResult<Vec<Transaction>>;
    async fn list_by_type(&self, transaction_type: &str) -> ServiceResult<Vec<Transaction>>;
    async fn list_by_date_range(&self, range: DateRange) -> ServiceResult<Vec<Transaction>>;
    async fn list_all(&self) -> ServiceResult<Vec<Transaction>>;
}

pub struct StandardTransactionService {
    transactions: Arc<dyn TransactionRepository>,
    accounts: Arc<dyn AccountRepository>,
    members: Arc<dyn MemberRepository>,
}

impl StandardTransactionService {
    pub fn new(
        transactions: Arc<dyn TransactionRepository>,
        accounts: Arc<dyn AccountRepository>,
        members: Arc<dyn MemberRepository>,
    ) -> Self {
        Self {
            transactions,
            accounts,
            members,
        }
    }

    async fn resolve_account(&self, raw: &str) -> ServiceResult<AccountId> {
        let id: AccountId = parse_id("debit account id", raw)?;
        match self.accounts.find_by_id(id).await? {
            Some(_) => Ok(id),
            None => Err(ServiceError::AccountNotFound(raw.to_string())),
        }
    }

    async fn resolve_member(&self, raw: &str) -> ServiceResult<MemberId> {
        let id: MemberId = parse_id("member id", raw)?;
        match self.members.find_by_id(id).await? {
            Some(_) => Ok(id),
            None => Err(ServiceError::MemberNotFound(raw.to_string())),
        }
    }

    async fn ensure_reference_free(&self, reference: &str) -> ServiceResult<()> {
        validate_length("transaction reference", reference, Transaction::MAX_REFERENCE_LENGTH)?;
        if self.transactions.find_by_reference(reference).await?.is_some() {
            return Err(ServiceError::DuplicateReference(reference.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionService for StandardTransactionService {
    async fn create(&self, request: CreateTransactionRequest, created_by: &str) -> ServiceResult<Transaction> {
        let transaction_type = TransactionType::parse(&request.transaction_type)?;
        validate_amount(request.amount)?;

        let reference = request.transaction_ref.filter(|r| !r.trim().is_empty());
        if let Some(reference) = &reference {
            self.ensure_reference_free(reference).await?;
        }

        let debit_account_id = self.resolve_account(&request.debit_account_id).await?;
        let member_id = match request.member_id.filter(|m| !m.trim().is_empty()) {
            Some(raw) => Some(self.resolve_member(&raw).await?),
            None => None,
        };

        let tx = Transaction::new(
            reference,
            request.transaction_date,
            transaction_type,
            request.amount,
            request.notes,
            debit_account_id,
            member_id,
            created_by.to_string(),
        );
        let tx = self.transactions.create(&tx).await?;

        metrics::counter!("storehouse_records_created_total", "entity" => "transaction").increment(1);
        info!(
            transaction_id = %tx.id,
            transaction_type = %tx.transaction_type,
            amount = %tx.amount,
            "Transaction recorded"
        );
        Ok(tx)
    }

    async fn update(&self, id: TransactionId, request: UpdateTransactionRequest) -> ServiceResult<Transaction> {
        let mut tx = self.get(id).await?;

        if let Some(reference) = request.transaction_ref {
            if reference.trim().is_empty() {
                tx.reference = None;
            } else {
                if tx.reference.as_deref() != Some(reference.as_str()) {
                    self.ensure_reference_free(&reference).await?;
                }
                tx.reference = Some(reference);
            }
        }
        if let Some(date) = request.transaction_date {
            tx.transaction_date = date;
        }
        if let Some(raw) = request.transaction_type {
            tx.transaction_type = TransactionType::parse(&raw)?;
        }
        if let Some(amount) = request.amount {
            validate_amount(amount)?;
            tx.amount = amount;
        }
        if let Some(notes) = request.notes {
            tx.notes = Some(notes);
        }
        if let Some(raw) = request.debit_account_id {
            tx.debit_account_id = self.resolve_account(&raw).await?;
        }
        if let Some(raw) = request.member_id {
            tx.member_id = if raw.trim().is_empty() {
                None
            } else {
                Some(self.resolve_member(&raw).await?)
            };
        }

        let tx = self
            .transactions
            .update(&tx)
            .await
            .map_err(map_missing("transaction", id))?;
        info!(transaction_id = %id, "Transaction updated");
        Ok(tx)
    }

    async fn delete(&self, id: TransactionId) -> ServiceResult<()> {
        self.get(id).await?;
        self.transactions
            .delete(id)
            .await
            .map_err(map_missing("transaction", id))?;
        info!(transaction_id = %id, "Transaction deleted");
        Ok(())
    }

    async fn get(&self, id: TransactionId) -> ServiceResult<Transaction> {
        debug!("Fetching transaction {}", id);
        self.transactions
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("transaction", id))
    }

    async fn get_detailed(&self, id: TransactionId) -> ServiceResult<TransactionView> {
        let tx = self.get(id).await?;
        let account = self.accounts.find_by_id(tx.debit_account_id).await?;
        let member = match tx.member_id {
            Some(member_id) => self.members.find_by_id(member_id).await?,
            None => None,
        };
        Ok(TransactionView::from(&tx).with_relations(account.as_ref(), member.as_ref()))
    }

    async fn find_by_reference(&self, reference: &str) -> ServiceResult<Transaction> {
        self.transactions
            .find_by_reference(reference)
            .await?
            .ok_or_else(|| ServiceError::not_found("transaction", reference))
    }

    async fn list_by_account(&self, account_id: AccountId) -> ServiceResult<Vec<Transaction>> {
        Ok(self.transactions.find_by_account(account_id).await?)
    }

    async fn list_by_member(&self, member_id: MemberId) -> ServiceResult<Vec<Transaction>> {
        Ok(self.transactions.find_by_member(member_id).await?)
    }

    async fn list_by_type(&self, transaction_type: &str) -> ServiceResult<Vec<Transaction>> {
        let kind = TransactionType::parse(transaction_type)?;
        Ok(self.transactions.find_by_type(kind).await?)
    }

    async fn list_by_date_range(&self, range: DateRange) -> ServiceResult<Vec<Transaction>> {
        debug!(start = %range.start, end = %range.end, "Listing transactions in range");
        Ok(self.transactions.find_by_date_range(range).await?)
    }

    async fn list_all(&self) -> ServiceResult<Vec<Transaction>> {
        Ok(self.transactions.list_all().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::ErrorKind;
    use crate::domain::account::{Account, AccountType};
    use crate::domain::member::Member;
    use crate::domain::validation::ValidationError;
    use crate::infrastructure::repositories::{
        InMemoryAccountRepository, InMemoryMemberRepository, InMemoryTransactionRepository,
    };
    use chrono::Duration;

    struct Fixture {
        service: StandardTransactionService,
        account: Account,
        member: Member,
    }

    async fn fixture() -> Fixture {
        let accounts = Arc::new(InMemoryAccountRepository::new());
        let members = Arc::new(InMemoryMemberRepository::new());
        let account = accounts
            .create(&Account::new(
                "Main Bank".to_string(),
                AccountType::Bank,
                None,
                None,
                "system".to_string(),
            ))
            .await
            .unwrap();
        let member = members
            .create(&Member::new(
                "Grace".to_string(),
                "0712000001".to_string(),
                None,
                None,
                None,
                "system".to_string(),
            ))
            .await
            .unwrap();
        Fixture {
            service: StandardTransactionService::new(
                Arc::new(InMemoryTransactionRepository::new()),
                accounts,
                members,
            ),
            account,
            member,
        }
    }

    fn request(fx: &Fixture, amount: &str) -> CreateTransactionRequest {
        CreateTransactionRequest {
            transaction_ref: None,
            transaction_date: None,
            transaction_type: "receipts".to_string(),
            amount: amount.parse().unwrap(),
            notes: None,
            debit_account_id: fx.account.id.to_string(),
            member_id: Some(fx.member.id.to_string()),
        }
    }

    #[tokio::test]
    async fn test_amount_must_be_positive() {
        let fx = fixture().await;
        for bad in ["0", "-5"] {
            let err = fx.service.create(request(&fx, bad), "system").await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(ValidationError::InvalidAmount(_))));
        }

        let before = Utc::now();
        let tx = fx.service.create(request(&fx, "100.50"), "system").await.unwrap();
        assert_eq!(tx.amount, "100.50".parse::<Decimal>().unwrap());
        assert!(tx.transaction_date >= before - Duration::seconds(1));
        assert!(tx.transaction_date <= Utc::now() + Duration::seconds(1));
    }

    #[tokio::test]
    async fn test_invalid_type_rejected() {
        let fx = fixture().await;
        let mut req = request(&fx, "10");
        req.transaction_type = "Receipts".to_string();
        let err = fx.service.create(req, "system").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::InvalidTransactionType(_))
        ));
        assert_eq!(fx.service.list_by_type("refund").await.unwrap_err().kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_unknown_references_rejected() {
        let fx = fixture().await;
        let mut req = request(&fx, "10");
        req.debit_account_id = AccountId::new().to_string();
        let err = fx.service.create(req, "system").await.unwrap_err();
        assert!(matches!(err, ServiceError::AccountNotFound(_)));

        let mut req = request(&fx, "10");
        req.member_id = Some(MemberId::new().to_string());
        let err = fx.service.create(req, "system").await.unwrap_err();
        assert!(matches!(err, ServiceError::MemberNotFound(_)));

        let mut req = request(&fx, "10");
        req.debit_account_id = "not-a-uuid".to_string();
        assert_eq!(fx.service.create(req, "system").await.unwrap_err().kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_duplicate_reference() {
        let fx = fixture().await;
        let mut req = request(&fx, "10");
        req.transaction_ref = Some("RCPT-001".to_string());
        fx.service.create(req.clone(), "system").await.unwrap();
        let err = fx.service.create(req, "system").await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateReference(_)));
        assert!(fx.service.find_by_reference("RCPT-001").await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_member_id_detaches_member() {
        let fx = fixture().await;
        let tx = fx.service.create(request(&fx, "10"), "system").await.unwrap();
        assert_eq!(tx.member_id, Some(fx.member.id));

        let updated = fx
            .service
            .update(
                tx.id,
                UpdateTransactionRequest {
                    member_id: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.member_id, None);
        assert_eq!(updated.amount, tx.amount);
    }

    #[tokio::test]
    async fn test_detailed_view_and_lookups() {
        let fx = fixture().await;
        let tx = fx.service.create(request(&fx, "25"), "system").await.unwrap();

        let view = fx.service.get_detailed(tx.id).await.unwrap();
        assert_eq!(view.debit_account.map(|a| a.account_name).as_deref(), Some("Main Bank"));
        assert_eq!(view.member.map(|m| m.full_name).as_deref(), Some("Grace"));

        assert_eq!(fx.service.list_by_account(fx.account.id).await.unwrap().len(), 1);
        assert_eq!(fx.service.list_by_member(fx.member.id).await.unwrap().len(), 1);
        assert_eq!(fx.service.list_by_type("receipts").await.unwrap().len(), 1);
        assert!(fx.service.list_by_type("transfer").await.unwrap().is_empty());

        let range = DateRange::new(Utc::now() - Duration::hours(1), Utc::now() + Duration::hours(1)).unwrap();
        assert_eq!(fx.service.list_by_date_range(range).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let fx = fixture().await;
        let tx = fx.service.create(request(&fx, "25"), "system").await.unwrap();
        fx.service.delete(tx.id).await.unwrap();
        assert_eq!(fx.service.get(tx.id).await.unwrap_err().kind(), ErrorKind::NotFound);
        assert!(fx.service.list_all().await.unwrap().is_empty());
    }
}
