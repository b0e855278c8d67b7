// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

//! Expenditure Service
//!
//! Spending recorded against a parent transaction and paid out of a bank
//! account. Particulars are required and at most 255 characters.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::error::{map_missing, ServiceError, ServiceResult};
use crate::domain::account::AccountId;
use crate::domain::expenditure::{Expenditure, ExpenditureId, ExpenditureView};
use crate::domain::period::DateRange;
use crate::domain::repository::{AccountRepository, ExpenditureRepository, TransactionRepository};
use crate::domain::transaction::TransactionId;
use crate::domain::validation::{parse_id, validate_amount, validate_length, validate_required};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateExpenditureRequest {
    pub transaction_id: String,
    pub particulars: String,
    pub bank_account_id: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateExpenditureRequest {
    pub particulars: Option<String>,
    pub bank_account_id: Option<String>,
    pub amount: Option<Decimal>,
}

#[async_trait]
pub trait ExpenditureService: Send + Sync {
    async fn create(&self, request: CreateExpenditureRequest) -> ServiceResult<Expenditure>;
    async fn update(&self, id: ExpenditureId, request: UpdateExpenditureRequest) -> ServiceResult<Expenditure>;
    async fn delete(&self, id: ExpenditureId) -> ServiceResult<()>;
    async fn get(&self, id: ExpenditureId) -> ServiceResult<Expenditure>;
    async fn get_detailed(&self, id: ExpenditureId) -> ServiceResult<ExpenditureView>;
    async fn list_all(&self) -> ServiceResult<Vec<Expenditure>>;
    async fn list_by_transaction(&self, tx_id: TransactionId) -> ServiceResult<Vec<Expenditure>>;
    async fn list_by_account(&self, account_id: AccountId) -> ServiceResult<Vec<Expenditure>>;
    async fn list_by_date_range(&self, range: DateRange) -> ServiceResult<Vec<Expenditure>>;
}

pub struct StandardExpenditureService {
    expenditures: Arc<dyn ExpenditureRepository>,
    transactions: Arc<dyn TransactionRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl StandardExpenditureService {
    pub fn new(
        expenditures: Arc<dyn ExpenditureRepository>,
        transactions: Arc<dyn TransactionRepository>,
        accounts: Arc<dyn AccountRepository>,
    ) -> Self {
        Self {
            expenditures,
            transactions,
            accounts,
        }
    }

    fn validate_particulars(particulars: &str) -> ServiceResult<()> {
        validate_required("particulars", particulars)?;
        validate_length("particulars", particulars, Expenditure::MAX_PARTICULARS_LENGTH)?;
        Ok(())
    }

    async fn resolve_transaction(&self, raw: &str) -> ServiceResult<TransactionId> {
        let id: TransactionId = parse_id("transaction id", raw)?;
        match self.transactions.find_by_id(id).await? {
            Some(_) => Ok(id),
            None => Err(ServiceError::TransactionNotFound(raw.to_string())),
        }
    }

    async fn resolve_account(&self, raw: &str) -> ServiceResult<AccountId> {
        let id: AccountId = parse_id("bank account id", raw)?;
        match self.accounts.find_by_id(id).await? {
            Some(_) => Ok(id),
            None => Err(ServiceError::AccountNotFound(raw.to_string())),
        }
    }
}

#[async_trait]
impl ExpenditureService for StandardExpenditureService {
    async fn create(&self, request: CreateExpenditureRequest) -> ServiceResult<Expenditure> {
        Self::validate_particulars(&request.particulars)?;
        validate_amount(request.amount)?;
        let bank_account_id = self.resolve_account(&request.bank_account_id).await?;
        let transaction_id = self.resolve_transaction(&request.transaction_id).await?;

        let expenditure = Expenditure::new(
            transaction_id,
            request.particulars,
            bank_account_id,
            request.amount,
        );
        let expenditure = self.expenditures.create(&expenditure).await?;

        metrics::counter!("storehouse_records_created_total", "entity" => "expenditure").increment(1);
        info!(
            expenditure_id = %expenditure.id,
            transaction_id = %expenditure.transaction_id,
            amount = %expenditure.amount,
            "Expenditure recorded"
        );
        Ok(expenditure)
    }

    async fn update(&self, id: ExpenditureId, request: UpdateExpenditureRequest) -> ServiceResult<Expenditure> {
        let mut expenditure = self.get(id).await?;

        if let Some(particulars) = request.particulars {
            Self::validate_particulars(&particulars)?;
            expenditure.particulars = particulars;
        }
        if let Some(raw) = request.bank_account_id {
            expenditure.bank_account_id = self.resolve_account(&raw).await?;
        }
        if let Some(amount) = request.amount {
            validate_amount(amount)?;
            expenditure.amount = amount;
        }

        let expenditure = self
            .expenditures
            .update(&expenditure)
            .await
            .map_err(map_missing("expenditure", id))?;
        info!(expenditure_id = %id, "Expenditure updated");
        Ok(expenditure)
    }

    async fn delete(&self, id: ExpenditureId) -> ServiceResult<()> {
        self.get(id).await?;
        self.expenditures
            .delete(id)
            .await
            .map_err(map_missing("expenditure", id))?;
        info!(expenditure_id = %id, "Expenditure deleted");
        Ok(())
    }

    async fn get(&self, id: ExpenditureId) -> ServiceResult<Expenditure> {
        debug!("Fetching expenditure {}", id);
        self.expenditures
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("expenditure", id))
    }

    async fn get_detailed(&self, id: ExpenditureId) -> ServiceResult<ExpenditureView> {
        let expenditure = self.get(id).await?;
        let tx = self.transactions.find_by_id(expenditure.transaction_id).await?;
        let account = self.accounts.find_by_id(expenditure.bank_account_id).await?;
        Ok(ExpenditureView::from(&expenditure).with_relations(tx.as_ref(), account.as_ref()))
    }

    async fn list_all(&self) -> ServiceResult<Vec<Expenditure>> {
        Ok(self.expenditures.list_all().await?)
    }

    async fn list_by_transaction(&self, tx_id: TransactionId) -> ServiceResult<Vec<Expenditure>> {
        Ok(self.expenditures.find_by_transaction(tx_id).await?)
    }

    async fn list_by_account(&self, account_id: AccountId) -> ServiceResult<Vec<Expenditure>> {
        Ok(self.expenditures.find_by_account(account_id).await?)
    }

    async fn list_by_date_range(&self, range: DateRange) -> ServiceResult<Vec<Expenditure>> {
        Ok(self.expenditures.find_by_date_range(range).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::ErrorKind;
    use crate::domain::account::{Account, AccountType};
    use crate::domain::transaction::{Transaction, TransactionType};
    use crate::infrastructure::repositories::{
        InMemoryAccountRepository, InMemoryExpenditureRepository, InMemoryTransactionRepository,
    };

    struct Fixture {
        service: StandardExpenditureService,
        bank: Account,
        tx: Transaction,
    }

    async fn fixture() -> Fixture {
        let accounts = Arc::new(InMemoryAccountRepository::new());
        let transactions = Arc::new(InMemoryTransactionRepository::new());
        let bank = accounts
            .create(&Account::new("Bank".into(), AccountType::Bank, None, None, "system".into()))
            .await
            .unwrap();
        let tx = transactions
            .create(&Transaction::new(
                Some("EXP-001".into()),
                None,
                TransactionType::Expenses,
                Decimal::new(5000, 0),
                None,
                bank.id,
                None,
                "system".into(),
            ))
            .await
            .unwrap();
        Fixture {
            service: StandardExpenditureService::new(
                Arc::new(InMemoryExpenditureRepository::new()),
                transactions,
                accounts,
            ),
            bank,
            tx,
        }
    }

    fn request(fx: &Fixture, particulars: &str) -> CreateExpenditureRequest {
        CreateExpenditureRequest {
            transaction_id: fx.tx.id.to_string(),
            particulars: particulars.to_string(),
            bank_account_id: fx.bank.id.to_string(),
            amount: Decimal::new(5000, 0),
        }
    }

    #[tokio::test]
    async fn test_particulars_rules() {
        let fx = fixture().await;
        let err = fx.service.create(request(&fx, "")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = fx.service.create(request(&fx, &"p".repeat(256))).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(fx.service.create(request(&fx, &"p".repeat(255))).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_bank_account() {
        let fx = fixture().await;
        let mut req = request(&fx, "Sound system repair");
        req.bank_account_id = AccountId::new().to_string();
        assert!(matches!(
            fx.service.create(req).await.unwrap_err(),
            ServiceError::AccountNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_lookups_and_detail() {
        let fx = fixture().await;
        let exp = fx.service.create(request(&fx, "Electricity")).await.unwrap();

        assert_eq!(fx.service.list_by_transaction(fx.tx.id).await.unwrap().len(), 1);
        assert_eq!(fx.service.list_by_account(fx.bank.id).await.unwrap().len(), 1);
        assert!(fx.service.list_by_account(AccountId::new()).await.unwrap().is_empty());

        let view = fx.service.get_detailed(exp.id).await.unwrap();
        assert_eq!(view.bank_account.map(|a| a.id), Some(fx.bank.id));
        assert_eq!(
            view.transaction.and_then(|t| t.transaction_ref).as_deref(),
            Some("EXP-001")
        );
    }

    #[tokio::test]
    async fn test_partial_update() {
        let fx = fixture().await;
        let exp = fx.service.create(request(&fx, "Electricity")).await.unwrap();
        let updated = fx
            .service
            .update(
                exp.id,
                UpdateExpenditureRequest {
                    particulars: Some("Electricity (March)".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.particulars, "Electricity (March)");
        assert_eq!(updated.amount, exp.amount);
        assert_eq!(
            fx.service
                .update(ExpenditureId::new(), UpdateExpenditureRequest::default())
                .await
                .unwrap_err()
                .kind(),
            ErrorKind::NotFound
        );
    }
}
