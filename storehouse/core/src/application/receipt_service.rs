// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

//! Receipt Service
//!
//! Records income against a parent transaction and reports per-account totals.
//! A receipt is written independently of its parent; the parent and the income
//! account must both exist when the receipt is created.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::error::{map_missing, ServiceError, ServiceResult};
use crate::domain::account::AccountId;
use crate::domain::period::DateRange;
use crate::domain::receipt::{Receipt, ReceiptId, ReceiptView};
use crate::domain::repository::{AccountRepository, ReceiptRepository, TransactionRepository};
use crate::domain::transaction::TransactionId;
use crate::domain::validation::{parse_id, validate_amount};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReceiptRequest {
    pub transaction_id: String,
    pub income_account_id: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReceiptRequest {
    pub income_account_id: Option<String>,
    pub amount: Option<Decimal>,
}

#[async_trait]
pub trait ReceiptService: Send + Sync {
    async fn create(&self, request: CreateReceiptRequest) -> ServiceResult<Receipt>;
    async fn update(&self, id: ReceiptId, request: UpdateReceiptRequest) -> ServiceResult<Receipt>;
    async fn delete(&self, id: ReceiptId) -> ServiceResult<()>;
    async fn get(&self, id: ReceiptId) -> ServiceResult<Receipt>;
    async fn get_detailed(&self, id: ReceiptId) -> ServiceResult<ReceiptView>;
    async fn list_all(&self) -> ServiceResult<Vec<Receipt>>;
    async fn list_by_transaction(&self, tx_id: TransactionId) -> ServiceResult<Vec<Receipt>>;
    async fn list_by_account(&self, account_id: AccountId) -> ServiceResult<Vec<Receipt>>;
    async fn list_by_date_range(&self, range: DateRange) -> ServiceResult<Vec<Receipt>>;
    async fn total_by_account(&self, account_id: AccountId) -> ServiceResult<Decimal>;
    async fn total_by_account_in_range(&self, account_id: AccountId, range: DateRange) -> ServiceResult<Decimal>;
}

pub struct StandardReceiptService {
    receipts: Arc<dyn ReceiptRepository>,
    transactions: Arc<dyn TransactionRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl StandardReceiptService {
    pub fn new(
        receipts: Arc<dyn ReceiptRepository>,
        transactions: Arc<dyn TransactionRepository>,
        accounts: Arc<dyn AccountRepository>,
    ) -> Self {
        Self {
            receipts,
            transactions,
            accounts,
        }
    }

    async fn resolve_transaction(&self, raw: &str) -> ServiceResult<TransactionId> {
        let id: TransactionId = parse_id("transaction id", raw)?;
        match self.transactions.find_by_id(id).await? {
            Some(_) => Ok(id),
            None => Err(ServiceError::TransactionNotFound(raw.to_string())),
        }
    }

    async fn resolve_account(&self, raw: &str) -> ServiceResult<AccountId> {
        let id: AccountId = parse_id("income account id", raw)?;
        match self.accounts.find_by_id(id).await? {
            Some(_) => Ok(id),
            None => Err(ServiceError::AccountNotFound(raw.to_string())),
        }
    }
}

#[async_trait]
impl ReceiptService for StandardReceiptService {
    async fn create(&self, request: CreateReceiptRequest) -> ServiceResult<Receipt> {
        validate_amount(request.amount)?;
        let income_account_id = self.resolve_account(&request.income_account_id).await?;
        let transaction_id = self.resolve_transaction(&request.transaction_id).await?;

        let receipt = Receipt::new(transaction_id, income_account_id, request.amount);
        let receipt = self.receipts.create(&receipt).await?;

        metrics::counter!("storehouse_records_created_total", "entity" => "receipt").increment(1);
        info!(
            receipt_id = %receipt.id,
            transaction_id = %receipt.transaction_id,
            amount = %receipt.amount,
            "Receipt recorded"
        );
        Ok(receipt)
    }

    async fn update(&self, id: ReceiptId, request: UpdateReceiptRequest) -> ServiceResult<Receipt> {
        let mut receipt = self.get(id).await?;

        if let Some(raw) = request.income_account_id {
            receipt.income_account_id = self.resolve_account(&raw).await?;
        }
        if let Some(amount) = request.amount {
            validate_amount(amount)?;
            receipt.amount = amount;
        }

        let receipt = self
            .receipts
            .update(&receipt)
            .await
            .map_err(map_missing("receipt", id))?;
        info!(receipt_id = %id, "Receipt updated");
        Ok(receipt)
    }

    async fn delete(&self, id: ReceiptId) -> ServiceResult<()> {
        self.get(id).await?;
        self.receipts
            .delete(id)
            .await
            .map_err(map_missing("receipt", id))?;
        info!(receipt_id = %id, "Receipt deleted");
        Ok(())
    }

    async fn get(&self, id: ReceiptId) -> ServiceResult<Receipt> {
        debug!("Fetching receipt {}", id);
        self.receipts
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("receipt", id))
    }

    async fn get_detailed(&self, id: ReceiptId) -> ServiceResult<ReceiptView> {
        let receipt = self.get(id).await?;
        let tx = self.transactions.find_by_id(receipt.transaction_id).await?;
        let account = self.accounts.find_by_id(receipt.income_account_id).await?;
        Ok(ReceiptView::from(&receipt).with_relations(tx.as_ref(), account.as_ref()))
    }

    async fn list_all(&self) -> ServiceResult<Vec<Receipt>> {
        Ok(self.receipts.list_all().await?)
    }

    async fn list_by_transaction(&self, tx_id: TransactionId) -> ServiceResult<Vec<Receipt>> {
        Ok(self.receipts.find_by_transaction(tx_id).await?)
    }

    async fn list_by_account(&self, account_id: AccountId) -> ServiceResult<Vec<Receipt>> {
        Ok(self.receipts.find_by_account(account_id).await?)
    }

    async fn list_by_date_range(&self, range: DateRange) -> ServiceResult<Vec<Receipt>> {
        Ok(self.receipts.find_by_date_range(range).await?)
    }

    async fn total_by_account(&self, account_id: AccountId) -> ServiceResult<Decimal> {
        Ok(self.receipts.total_by_account(account_id, None).await?)
    }

    async fn total_by_account_in_range(&self, account_id: AccountId, range: DateRange) -> ServiceResult<Decimal> {
        Ok(self.receipts.total_by_account(account_id, Some(range)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::ErrorKind;
    use crate::domain::account::{Account, AccountType};
    use crate::domain::transaction::{Transaction, TransactionType};
    use crate::infrastructure::repositories::{
        InMemoryAccountRepository, InMemoryReceiptRepository, InMemoryTransactionRepository,
    };
    use chrono::{Duration, Utc};

    struct Fixture {
        service: StandardReceiptService,
        tithes: Account,
        tx: Transaction,
    }

    async fn fixture() -> Fixture {
        let accounts = Arc::new(InMemoryAccountRepository::new());
        let transactions = Arc::new(InMemoryTransactionRepository::new());
        let bank = accounts
            .create(&Account::new("Bank".into(), AccountType::Bank, None, None, "system".into()))
            .await
            .unwrap();
        let tithes = accounts
            .create(&Account::new("Tithes".into(), AccountType::Income, None, None, "system".into()))
            .await
            .unwrap();
        let tx = transactions
            .create(&Transaction::new(
                None,
                None,
                TransactionType::Receipts,
                Decimal::new(350, 0),
                None,
                bank.id,
                None,
                "system".into(),
            ))
            .await
            .unwrap();
        Fixture {
            service: StandardReceiptService::new(
                Arc::new(InMemoryReceiptRepository::new()),
                transactions,
                accounts,
            ),
            tithes,
            tx,
        }
    }

    fn request(fx: &Fixture, amount: i64) -> CreateReceiptRequest {
        CreateReceiptRequest {
            transaction_id: fx.tx.id.to_string(),
            income_account_id: fx.tithes.id.to_string(),
            amount: Decimal::new(amount, 0),
        }
    }

    #[tokio::test]
    async fn test_total_is_zero_without_receipts() {
        let fx = fixture().await;
        assert_eq!(fx.service.total_by_account(fx.tithes.id).await.unwrap(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_total_sums_receipts() {
        let fx = fixture().await;
        for amount in [100, 200, 50] {
            fx.service.create(request(&fx, amount)).await.unwrap();
        }
        assert_eq!(fx.service.total_by_account(fx.tithes.id).await.unwrap(), Decimal::new(350, 0));

        let range = DateRange::new(Utc::now() - Duration::hours(1), Utc::now() + Duration::hours(1)).unwrap();
        assert_eq!(
            fx.service.total_by_account_in_range(fx.tithes.id, range).await.unwrap(),
            Decimal::new(350, 0)
        );
        let past = DateRange::new(Utc::now() - Duration::days(2), Utc::now() - Duration::days(1)).unwrap();
        assert_eq!(
            fx.service.total_by_account_in_range(fx.tithes.id, past).await.unwrap(),
            Decimal::ZERO
        );
        assert_eq!(fx.service.list_by_transaction(fx.tx.id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_parent_and_account() {
        let fx = fixture().await;
        let mut req = request(&fx, 10);
        req.transaction_id = TransactionId::new().to_string();
        let err = fx.service.create(req).await.unwrap_err();
        assert!(matches!(err, ServiceError::TransactionNotFound(_)));

        let mut req = request(&fx, 10);
        req.income_account_id = AccountId::new().to_string();
        let err = fx.service.create(req).await.unwrap_err();
        assert!(matches!(err, ServiceError::AccountNotFound(_)));
    }

    #[tokio::test]
    async fn test_zero_amount_rejected() {
        let fx = fixture().await;
        let err = fx.service.create(request(&fx, 0)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_update_and_detailed_view() {
        let fx = fixture().await;
        let receipt = fx.service.create(request(&fx, 100)).await.unwrap();
        let updated = fx
            .service
            .update(
                receipt.id,
                UpdateReceiptRequest {
                    amount: Some(Decimal::new(120, 0)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.amount, Decimal::new(120, 0));
        assert_eq!(updated.income_account_id, receipt.income_account_id);

        let view = fx.service.get_detailed(receipt.id).await.unwrap();
        assert_eq!(view.income_account.map(|a| a.account_name).as_deref(), Some("Tithes"));
        assert_eq!(view.transaction.map(|t| t.id), Some(fx.tx.id));

        fx.service.delete(receipt.id).await.unwrap();
        assert_eq!(fx.service.get(receipt.id).await.unwrap_err().kind(), ErrorKind::NotFound);
    }
}
