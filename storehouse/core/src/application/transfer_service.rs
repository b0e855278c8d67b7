// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

//! Transfer Service
//!
//! Movement of funds recorded against a parent transaction into a credit
//! account. Totals are reported per credit account.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::error::{map_missing, ServiceError, ServiceResult};
use crate::domain::account::AccountId;
use crate::domain::period::DateRange;
use crate::domain::repository::{AccountRepository, TransactionRepository, TransferRepository};
use crate::domain::transaction::TransactionId;
use crate::domain::transfer::{Transfer, TransferId, TransferView};
use crate::domain::validation::{parse_id, validate_amount, validate_length, validate_required};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransferRequest {
    pub transaction_id: String,
    pub particulars: String,
    pub credit_account_id: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTransferRequest {
    pub particulars: Option<String>,
    pub credit_account_id: Option<String>,
    pub amount: Option<Decimal>,
}

#[async_trait]
pub trait TransferService: Send + Sync {
    async fn create(&self, request: CreateTransferRequest) -> ServiceResult<Transfer>;
    async fn update(&self, id: TransferId, request: UpdateTransferRequest) -> ServiceResult<Transfer>;
    async fn delete(&self, id: TransferId) -> ServiceResult<()>;
    async fn get(&self, id: TransferId) -> ServiceResult<Transfer>;
    async fn get_detailed(&self, id: TransferId) -> ServiceResult<TransferView>;
    async fn list_all(&self) -> ServiceResult<Vec<Transfer>>;
    async fn list_by_transaction(&self, tx_id: TransactionId) -> ServiceResult<Vec<Transfer>>;
    async fn list_by_credit_account(&self, account_id: AccountId) -> ServiceResult<Vec<Transfer>>;
    async fn list_by_date_range(&self, range: DateRange) -> ServiceResult<Vec<Transfer>>;
    async fn total_by_credit_account(&self, account_id: AccountId) -> ServiceResult<Decimal>;
    async fn total_by_credit_account_in_range(
        &self,
        account_id: AccountId,
        range: DateRange,
    ) -> ServiceResult<Decimal>;
}

pub struct StandardTransferService {
    transfers: Arc<dyn TransferRepository>,
    transactions: Arc<dyn TransactionRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl StandardTransferService {
    pub fn new(
        transfers: Arc<dyn TransferRepository>,
        transactions: Arc<dyn TransactionRepository>,
        accounts: Arc<dyn AccountRepository>,
    ) -> Self {
        Self {
            transfers,
            transactions,
            accounts,
        }
    }

    fn validate_particulars(particulars: &str) -> ServiceResult<()> {
        validate_required("particulars", particulars)?;
        validate_length("particulars", particulars, Transfer::MAX_PARTICULARS_LENGTH)?;
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
        let id: AccountId = parse_id("credit account id", raw)?;
        match self.accounts.find_by_id(id).await? {
            Some(_) => Ok(id),
            None => Err(ServiceError::AccountNotFound(raw.to_string())),
        }
    }
}

#[async_trait]
impl TransferService for StandardTransferService {
    async fn create(&self, request: CreateTransferRequest) -> ServiceResult<Transfer> {
        Self::validate_particulars(&request.particulars)?;
        validate_amount(request.amount)?;
        let credit_account_id = self.resolve_account(&request.credit_account_id).await?;
        let transaction_id = self.resolve_transaction(&request.transaction_id).await?;

        let transfer = Transfer::new(
            transaction_id,
            request.particulars,
            credit_account_id,
            request.amount,
        );
        let transfer = self.transfers.create(&transfer).await?;

        metrics::counter!("storehouse_records_created_total", "entity" => "transfer").increment(1);
        info!(
            transfer_id = %transfer.id,
            credit_account = %transfer.credit_account_id,
            amount = %transfer.amount,
            "Transfer recorded"
        );
        Ok(transfer)
    }

    async fn update(&self, id: TransferId, request: UpdateTransferRequest) -> ServiceResult<Transfer> {
        let mut transfer = self.get(id).await?;

        if let Some(particulars) = request.particulars {
            Self::validate_particulars(&particulars)?;
            transfer.particulars = particulars;
        }
        if let Some(raw) = request.credit_account_id {
            transfer.credit_account_id = self.resolve_account(&raw).await?;
        }
        if let Some(amount) = request.amount {
            validate_amount(amount)?;
            transfer.amount = amount;
        }

        let transfer = self
            .transfers
            .update(&transfer)
            .await
            .map_err(map_missing("transfer", id))?;
        info!(transfer_id = %id, "Transfer updated");
        Ok(transfer)
    }

    async fn delete(&self, id: TransferId) -> ServiceResult<()> {
        self.get(id).await?;
        self.transfers
            .delete(id)
            .await
            .map_err(map_missing("transfer", id))?;
        info!(transfer_id = %id, "Transfer deleted");
        Ok(())
    }

    async fn get(&self, id: TransferId) -> ServiceResult<Transfer> {
        debug!("Fetching transfer {}", id);
        self.transfers
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("transfer", id))
    }

    async fn get_detailed(&self, id: TransferId) -> ServiceResult<TransferView> {
        let transfer = self.get(id).await?;
        let tx = self.transactions.find_by_id(transfer.transaction_id).await?;
        let account = self.accounts.find_by_id(transfer.credit_account_id).await?;
        Ok(TransferView::from(&transfer).with_relations(tx.as_ref(), account.as_ref()))
    }

    async fn list_all(&self) -> ServiceResult<Vec<Transfer>> {
        Ok(self.transfers.list_all().await?)
    }

    async fn list_by_transaction(&self, tx_id: TransactionId) -> ServiceResult<Vec<Transfer>> {
        Ok(self.transfers.find_by_transaction(tx_id).await?)
    }

    async fn list_by_credit_account(&self, account_id: AccountId) -> ServiceResult<Vec<Transfer>> {
        Ok(self.transfers.find_by_credit_account(account_id).await?)
    }

    async fn list_by_date_range(&self, range: DateRange) -> ServiceResult<Vec<Transfer>> {
        Ok(self.transfers.find_by_date_range(range).await?)
    }

    async fn total_by_credit_account(&self, account_id: AccountId) -> ServiceResult<Decimal> {
        Ok(self.transfers.total_by_credit_account(account_id, None).await?)
    }

    async fn total_by_credit_account_in_range(
        &self,
        account_id: AccountId,
        range: DateRange,
    ) -> ServiceResult<Decimal> {
        Ok(self
            .transfers
            .total_by_credit_account(account_id, Some(range))
            .await?)
    }
}
