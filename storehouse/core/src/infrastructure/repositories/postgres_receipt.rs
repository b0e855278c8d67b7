// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::account::AccountId;
use crate::domain::period::DateRange;
use crate::domain::receipt::{Receipt, ReceiptId};
use crate::domain::repository::{ReceiptRepository, RepositoryError};
use crate::domain::transaction::TransactionId;

const COLUMNS: &str = "id, transaction_id, income_account, amount, created_at, updated_at";

pub struct PostgresReceiptRepository {
    pool: PgPool,
}

impl PostgresReceiptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReceiptRepository for PostgresReceiptRepository {
    async fn create(&self, receipt: &Receipt) -> Result<Receipt, RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO receipts (id, transaction_id, income_account, amount, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(receipt.id.0)
        .bind(receipt.transaction_id.0)
        .bind(receipt.income_account_id.0)
        .bind(receipt.amount)
        .bind(receipt.created_at)
        .bind(receipt.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to create receipt: {}", e)))?;

        Ok(receipt.clone())
    }

    async fn update(&self, receipt: &Receipt) -> Result<Receipt, RepositoryError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE receipts
            SET income_account = $2, amount = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(receipt.id.0)
        .bind(receipt.income_account_id.0)
        .bind(receipt.amount)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to update receipt: {}", e)))?;

        match row {
            Some(row) => parse_receipt_row(&row),
            None => Err(RepositoryError::NotFound(format!("Receipt {} not found", receipt.id))),
        }
    }

    async fn find_by_id(&self, id: ReceiptId) -> Result<Option<Receipt>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM receipts WHERE id = $1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(parse_receipt_row).transpose()
    }

    async fn find_by_transaction(&self, tx_id: TransactionId) -> Result<Vec<Receipt>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM receipts WHERE transaction_id = $1 ORDER BY created_at DESC"
        ))
        .bind(tx_id.0)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(parse_receipt_row).collect()
    }

    async fn find_by_account(&self, account_id: AccountId) -> Result<Vec<Receipt>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM receipts WHERE income_account = $1 ORDER BY created_at DESC"
        ))
        .bind(account_id.0)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(parse_receipt_row).collect()
    }

    async fn find_by_date_range(&self, range: DateRange) -> Result<Vec<Receipt>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM receipts WHERE created_at BETWEEN $1 AND $2 ORDER BY created_at DESC"
        ))
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(parse_receipt_row).collect()
    }

    async fn list_all(&self) -> Result<Vec<Receipt>, RepositoryError> {
        let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM receipts ORDER BY created_at DESC"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(parse_receipt_row).collect()
    }

    async fn total_by_account(
        &self,
        account_id: AccountId,
        range: Option<DateRange>,
    ) -> Result<Decimal, RepositoryError> {
        let total: Decimal = match range {
            Some(range) => {
                sqlx::query_scalar(
                    r#"
                    SELECT COALESCE(SUM(amount), 0) FROM receipts
                    WHERE income_account = $1 AND created_at BETWEEN $2 AND $3
                    "#,
                )
                .bind(account_id.0)
                .bind(range.start)
                .bind(range.end)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar(
                    "SELECT COALESCE(SUM(amount), 0) FROM receipts WHERE income_account = $1",
                )
                .bind(account_id.0)
                .fetch_one(&self.pool)
                .await?
            }
        };
        Ok(total)
    }

    async fn delete(&self, id: ReceiptId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM receipts WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Receipt {} not found", id)));
        }
        Ok(())
    }
}

fn parse_receipt_row(row: &PgRow) -> Result<Receipt, RepositoryError> {
    let id: uuid::Uuid = row.try_get("id")?;
    let transaction_id: uuid::Uuid = row.try_get("transaction_id")?;
    let income_account: uuid::Uuid = row.try_get("income_account")?;

    Ok(Receipt {
        id: ReceiptId(id),
        transaction_id: TransactionId(transaction_id),
        income_account_id: AccountId(income_account),
        amount: row.try_get("amount")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
