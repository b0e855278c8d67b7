// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::account::AccountId;
use crate::domain::period::DateRange;
use crate::domain::repository::{RepositoryError, TransferRepository};
use crate::domain::transaction::TransactionId;
use crate::domain::transfer::{Transfer, TransferId};

const COLUMNS: &str = "id, transaction_id, perticulars, credit_account, amount, created_at, updated_at";

pub struct PostgresTransferRepository {
    pool: PgPool,
}

impl PostgresTransferRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransferRepository for PostgresTransferRepository {
    async fn create(&self, transfer: &Transfer) -> Result<Transfer, RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO transfers (
                id, transaction_id, perticulars, credit_account, amount, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(transfer.id.0)
        .bind(transfer.transaction_id.0)
        .bind(&transfer.particulars)
        .bind(transfer.credit_account_id.0)
        .bind(transfer.amount)
        .bind(transfer.created_at)
        .bind(transfer.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to create transfer: {}", e)))?;

        Ok(transfer.clone())
    }

    async fn update(&self, transfer: &Transfer) -> Result<Transfer, RepositoryError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE transfers
            SET perticulars = $2, credit_account = $3, amount = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(transfer.id.0)
        .bind(&transfer.particulars)
        .bind(transfer.credit_account_id.0)
        .bind(transfer.amount)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to update transfer: {}", e)))?;

        match row {
            Some(row) => parse_transfer_row(&row),
            None => Err(RepositoryError::NotFound(format!("Transfer {} not found", transfer.id))),
        }
    }

    async fn find_by_id(&self, id: TransferId) -> Result<Option<Transfer>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM transfers WHERE id = $1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(parse_transfer_row).transpose()
    }

    async fn find_by_transaction(&self, tx_id: TransactionId) -> Result<Vec<Transfer>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM transfers WHERE transaction_id = $1 ORDER BY created_at DESC"
        ))
        .bind(tx_id.0)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(parse_transfer_row).collect()
    }

    async fn find_by_credit_account(&self, account_id: AccountId) -> Result<Vec<Transfer>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM transfers WHERE credit_account = $1 ORDER BY created_at DESC"
        ))
        .bind(account_id.0)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(parse_transfer_row).collect()
    }

    async fn find_by_date_range(&self, range: DateRange) -> Result<Vec<Transfer>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM transfers WHERE created_at BETWEEN $1 AND $2 ORDER BY created_at DESC"
        ))
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(parse_transfer_row).collect()
    }

    async fn list_all(&self) -> Result<Vec<Transfer>, RepositoryError> {
        let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM transfers ORDER BY created_at DESC"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(parse_transfer_row).collect()
    }

    async fn total_by_credit_account(
        &self,
        account_id: AccountId,
        range: Option<DateRange>,
    ) -> Result<Decimal, RepositoryError> {
        let total: Decimal = match range {
            Some(range) => {
                sqlx::query_scalar(
                    r#"
                    SELECT COALESCE(SUM(amount), 0) FROM transfers
                    WHERE credit_account = $1 AND created_at BETWEEN $2 AND $3
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
                    "SELECT COALESCE(SUM(amount), 0) FROM transfers WHERE credit_account = $1",
                )
                .bind(account_id.0)
                .fetch_one(&self.pool)
                .await?
            }
        };
        Ok(total)
    }

    async fn delete(&self, id: TransferId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM transfers WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Transfer {} not found", id)));
        }
        Ok(())
    }
}

fn parse_transfer_row(row: &PgRow) -> Result<Transfer, RepositoryError> {
    let id: uuid::Uuid = row.try_get("id")?;
    let transaction_id: uuid::Uuid = row.try_get("transaction_id")?;
    let credit_account: uuid::Uuid = row.try_get("credit_account")?;

    Ok(Transfer {
        id: TransferId(id),
        transaction_id: TransactionId(transaction_id),
        particulars: row.try_get("perticulars")?,
        credit_account_id: AccountId(credit_account),
        amount: row.try_get("amount")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
