// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0
//! Postgres Transaction
//!
//! `transactions` table. Every listing is ordered by `transaction_date DESC`,
//! and range queries filter on `transaction_date` with inclusive bounds.
//! Deleting a transaction cascades to its receipts, expenditures and
//! transfers through the foreign keys declared in the schema.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::account::AccountId;
use crate::domain::member::MemberId;
use crate::domain::period::DateRange;
use crate::domain::repository::{RepositoryError, TransactionRepository};
use crate::domain::transaction::{Transaction, TransactionId, TransactionType};

const COLUMNS: &str = "id, transaction_ref, transaction_date, transaction_type, amount, notes, \
                       debit_account, member, created_by, created_at, updated_at";

pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn create(&self, tx: &Transaction) -> Result<Transaction, RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, transaction_ref, transaction_date, transaction_type, amount, notes,
                debit_account, member, created_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(tx.id.0)
        .bind(&tx.reference)
        .bind(tx.transaction_date)
        .bind(tx.transaction_type.as_str())
        .bind(tx.amount)
        .bind(&tx.notes)
        .bind(tx.debit_account_id.0)
        .bind(tx.member_id.map(|m| m.0))
        .bind(&tx.created_by)
        .bind(tx.created_at)
        .bind(tx.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to create transaction: {}", e)))?;

        Ok(tx.clone())
    }

    async fn update(&self, tx: &Transaction) -> Result<Transaction, RepositoryError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE transactions
            SET transaction_ref = $2, transaction_date = $3, transaction_type = $4, amount = $5,
                notes = $6, debit_account = $7, member = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(tx.id.0)
        .bind(&tx.reference)
        .bind(tx.transaction_date)
        .bind(tx.transaction_type.as_str())
        .bind(tx.amount)
        .bind(&tx.notes)
        .bind(tx.debit_account_id.0)
        .bind(tx.member_id.map(|m| m.0))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to update transaction: {}", e)))?;

        match row {
            Some(row) => parse_transaction_row(&row),
            None => Err(RepositoryError::NotFound(format!("Transaction {} not found", tx.id))),
        }
    }

    async fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM transactions WHERE id = $1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(parse_transaction_row).transpose()
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Transaction>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM transactions WHERE transaction_ref = $1"
        ))
        .bind(reference)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(parse_transaction_row).transpose()
    }

    async fn find_by_account(&self, account_id: AccountId) -> Result<Vec<Transaction>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM transactions WHERE debit_account = $1 ORDER BY transaction_date DESC"
        ))
        .bind(account_id.0)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(parse_transaction_row).collect()
    }

    async fn find_by_member(&self, member_id: MemberId) -> Result<Vec<Transaction>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM transactions WHERE member = $1 ORDER BY transaction_date DESC"
        ))
        .bind(member_id.0)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(parse_transaction_row).collect()
    }

    async fn find_by_type(&self, kind: TransactionType) -> Result<Vec<Transaction>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM transactions WHERE transaction_type = $1 ORDER BY transaction_date DESC"
        ))
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(parse_transaction_row).collect()
    }

    async fn find_by_date_range(&self, range: DateRange) -> Result<Vec<Transaction>, RepositoryError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {COLUMNS} FROM transactions
            WHERE transaction_date BETWEEN $1 AND $2
            ORDER BY transaction_date DESC
            "#
        ))
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(parse_transaction_row).collect()
    }

    async fn list_all(&self) -> Result<Vec<Transaction>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM transactions ORDER BY transaction_date DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(parse_transaction_row).collect()
    }

    async fn delete(&self, id: TransactionId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Transaction {} not found", id)));
        }
        Ok(())
    }
}

fn parse_transaction_row(row: &PgRow) -> Result<Transaction, RepositoryError> {
    let id: uuid::Uuid = row.try_get("id")?;
    let transaction_type: String = row.try_get("transaction_type")?;
    let debit_account: uuid::Uuid = row.try_get("debit_account")?;
    let member: Option<uuid::Uuid> = row.try_get("member")?;

    Ok(Transaction {
        id: TransactionId(id),
        reference: row.try_get("transaction_ref")?,
        transaction_date: row.try_get("transaction_date")?,
        transaction_type: TransactionType::parse(&transaction_type)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?,
        amount: row.try_get("amount")?,
        notes: row.try_get("notes")?,
        debit_account_id: AccountId(debit_account),
        member_id: member.map(MemberId),
        created_by: row.try_get("created_by")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
