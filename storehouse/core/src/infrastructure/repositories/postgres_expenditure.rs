// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::account::AccountId;
use crate::domain::expenditure::{Expenditure, ExpenditureId};
use crate::domain::period::DateRange;
use crate::domain::repository::{ExpenditureRepository, RepositoryError};
use crate::domain::transaction::TransactionId;

// The particulars column is spelled `perticulars` in the schema.
const COLUMNS: &str = "id, transaction_id, perticulars, bank_account, amount, created_at, updated_at";

pub struct PostgresExpenditureRepository {
    pool: PgPool,
}

impl PostgresExpenditureRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExpenditureRepository for PostgresExpenditureRepository {
    async fn create(&self, expenditure: &Expenditure) -> Result<Expenditure, RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO expenditures (
                id, transaction_id, perticulars, bank_account, amount, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(expenditure.id.0)
        .bind(expenditure.transaction_id.0)
        .bind(&expenditure.particulars)
        .bind(expenditure.bank_account_id.0)
        .bind(expenditure.amount)
        .bind(expenditure.created_at)
        .bind(expenditure.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to create expenditure: {}", e)))?;

        Ok(expenditure.clone())
    }

    async fn update(&self, expenditure: &Expenditure) -> Result<Expenditure, RepositoryError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE expenditures
            SET perticulars = $2, bank_account = $3, amount = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(expenditure.id.0)
        .bind(&expenditure.particulars)
        .bind(expenditure.bank_account_id.0)
        .bind(expenditure.amount)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to update expenditure: {}", e)))?;

        match row {
            Some(row) => parse_expenditure_row(&row),
            None => Err(RepositoryError::NotFound(format!(
                "Expenditure {} not found",
                expenditure.id
            ))),
        }
    }

    async fn find_by_id(&self, id: ExpenditureId) -> Result<Option<Expenditure>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM expenditures WHERE id = $1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(parse_expenditure_row).transpose()
    }

    async fn find_by_transaction(&self, tx_id: TransactionId) -> Result<Vec<Expenditure>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM expenditures WHERE transaction_id = $1 ORDER BY created_at DESC"
        ))
        .bind(tx_id.0)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(parse_expenditure_row).collect()
    }

    async fn find_by_account(&self, account_id: AccountId) -> Result<Vec<Expenditure>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM expenditures WHERE bank_account = $1 ORDER BY created_at DESC"
        ))
        .bind(account_id.0)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(parse_expenditure_row).collect()
    }

    async fn find_by_date_range(&self, range: DateRange) -> Result<Vec<Expenditure>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM expenditures WHERE created_at BETWEEN $1 AND $2 ORDER BY created_at DESC"
        ))
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(parse_expenditure_row).collect()
    }

    async fn list_all(&self) -> Result<Vec<Expenditure>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM expenditures ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(parse_expenditure_row).collect()
    }

    async fn delete(&self, id: ExpenditureId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM expenditures WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Expenditure {} not found", id)));
        }
        Ok(())
    }
}

fn parse_expenditure_row(row: &PgRow) -> Result<Expenditure, RepositoryError> {
    let id: uuid::Uuid = row.try_get("id")?;
    let transaction_id: uuid::Uuid = row.try_get("transaction_id")?;
    let bank_account: uuid::Uuid = row.try_get("bank_account")?;

    Ok(Expenditure {
        id: ExpenditureId(id),
        transaction_id: TransactionId(transaction_id),
        particulars: row.try_get("perticulars")?,
        bank_account_id: AccountId(bank_account),
        amount: row.try_get("amount")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
