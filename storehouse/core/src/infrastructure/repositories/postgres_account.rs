// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0
//! Postgres Account
//!
//! `accounts` table. Accounts are never deleted, only flagged inactive.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::account::{Account, AccountId, AccountType};
use crate::domain::repository::{AccountRepository, RepositoryError};

const COLUMNS: &str = "id, account_name, account_type, local_share, notes, is_active, \
                       created_by, created_at, updated_at";

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, account: &Account) -> Result<Account, RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                id, account_name, account_type, local_share, notes, is_active,
                created_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(account.id.0)
        .bind(&account.name)
        .bind(account.account_type.as_str())
        .bind(account.local_share)
        .bind(&account.notes)
        .bind(account.is_active)
        .bind(&account.created_by)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to create account: {}", e)))?;

        Ok(account.clone())
    }

    async fn update(&self, account: &Account) -> Result<Account, RepositoryError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE accounts
            SET account_name = $2, account_type = $3, local_share = $4, notes = $5,
                is_active = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(account.id.0)
        .bind(&account.name)
        .bind(account.account_type.as_str())
        .bind(account.local_share)
        .bind(&account.notes)
        .bind(account.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to update account: {}", e)))?;

        match row {
            Some(row) => parse_account_row(&row),
            None => Err(RepositoryError::NotFound(format!("Account {} not found", account.id))),
        }
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM accounts WHERE id = $1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(parse_account_row).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM accounts WHERE account_name = $1"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(parse_account_row).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Account>, RepositoryError> {
        let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM accounts ORDER BY account_name ASC"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(parse_account_row).collect()
    }

    async fn deactivate(&self, id: AccountId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Account {} not found", id)));
        }

        Ok(())
    }
}

fn parse_account_row(row: &PgRow) -> Result<Account, RepositoryError> {
    let id: uuid::Uuid = row.try_get("id")?;
    let account_type: String = row.try_get("account_type")?;
    let local_share: Option<Decimal> = row.try_get("local_share")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    Ok(Account {
        id: AccountId(id),
        name: row.try_get("account_name")?,
        account_type: AccountType::parse(&account_type)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?,
        local_share,
        notes: row.try_get("notes")?,
        is_active: row.try_get("is_active")?,
        created_by: row.try_get("created_by")?,
        created_at,
        updated_at,
    })
}
