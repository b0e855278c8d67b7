// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0
//! Postgres Member
//!
//! `members` table. The group reference lives in the quoted `"group"` column.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::member::{Member, MemberId};
use crate::domain::members_group::GroupId;
use crate::domain::repository::{MemberRepository, RepositoryError};

const COLUMNS: &str = r#"id, full_name, phone_number, email, notes, "group", created_by, created_at, updated_at"#;

pub struct PostgresMemberRepository {
    pool: PgPool,
}

impl PostgresMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn select_many(&self, filter: &str, bind: Option<String>) -> Result<Vec<Member>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM members {filter} ORDER BY full_name ASC");
        let mut query = sqlx::query(&sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(parse_member_row).collect()
    }
}

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
    async fn create(&self, member: &Member) -> Result<Member, RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO members (
                id, full_name, phone_number, email, notes, "group",
                created_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(member.id.0)
        .bind(&member.full_name)
        .bind(&member.phone_number)
        .bind(&member.email)
        .bind(&member.notes)
        .bind(member.group_id.map(|g| g.0))
        .bind(&member.created_by)
        .bind(member.created_at)
        .bind(member.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to create member: {}", e)))?;

        Ok(member.clone())
    }

    async fn update(&self, member: &Member) -> Result<Member, RepositoryError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE members
            SET full_name = $2, phone_number = $3, email = $4, notes = $5, "group" = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(member.id.0)
        .bind(&member.full_name)
        .bind(&member.phone_number)
        .bind(&member.email)
        .bind(&member.notes)
        .bind(member.group_id.map(|g| g.0))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to update member: {}", e)))?;

        match row {
            Some(row) => parse_member_row(&row),
            None => Err(RepositoryError::NotFound(format!("Member {} not found", member.id))),
        }
    }

    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM members WHERE id = $1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(parse_member_row).transpose()
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Member>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM members WHERE phone_number = $1"))
            .bind(phone)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(parse_member_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM members WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(parse_member_row).transpose()
    }

    async fn find_by_group(&self, group_id: GroupId) -> Result<Vec<Member>, RepositoryError> {
        let rows = sqlx::query(&format!(
            r#"SELECT {COLUMNS} FROM members WHERE "group" = $1 ORDER BY full_name ASC"#
        ))
        .bind(group_id.0)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(parse_member_row).collect()
    }

    async fn list_all(&self) -> Result<Vec<Member>, RepositoryError> {
        self.select_many("", None).await
    }

    async fn search(&self, term: &str) -> Result<Vec<Member>, RepositoryError> {
        self.select_many(
            r"WHERE full_name ILIKE $1 ESCAPE '\' OR phone_number ILIKE $1 ESCAPE '\' OR email ILIKE $1 ESCAPE '\'",
            Some(contains_pattern(term)),
        )
        .await
    }

    async fn count_by_group(&self, group_id: GroupId) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM members WHERE "group" = $1"#)
            .bind(group_id.0)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn delete(&self, id: MemberId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Member {} not found", id)));
        }
        Ok(())
    }
}

/// `ILIKE` pattern matching `term` literally anywhere in the column.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn parse_member_row(row: &PgRow) -> Result<Member, RepositoryError> {
    let id: uuid::Uuid = row.try_get("id")?;
    let group: Option<uuid::Uuid> = row.try_get("group")?;

    Ok(Member {
        id: MemberId(id),
        full_name: row.try_get("full_name")?,
        phone_number: row.try_get("phone_number")?,
        email: row.try_get("email")?,
        notes: row.try_get("notes")?,
        group_id: group.map(GroupId),
        created_by: row.try_get("created_by")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("grace"), "%grace%");
        assert_eq!(contains_pattern("_"), r"%\_%");
        assert_eq!(contains_pattern("50%"), r"%50\%%");
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");
    }
}
