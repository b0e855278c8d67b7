// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::members_group::{GroupId, GroupView, GroupWithMemberCount, MembersGroup};
use crate::domain::repository::{MembersGroupRepository, RepositoryError};

const COLUMNS: &str = "id, group_name, notes, created_by, created_at, updated_at";

pub struct PostgresMembersGroupRepository {
    pool: PgPool,
}

impl PostgresMembersGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembersGroupRepository for PostgresMembersGroupRepository {
    async fn create(&self, group: &MembersGroup) -> Result<MembersGroup, RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO members_groups (id, group_name, notes, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(group.id.0)
        .bind(&group.name)
        .bind(&group.notes)
        .bind(&group.created_by)
        .bind(group.created_at)
        .bind(group.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to create members group: {}", e)))?;

        Ok(group.clone())
    }

    async fn update(&self, group: &MembersGroup) -> Result<MembersGroup, RepositoryError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE members_groups
            SET group_name = $2, notes = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(group.id.0)
        .bind(&group.name)
        .bind(&group.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to update members group: {}", e)))?;

        match row {
            Some(row) => parse_group_row(&row),
            None => Err(RepositoryError::NotFound(format!("Members group {} not found", group.id))),
        }
    }

    async fn find_by_id(&self, id: GroupId) -> Result<Option<MembersGroup>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM members_groups WHERE id = $1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(parse_group_row).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<MembersGroup>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM members_groups WHERE group_name = $1"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(parse_group_row).transpose()
    }

    async fn list_all(&self) -> Result<Vec<MembersGroup>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM members_groups ORDER BY group_name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(parse_group_row).collect()
    }

    async fn list_with_member_counts(&self) -> Result<Vec<GroupWithMemberCount>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT g.id, g.group_name, g.notes, g.created_by, g.created_at, g.updated_at,
                   COUNT(m.id) AS member_count
            FROM members_groups g
            LEFT JOIN members m ON m."group" = g.id
            GROUP BY g.id, g.group_name, g.notes, g.created_by, g.created_at, g.updated_at
            ORDER BY g.group_name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let group = parse_group_row(row)?;
                Ok(GroupWithMemberCount {
                    group: GroupView::from(&group),
                    member_count: row.try_get("member_count")?,
                })
            })
            .collect()
    }

    async fn delete(&self, id: GroupId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM members_groups WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Members group {} not found", id)));
        }
        Ok(())
    }
}

fn parse_group_row(row: &PgRow) -> Result<MembersGroup, RepositoryError> {
    let id: uuid::Uuid = row.try_get("id")?;
    Ok(MembersGroup {
        id: GroupId(id),
        name: row.try_get("group_name")?,
        notes: row.try_get("notes")?,
        created_by: row.try_get("created_by")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
