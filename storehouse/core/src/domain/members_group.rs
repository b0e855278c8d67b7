// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0
//! Members Group Aggregate
//!
//! A named cohort (fellowship, estate, choir) that members may belong to.
//! A group can only be deleted once no member references it; that check is
//! performed by the application service, not by a cascading constraint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

entity_id!(
    /// Unique identifier for a members group
    GroupId
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembersGroup {
    pub id: GroupId,
    pub name: String,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MembersGroup {
    pub const MAX_NAME_LENGTH: usize = 50;

    pub fn new(name: String, notes: Option<String>, created_by: String) -> Self {
        let now = Utc::now();
        Self {
            id: GroupId::new(),
            name,
            notes,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupView {
    pub id: GroupId,
    pub group_name: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&MembersGroup> for GroupView {
    fn from(group: &MembersGroup) -> Self {
        Self {
            id: group.id,
            group_name: group.name.clone(),
            notes: group.notes.clone(),
            created_at: group.created_at,
            updated_at: group.updated_at,
        }
    }
}

impl From<MembersGroup> for GroupView {
    fn from(group: MembersGroup) -> Self {
        Self::from(&group)
    }
}

/// A group together with the number of members that reference it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupWithMemberCount {
    #[serde(flatten)]
    pub group: GroupView,
    pub member_count: i64,
}
