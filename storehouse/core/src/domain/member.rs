// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0
//! Member Aggregate
//!
//! A contributor to the church, distinct from a login [`User`](crate::domain::user::User).
//! Members are identified in practice by phone number, which is required and
//! unique; email is optional but unique when present.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::members_group::{GroupId, GroupView, MembersGroup};

entity_id!(
    /// Unique identifier for a member
    MemberId
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub full_name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub group_id: Option<GroupId>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    pub const MAX_NAME_LENGTH: usize = 100;
    pub const MAX_PHONE_LENGTH: usize = 20;

    pub fn new(
        full_name: String,
        phone_number: String,
        email: Option<String>,
        notes: Option<String>,
        group_id: Option<GroupId>,
        created_by: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: MemberId::new(),
            full_name,
            phone_number,
            email,
            notes,
            group_id,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-insensitive "contains" match over name, phone and email.
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.full_name.to_lowercase().contains(&needle)
            || self.phone_number.to_lowercase().contains(&needle)
            || self
                .email
                .as_deref()
                .map(|e| e.to_lowercase().contains(&needle))
                .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberView {
    pub id: MemberId,
    pub full_name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub group_id: Option<GroupId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub group: Option<GroupView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MemberView {
    pub fn with_group(mut self, group: Option<&MembersGroup>) -> Self {
        self.group = group.map(GroupView::from);
        self
    }
}

impl From<&Member> for MemberView {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            full_name: member.full_name.clone(),
            phone_number: member.phone_number.clone(),
            email: member.email.clone(),
            notes: member.notes.clone(),
            group_id: member.group_id,
            group: None,
            created_at: member.created_at,
            updated_at: member.updated_at,
        }
    }
}

impl From<Member> for MemberView {
    fn from(member: Member) -> Self {
        Self::from(&member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> Member {
        Member::new(
            "Grace Wanjiru".to_string(),
            "+254712345678".to_string(),
            Some("Grace.W@church.org".to_string()),
            None,
            None,
            "system".to_string(),
        )
    }

    #[test]
    fn test_search_is_case_insensitive_contains() {
        let m = member();
        assert!(m.matches_search("grace"));
        assert!(m.matches_search("WANJ"));
        assert!(m.matches_search("712345"));
        assert!(m.matches_search("grace.w@"));
        assert!(!m.matches_search("peter"));
    }

    #[test]
    fn test_search_without_email() {
        let mut m = member();
        m.email = None;
        assert!(!m.matches_search("church.org"));
    }

    #[test]
    fn test_view_omits_group_unless_loaded() {
        let m = member();
        let json = serde_json::to_value(MemberView::from(&m)).unwrap();
        assert!(json.get("group").is_none());

        let group = MembersGroup::new("Choir".to_string(), None, "system".to_string());
        let view = MemberView::from(&m).with_group(Some(&group));
        let json = serde_json::to_value(view).unwrap();
        assert_eq!(json["group"]["group_name"], "Choir");
    }
}
