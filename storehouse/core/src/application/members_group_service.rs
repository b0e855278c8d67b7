// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

//! Members Group Service
//!
//! Group names are unique. A group that still has members cannot be deleted;
//! the member count is read first and the delete only runs when it is zero.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::error::{map_missing, ServiceError, ServiceResult};
use crate::domain::members_group::{GroupId, GroupWithMemberCount, MembersGroup};
use crate::domain::repository::{MemberRepository, MembersGroupRepository};
use crate::domain::validation::{validate_length, validate_required};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroupRequest {
    pub group_name: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGroupRequest {
    pub group_name: Option<String>,
    pub notes: Option<String>,
}

#[async_trait]
pub trait MembersGroupService: Send + Sync {
    async fn create(&self, request: CreateGroupRequest, created_by: &str) -> ServiceResult<MembersGroup>;
    async fn update(&self, id: GroupId, request: UpdateGroupRequest) -> ServiceResult<MembersGroup>;
    async fn delete(&self, id: GroupId) -> ServiceResult<()>;
    async fn get(&self, id: GroupId) -> ServiceResult<MembersGroup>;
    async fn find_by_name(&self, name: &str) -> ServiceResult<MembersGroup>;
    async fn list_all(&self) -> ServiceResult<Vec<MembersGroup>>;
    async fn list_with_member_counts(&self) -> ServiceResult<Vec<GroupWithMemberCount>>;
    async fn member_count(&self, id: GroupId) -> ServiceResult<i64>;
}

pub struct StandardMembersGroupService {
    groups: Arc<dyn MembersGroupRepository>,
    members: Arc<dyn MemberRepository>,
}

impl StandardMembersGroupService {
    pub fn new(groups: Arc<dyn MembersGroupRepository>, members: Arc<dyn MemberRepository>) -> Self {
        Self { groups, members }
    }

    fn validate_name(name: &str) -> ServiceResult<()> {
        validate_required("group name", name)?;
        validate_length("group name", name, MembersGroup::MAX_NAME_LENGTH)?;
        Ok(())
    }

    async fn ensure_name_free(&self, name: &str) -> ServiceResult<()> {
        if self.groups.find_by_name(name).await?.is_some() {
            return Err(ServiceError::DuplicateName {
                entity: "members group",
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MembersGroupService for StandardMembersGroupService {
    async fn create(&self, request: CreateGroupRequest, created_by: &str) -> ServiceResult<MembersGroup> {
        Self::validate_name(&request.group_name)?;
        self.ensure_name_free(&request.group_name).await?;

        let group = MembersGroup::new(request.group_name, request.notes, created_by.to_string());
        let group = self.groups.create(&group).await?;

        metrics::counter!("storehouse_records_created_total", "entity" => "members_group").increment(1);
        info!(group_id = %group.id, name = %group.name, "Members group created");
        Ok(group)
    }

    async fn update(&self, id: GroupId, request: UpdateGroupRequest) -> ServiceResult<MembersGroup> {
        let mut group = self.get(id).await?;

        if let Some(name) = request.group_name {
            Self::validate_name(&name)?;
            if name != group.name {
                self.ensure_name_free(&name).await?;
            }
            group.name = name;
        }
        if let Some(notes) = request.notes {
            group.notes = Some(notes);
        }

        let group = self
            .groups
            .update(&group)
            .await
            .map_err(map_missing("members group", id))?;
        info!(group_id = %id, "Members group updated");
        Ok(group)
    }

    async fn delete(&self, id: GroupId) -> ServiceResult<()> {
        self.get(id).await?;

        let count = self.members.count_by_group(id).await?;
        if count > 0 {
            return Err(ServiceError::GroupNotEmpty(count));
        }

        self.groups
            .delete(id)
            .await
            .map_err(map_missing("members group", id))?;
        info!(group_id = %id, "Members group deleted");
        Ok(())
    }

    async fn get(&self, id: GroupId) -> ServiceResult<MembersGroup> {
        debug!("Fetching members group {}", id);
        self.groups
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("members group", id))
    }

    async fn find_by_name(&self, name: &str) -> ServiceResult<MembersGroup> {
        self.groups
            .find_by_name(name)
            .await?
            .ok_or_else(|| ServiceError::not_found("members group", name))
    }

    async fn list_all(&self) -> ServiceResult<Vec<MembersGroup>> {
        Ok(self.groups.list_all().await?)
    }

    async fn list_with_member_counts(&self) -> ServiceResult<Vec<GroupWithMemberCount>> {
        Ok(self.groups.list_with_member_counts().await?)
    }

    async fn member_count(&self, id: GroupId) -> ServiceResult<i64> {
        self.get(id).await?;
        Ok(self.members.count_by_group(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::ErrorKind;
    use crate::domain::member::Member;
    use crate::infrastructure::repositories::{
        InMemoryMemberRepository, InMemoryMembersGroupRepository,
    };

    struct Fixture {
        service: StandardMembersGroupService,
        members: Arc<InMemoryMemberRepository>,
    }

    fn fixture() -> Fixture {
        let members = InMemoryMemberRepository::new();
        let groups = InMemoryMembersGroupRepository::with_members(&members);
        let members = Arc::new(members);
        Fixture {
            service: StandardMembersGroupService::new(Arc::new(groups), members.clone()),
            members,
        }
    }

    fn request(name: &str) -> CreateGroupRequest {
        CreateGroupRequest {
            group_name: name.to_string(),
            notes: None,
        }
    }

    async fn join(fx: &Fixture, group: GroupId, phone: &str) {
        let member = Member::new(
            "Member".to_string(),
            phone.to_string(),
            None,
            None,
            Some(group),
            "system".to_string(),
        );
        fx.members.create(&member).await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_group_name() {
        let fx = fixture();
        fx.service.create(request("Youth"), "system").await.unwrap();
        let err = fx.service.create(request("Youth"), "system").await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateName { .. }));
    }

    #[tokio::test]
    async fn test_name_longer_than_fifty_rejected() {
        let fx = fixture();
        let err = fx
            .service
            .create(request(&"g".repeat(51)), "system")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_delete_group_with_members_is_conflict() {
        let fx = fixture();
        let group = fx.service.create(request("Choir"), "system").await.unwrap();
        join(&fx, group.id, "0712000001").await;

        let err = fx.service.delete(group.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::GroupNotEmpty(1)));
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(fx.service.get(group.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_empty_group() {
        let fx = fixture();
        let group = fx.service.create(request("Ushers"), "system").await.unwrap();
        fx.service.delete(group.id).await.unwrap();
        assert_eq!(fx.service.get(group.id).await.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_unknown_group_is_not_found() {
        let fx = fixture();
        let err = fx.service.delete(GroupId::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_member_counts() {
        let fx = fixture();
        let choir = fx.service.create(request("Choir"), "system").await.unwrap();
        let ushers = fx.service.create(request("Ushers"), "system").await.unwrap();
        join(&fx, choir.id, "0712000001").await;
        join(&fx, choir.id, "0712000002").await;

        assert_eq!(fx.service.member_count(choir.id).await.unwrap(), 2);
        assert_eq!(fx.service.member_count(ushers.id).await.unwrap(), 0);
        assert_eq!(
            fx.service.member_count(GroupId::new()).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );

        let counts = fx.service.list_with_member_counts().await.unwrap();
        let names: Vec<(&str, i64)> = counts
            .iter()
            .map(|c| (c.group.group_name.as_str(), c.member_count))
            .collect();
        assert_eq!(names, vec![("Choir", 2), ("Ushers", 0)]);
    }

    #[tokio::test]
    async fn test_find_by_name() {
        let fx = fixture();
        let group = fx.service.create(request("Men"), "system").await.unwrap();
        assert_eq!(fx.service.find_by_name("Men").await.unwrap().id, group.id);
        assert_eq!(
            fx.service.find_by_name("Women").await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }
}
