// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

//! Member Service
//!
//! Application service for church members.
//!
//! # Flow (create)
//!
//! 1. Name required (≤100 characters); phone must match the phone pattern
//! 2. Email, when supplied, must be well formed
//! 3. Phone and email must not belong to another member
//! 4. A referenced group must exist
//! 5. Persist
//!
//! On update an empty `group_id` string removes the member from its group.
//! A member referenced by any transaction cannot be deleted.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::error::{map_missing, ServiceError, ServiceResult};
use crate::domain::member::{Member, MemberId, MemberView};
use crate::domain::members_group::GroupId;
use crate::domain::repository::{MemberRepository, MembersGroupRepository, TransactionRepository};
use crate::domain::validation::{
    parse_id, validate_email, validate_length, validate_phone, validate_required,
};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMemberRequest {
    pub full_name: String,
    pub phone_number: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMemberRequest {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    /// `Some("")` clears the group.
    pub group_id: Option<String>,
}

#[async_trait]
pub trait MemberService: Send + Sync {
    async fn create(&self, request: CreateMemberRequest, created_by: &str) -> ServiceResult<Member>;
    async fn update(&self, id: MemberId, request: UpdateMemberRequest) -> ServiceResult<Member>;
    async fn delete(&self, id: MemberId) -> ServiceResult<()>;
    async fn get(&self, id: MemberId) -> ServiceResult<Member>;
    /// Member with its group eagerly loaded.
    async fn get_detailed(&self, id: MemberId) -> ServiceResult<MemberView>;
    async fn list_all(&self) -> ServiceResult<Vec<Member>>;
    async fn find_by_phone(&self, phone: &str) -> ServiceResult<Member>;
    async fn find_by_email(&self, email: &str) -> ServiceResult<Member>;
    async fn list_by_group(&self, group_id: GroupId) -> ServiceResult<Vec<Member>>;
    async fn search(&self, term: &str) -> ServiceResult<Vec<Member>>;
}

pub struct StandardMemberService {
    members: Arc<dyn MemberRepository>,
    groups: Arc<dyn MembersGroupRepository>,
    transactions: Arc<dyn TransactionRepository>,
}

impl StandardMemberService {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        groups: Arc<dyn MembersGroupRepository>,
        transactions: Arc<dyn TransactionRepository>,
    ) -> Self {
        Self {
            members,
            groups,
            transactions,
        }
    }

    fn validate_name(name: &str) -> ServiceResult<()> {
        validate_required("full name", name)?;
        validate_length("full name", name, Member::MAX_NAME_LENGTH)?;
        Ok(())
    }

    async fn ensure_phone_free(&self, phone: &str) -> ServiceResult<()> {
        if self.members.find_by_phone(phone).await?.is_some() {
            return Err(ServiceError::DuplicatePhone(phone.to_string()));
        }
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str) -> ServiceResult<()> {
        if self.members.find_by_email(email).await?.is_some() {
            return Err(ServiceError::DuplicateEmail {
                entity: "member",
                email: email.to_string(),
            });
        }
        Ok(())
    }

    async fn resolve_group(&self, raw: &str) -> ServiceResult<GroupId> {
        let group_id: GroupId = parse_id("group id", raw)?;
        match self.groups.find_by_id(group_id).await? {
            Some(_) => Ok(group_id),
            None => Err(ServiceError::GroupNotFound(raw.to_string())),
        }
    }
}

/// Treat blank optional strings as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl MemberService for StandardMemberService {
    async fn create(&self, request: CreateMemberRequest, created_by: &str) -> ServiceResult<Member> {
        Self::validate_name(&request.full_name)?;
        validate_phone(&request.phone_number)?;
        let email = non_blank(request.email);
        if let Some(email) = &email {
            validate_email(email)?;
        }

        self.ensure_phone_free(&request.phone_number).await?;
        if let Some(email) = &email {
            self.ensure_email_free(email).await?;
        }

        let group_id = match non_blank(request.group_id) {
            Some(raw) => Some(self.resolve_group(&raw).await?),
            None => None,
        };

        let member = Member::new(
            request.full_name,
            request.phone_number,
            email,
            request.notes,
            group_id,
            created_by.to_string(),
        );
        let member = self.members.create(&member).await?;

        metrics::counter!("storehouse_records_created_total", "entity" => "member").increment(1);
        info!(member_id = %member.id, "Member created");
        Ok(member)
    }

    async fn update(&self, id: MemberId, request: UpdateMemberRequest) -> ServiceResult<Member> {
        let mut member = self.get(id).await?;

        if let Some(name) = request.full_name {
            Self::validate_name(&name)?;
            member.full_name = name;
        }
        if let Some(phone) = request.phone_number {
            validate_phone(&phone)?;
            if phone != member.phone_number {
                self.ensure_phone_free(&phone).await?;
            }
            member.phone_number = phone;
        }
        if let Some(email) = request.email {
            if email.trim().is_empty() {
                member.email = None;
            } else {
                validate_email(&email)?;
                if member.email.as_deref() != Some(email.as_str()) {
                    self.ensure_email_free(&email).await?;
                }
                member.email = Some(email);
            }
        }
        if let Some(notes) = request.notes {
            member.notes = Some(notes);
        }
        if let Some(raw) = request.group_id {
            member.group_id = if raw.trim().is_empty() {
                None
            } else {
                Some(self.resolve_group(&raw).await?)
            };
        }

        let member = self
            .members
            .update(&member)
            .await
            .map_err(map_missing("member", id))?;
        info!(member_id = %id, "Member updated");
        Ok(member)
    }

    async fn delete(&self, id: MemberId) -> ServiceResult<()> {
        self.get(id).await?;
        let referencing = self.transactions.find_by_member(id).await?.len();
        if referencing > 0 {
            return Err(ServiceError::MemberHasTransactions(referencing));
        }
        self.members
            .delete(id)
            .await
            .map_err(map_missing("member", id))?;
        info!(member_id = %id, "Member deleted");
        Ok(())
    }

    async fn get(&self, id: MemberId) -> ServiceResult<Member> {
        debug!("Fetching member {}", id);
        self.members
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("member", id))
    }

    async fn get_detailed(&self, id: MemberId) -> ServiceResult<MemberView> {
        let member = self.get(id).await?;
        let group = match member.group_id {
            Some(group_id) => self.groups.find_by_id(group_id).await?,
            None => None,
        };
        Ok(MemberView::from(&member).with_group(group.as_ref()))
    }

    async fn list_all(&self) -> ServiceResult<Vec<Member>> {
        Ok(self.members.list_all().await?)
    }

    async fn find_by_phone(&self, phone: &str) -> ServiceResult<Member> {
        self.members
            .find_by_phone(phone)
            .await?
            .ok_or_else(|| ServiceError::not_found("member", phone))
    }

    async fn find_by_email(&self, email: &str) -> ServiceResult<Member> {
        self.members
            .find_by_email(email)
            .await?
            .ok_or_else(|| ServiceError::not_found("member", email))
    }

    async fn list_by_group(&self, group_id: GroupId) -> ServiceResult<Vec<Member>> {
        Ok(self.members.find_by_group(group_id).await?)
    }

    async fn search(&self, term: &str) -> ServiceResult<Vec<Member>> {
        debug!("Searching members for '{}'", term);
        Ok(self.members.search(term).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::ErrorKind;
    use crate::domain::account::AccountId;
    use crate::domain::members_group::MembersGroup;
    use crate::domain::transaction::{Transaction, TransactionType};
    use rust_decimal::Decimal;
    use crate::domain::validation::ValidationError;
    use crate::infrastructure::repositories::{
        InMemoryMemberRepository, InMemoryMembersGroupRepository, InMemoryTransactionRepository,
    };

    struct Fixture {
        service: StandardMemberService,
        groups: Arc<InMemoryMembersGroupRepository>,
        transactions: Arc<InMemoryTransactionRepository>,
    }

    fn fixture() -> Fixture {
        let members = InMemoryMemberRepository::new();
        let groups = Arc::new(InMemoryMembersGroupRepository::with_members(&members));
        let transactions = Arc::new(InMemoryTransactionRepository::new());
        Fixture {
            service: StandardMemberService::new(
                Arc::new(members),
                groups.clone(),
                transactions.clone(),
            ),
            groups,
            transactions,
        }
    }

    fn request(name: &str, phone: &str) -> CreateMemberRequest {
        CreateMemberRequest {
            full_name: name.to_string(),
            phone_number: phone.to_string(),
            email: None,
            notes: None,
            group_id: None,
        }
    }

    async fn choir(fx: &Fixture) -> MembersGroup {
        fx.groups
            .create(&MembersGroup::new("Choir".to_string(), None, "system".to_string()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_phone_format() {
        let fx = fixture();
        let err = fx.service.create(request("Ann", "abc"), "system").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::InvalidPhone(_))));

        let ok = fx.service.create(request("Ann", "+254712345678"), "system").await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_phone_and_email() {
        let fx = fixture();
        let mut first = request("Ann", "0712000001");
        first.email = Some("ann@church.org".to_string());
        fx.service.create(first, "system").await.unwrap();

        let err = fx.service.create(request("Ben", "0712000001"), "system").await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicatePhone(_)));

        let mut second = request("Ben", "0712000002");
        second.email = Some("ann@church.org".to_string());
        let err = fx.service.create(second, "system").await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateEmail { .. }));
    }

    #[tokio::test]
    async fn test_malformed_email_rejected() {
        let fx = fixture();
        let mut req = request("Ann", "0712000001");
        req.email = Some("not-an-email".to_string());
        let err = fx.service.create(req, "system").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_unknown_group_rejected() {
        let fx = fixture();
        let mut req = request("Ann", "0712000001");
        req.group_id = Some(GroupId::new().to_string());
        let err = fx.service.create(req, "system").await.unwrap_err();
        assert!(matches!(err, ServiceError::GroupNotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_group_id_clears_group() {
        let fx = fixture();
        let group = choir(&fx).await;
        let mut req = request("Ann", "0712000001");
        req.group_id = Some(group.id.to_string());
        let member = fx.service.create(req, "system").await.unwrap();
        assert_eq!(member.group_id, Some(group.id));

        let updated = fx
            .service
            .update(
                member.id,
                UpdateMemberRequest {
                    group_id: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.group_id, None);
        assert_eq!(updated.phone_number, member.phone_number);
    }

    #[tokio::test]
    async fn test_detailed_view_loads_group() {
        let fx = fixture();
        let group = choir(&fx).await;
        let mut req = request("Ann", "0712000001");
        req.group_id = Some(group.id.to_string());
        let member = fx.service.create(req, "system").await.unwrap();

        let view = fx.service.get_detailed(member.id).await.unwrap();
        assert_eq!(view.group.map(|g| g.group_name).as_deref(), Some("Choir"));
    }

    #[tokio::test]
    async fn test_search_and_lookups() {
        let fx = fixture();
        let mut req = request("Grace Wanjiru", "0712000001");
        req.email = Some("grace@church.org".to_string());
        fx.service.create(req, "system").await.unwrap();
        fx.service.create(request("Peter Otieno", "0712000002"), "system").await.unwrap();

        assert_eq!(fx.service.search("GRACE").await.unwrap().len(), 1);
        assert_eq!(fx.service.search("0712").await.unwrap().len(), 2);
        assert!(fx.service.find_by_email("grace@church.org").await.is_ok());
        assert_eq!(
            fx.service.find_by_phone("0799999999").await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let fx = fixture();
        let member = fx.service.create(request("Ann", "0712000001"), "system").await.unwrap();
        fx.service.delete(member.id).await.unwrap();
        assert_eq!(fx.service.get(member.id).await.unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(fx.service.delete(member.id).await.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_member_with_transactions_cannot_be_deleted() {
        let fx = fixture();
        let member = fx.service.create(request("Ann", "0712000001"), "system").await.unwrap();
        let offering = Transaction::new(
            None,
            None,
            TransactionType::Receipts,
            Decimal::new(500, 0),
            None,
            AccountId::new(),
            Some(member.id),
            "clerk".to_string(),
        );
        fx.transactions.create(&offering).await.unwrap();

        let err = fx.service.delete(member.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::MemberHasTransactions(1)));
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(fx.service.get(member.id).await.is_ok());
    }
}
