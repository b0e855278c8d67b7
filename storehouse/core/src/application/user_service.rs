// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

//! User Service
//!
//! Operator accounts (admin, treasurer, clerk) and their credentials.
//!
//! # Authentication
//!
//! An unknown username and a wrong password produce the same
//! [`ServiceError::InvalidCredentials`]. Only a caller who supplied the right
//! password learns that the account is deactivated. A successful login
//! stamps `last_login`; a failure to do so is logged and otherwise ignored.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::application::error::{map_missing, ServiceError, ServiceResult};
use crate::domain::repository::UserRepository;
use crate::domain::user::{User, UserId, UserRole};
use crate::domain::validation::{
    validate_email, validate_length, validate_password_strength, validate_required,
};
use crate::infrastructure::password::CredentialHasher;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
    #[serde(default)]
    pub phone_number: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub phone_number: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn create(&self, request: CreateUserRequest) -> ServiceResult<User>;
    async fn update(&self, id: UserId, request: UpdateUserRequest) -> ServiceResult<User>;
    async fn deactivate(&self, id: UserId) -> ServiceResult<()>;
    async fn delete(&self, id: UserId) -> ServiceResult<()>;
    async fn get(&self, id: UserId) -> ServiceResult<User>;
    async fn find_by_username(&self, username: &str) -> ServiceResult<User>;
    async fn find_by_email(&self, email: &str) -> ServiceResult<User>;
    async fn list_all(&self) -> ServiceResult<Vec<User>>;
    async fn list_by_role(&self, role: &str) -> ServiceResult<Vec<User>>;
    async fn list_active(&self) -> ServiceResult<Vec<User>>;
    async fn authenticate(&self, username: &str, password: &str) -> ServiceResult<User>;
    async fn change_password(&self, id: UserId, old_password: &str, new_password: &str) -> ServiceResult<()>;
}

pub struct StandardUserService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl StandardUserService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { users, hasher }
    }

    fn validate_profile(username: &str, full_name: &str, phone: &str) -> ServiceResult<()> {
        validate_required("username", username)?;
        validate_length("username", username, User::MAX_USERNAME_LENGTH)?;
        validate_required("full name", full_name)?;
        validate_length("full name", full_name, User::MAX_FULL_NAME_LENGTH)?;
        validate_length("phone number", phone, User::MAX_PHONE_LENGTH)?;
        Ok(())
    }

    async fn ensure_username_free(&self, username: &str) -> ServiceResult<()> {
        if self.users.find_by_username(username).await?.is_some() {
            return Err(ServiceError::DuplicateUsername(username.to_string()));
        }
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str) -> ServiceResult<()> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(ServiceError::DuplicateEmail {
                entity: "user",
                email: email.to_string(),
            });
        }
        Ok(())
    }

    fn reject_login(username: &str) -> ServiceError {
        metrics::counter!("storehouse_auth_failures_total").increment(1);
        debug!(username = %username, "Authentication rejected");
        ServiceError::InvalidCredentials
    }
}

#[async_trait]
impl UserService for StandardUserService {
    async fn create(&self, request: CreateUserRequest) -> ServiceResult<User> {
        validate_password_strength(&request.password)?;
        Self::validate_profile(&request.username, &request.full_name, &request.phone_number)?;
        validate_email(&request.email)?;
        let role = UserRole::parse(&request.role)?;

        self.ensure_username_free(&request.username).await?;
        self.ensure_email_free(&request.email).await?;

        let password_hash = self.hasher.hash(&request.password)?;
        let user = User::new(
            request.username,
            request.email,
            password_hash,
            request.full_name,
            role,
            request.phone_number,
        );
        let user = self.users.create(&user).await?;

        metrics::counter!("storehouse_records_created_total", "entity" => "user").increment(1);
        info!(user_id = %user.id, username = %user.username, role = %user.role, "User created");
        Ok(user)
    }

    async fn update(&self, id: UserId, request: UpdateUserRequest) -> ServiceResult<User> {
        let mut user = self.get(id).await?;

        if let Some(username) = request.username {
            if username != user.username {
                self.ensure_username_free(&username).await?;
            }
            user.username = username;
        }
        if let Some(email) = request.email {
            validate_email(&email)?;
            if email != user.email {
                self.ensure_email_free(&email).await?;
            }
            user.email = email;
        }
        if let Some(full_name) = request.full_name {
            user.full_name = full_name;
        }
        if let Some(raw) = request.role {
            user.role = UserRole::parse(&raw)?;
        }
        if let Some(phone) = request.phone_number {
            user.phone_number = phone;
        }
        if let Some(active) = request.is_active {
            user.is_active = active;
        }
        Self::validate_profile(&user.username, &user.full_name, &user.phone_number)?;

        let user = self
            .users
            .update(&user)
            .await
            .map_err(map_missing("user", id))?;
        info!(user_id = %id, "User updated");
        Ok(user)
    }

    async fn deactivate(&self, id: UserId) -> ServiceResult<()> {
        self.get(id).await?;
        self.users
            .deactivate(id)
            .await
            .map_err(map_missing("user", id))?;
        info!(user_id = %id, "User deactivated");
        Ok(())
    }

    async fn delete(&self, id: UserId) -> ServiceResult<()> {
        self.get(id).await?;
        self.users
            .delete(id)
            .await
            .map_err(map_missing("user", id))?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn get(&self, id: UserId) -> ServiceResult<User> {
        debug!("Fetching user {}", id);
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", id))
    }

    async fn find_by_username(&self, username: &str) -> ServiceResult<User> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", username))
    }

    async fn find_by_email(&self, email: &str) -> ServiceResult<User> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", email))
    }

    async fn list_all(&self) -> ServiceResult<Vec<User>> {
        Ok(self.users.list_all().await?)
    }

    async fn list_by_role(&self, role: &str) -> ServiceResult<Vec<User>> {
        let role = UserRole::parse(role)?;
        Ok(self.users.find_by_role(role).await?)
    }

    async fn list_active(&self) -> ServiceResult<Vec<User>> {
        Ok(self.users.list_active().await?)
    }

    async fn authenticate(&self, username: &str, password: &str) -> ServiceResult<User> {
        let Some(mut user) = self.users.find_by_username(username).await? else {
            return Err(Self::reject_login(username));
        };
        if !user.is_active {
            metrics::counter!("storehouse_auth_failures_total").increment(1);
            return Err(ServiceError::AccountDeactivated);
        }
        if !self.hasher.verify(password, &user.password_hash)? {
            return Err(Self::reject_login(username));
        }

        match self.users.update_last_login(user.id).await {
            Ok(()) => user.last_login = Some(chrono::Utc::now()),
            Err(e) => warn!(user_id = %user.id, error = %e, "Failed to record last login"),
        }

        info!(user_id = %user.id, "User authenticated");
        Ok(user)
    }

    async fn change_password(&self, id: UserId, old_password: &str, new_password: &str) -> ServiceResult<()> {
        let user = self.get(id).await?;
        if !self.hasher.verify(old_password, &user.password_hash)? {
            return Err(ServiceError::InvalidCredentials);
        }
        validate_password_strength(new_password)?;

        let password_hash = self.hasher.hash(new_password)?;
        self.users
            .update_password(id, &password_hash)
            .await
            .map_err(map_missing("user", id))?;
        info!(user_id = %id, "Password changed");
        Ok(())
    }
}
