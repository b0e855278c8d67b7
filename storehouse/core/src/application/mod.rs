// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Application Layer
//!
//! Use-case services that validate input, enforce cross-entity references and
//! drive the repositories. One trait and one `Standard*` implementation per
//! aggregate.

pub mod account_service;
pub mod error;
pub mod expenditure_service;
pub mod member_service;
pub mod members_group_service;
pub mod receipt_service;
pub mod repository_factory;
pub mod services;
pub mod transaction_service;
pub mod transfer_service;
pub mod user_service;

pub use error::{ErrorKind, ServiceError, ServiceResult};
pub use repository_factory::{create_repositories, Repositories};
pub use services::Services;
