// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0
//! # storehouse-core
//!
//! Church treasury ledger: accounts, members and groups, transactions with
//! their receipts, expenditures and transfers, and operator users.
//!
//! | Layer | Module |
//! |-------|--------|
//! | Domain | entities, validation rules, repository traits, configuration |
//! | Application | `Standard*Service` use cases and service wiring |
//! | Infrastructure | PostgreSQL and in-memory repositories, credential hashing |
//! | Presentation | axum HTTP API |

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
