// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the Storehouse CLI

pub mod config;
pub mod migrate;
pub mod serve;

pub use self::config::ConfigCommand;
