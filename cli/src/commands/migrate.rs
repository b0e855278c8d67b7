// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

//! `storehouse migrate`

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use storehouse_core::domain::config::StorehouseConfig;
use storehouse_core::domain::repository::StorageBackend;
use storehouse_core::infrastructure::db::Database;

pub async fn run(config_path: Option<PathBuf>) -> Result<()> {
    let config =
        StorehouseConfig::load_or_default(config_path).context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    let StorageBackend::PostgreSQL(pg) = config.storage_backend() else {
        anyhow::bail!(
            "Migrations require the postgres backend. Set spec.database.backend and spec.database.url, or DATABASE_URL."
        );
    };

    let db = Database::connect(&pg).await?;
    db.migrate().await?;

    println!("{}", "✓ Database schema is up to date".green());
    Ok(())
}
