// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

pub mod db;
pub mod password;
pub mod repositories;
