// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0
//! Storehouse CLI library - exposes testable components

pub mod commands;
