// ABOUTME: Command implementations for nutriveci-cli
// ABOUTME: Catalog import, recommendation, interaction, and profile commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

pub mod catalog;
pub mod profile;
pub mod recommend;
