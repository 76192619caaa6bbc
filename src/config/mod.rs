// ABOUTME: Process configuration module
// ABOUTME: Re-exports database location and environment-driven server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

/// Database location parsing
pub mod database;
/// Environment-driven server configuration
pub mod environment;

pub use database::DatabaseUrl;
pub use environment::ServerConfig;
pub use nutriveci_intelligence::config::{
    FactorizationConfig, FilterConfig, RecommenderConfig, RetrainPolicy, StrategyConfig,
};
