// ABOUTME: Configuration error types for recommender validation
// ABOUTME: Defines error variants for invalid ranges, env parsing, and validation failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

//! Configuration error types for recommender validation.

use std::env;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Value outside acceptable range (e.g., zero regularization)
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// Environment variable access error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] env::VarError),

    /// Failed to parse configuration value
    #[error("Parse error: {0}")]
    Parse(String),

    /// Numeric value outside valid range for parameter
    #[error("Value out of range: {0}")]
    ValueOutOfRange(&'static str),
}
