// ABOUTME: Process-level configuration assembled from environment variables
// ABOUTME: Resolves the data directory, database location, logging, and recommender settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

use super::database::DatabaseUrl;
use crate::logging::LoggingConfig;
use nutriveci_core::errors::{AppError, AppResult};
use nutriveci_intelligence::RecommenderConfig;
use std::env;
use std::path::PathBuf;

/// Everything a process needs to construct the recommender
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory for the database and imported files
    pub data_dir: PathBuf,
    /// Database location
    pub database: DatabaseUrl,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Recommender tunables
    pub recommender: RecommenderConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// - `NUTRIVECI_DATA_DIR`: defaults to `<platform data dir>/nutriveci`
    /// - `DATABASE_URL`: defaults to `sqlite:<data_dir>/nutriveci.db`
    /// - `NUTRIVECI_*`: recommender overrides (see [`RecommenderConfig::load`])
    ///
    /// # Errors
    ///
    /// Returns a config error if a recommender override is invalid
    pub fn from_env() -> AppResult<Self> {
        let data_dir = env::var("NUTRIVECI_DATA_DIR")
            .map_or_else(|_| default_data_dir(), PathBuf::from);
        let database = env::var("DATABASE_URL").map_or_else(
            |_| DatabaseUrl::in_data_dir(&data_dir),
            |url| DatabaseUrl::parse_url(&url),
        );
        let recommender = RecommenderConfig::load()
            .map_err(|e| AppError::config(format!("Invalid recommender configuration: {e}")))?;

        Ok(Self {
            data_dir,
            database,
            logging: LoggingConfig::from_env(),
            recommender,
        })
    }
}

/// Platform data directory, or `./data` where none exists
fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from("./data"), |dir| dir.join("nutriveci"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_database_defaults_to_data_dir() {
        env::set_var("NUTRIVECI_DATA_DIR", "/tmp/nutriveci-test");
        env::remove_var("DATABASE_URL");
        let config = ServerConfig::from_env().unwrap();
        env::remove_var("NUTRIVECI_DATA_DIR");

        assert_eq!(config.data_dir, PathBuf::from("/tmp/nutriveci-test"));
        assert_eq!(
            config.database.to_connection_string(),
            "sqlite:/tmp/nutriveci-test/nutriveci.db"
        );
    }

    #[test]
    #[serial]
    fn test_invalid_recommender_override_is_config_error() {
        env::set_var("NUTRIVECI_MODEL_REGULARIZATION", "0");
        let result = ServerConfig::from_env();
        env::remove_var("NUTRIVECI_MODEL_REGULARIZATION");
        assert!(result.is_err());
    }
}
