// ABOUTME: Recommender configuration container with env overrides and validation
// ABOUTME: Re-exports factorization, strategy, and filter configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

//! Recommender Configuration Module
//!
//! Configuration is loaded as defaults, then `NUTRIVECI_*` environment
//! overrides, then validated. The result is passed explicitly to the services
//! that need it; there is no process-wide instance.

pub mod error;
pub mod recommendation;

pub use error::ConfigError;
pub use recommendation::{FactorizationConfig, FilterConfig, RetrainPolicy, StrategyConfig};

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Main recommender configuration container
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommenderConfig {
    /// Latent factor model hyperparameters
    pub factorization: FactorizationConfig,
    /// Strategy selection and request limits
    pub strategy: StrategyConfig,
    /// Dietary filter limits
    pub filter: FilterConfig,
}

impl RecommenderConfig {
    /// Load configuration from defaults and environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or validation fails
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.factorization;
        if f.factors == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "factorization.factors must be at least 1",
            ));
        }
        if f.epochs == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "factorization.epochs must be at least 1",
            ));
        }
        if !(f.learning_rate.is_finite() && f.learning_rate > 0.0) {
            return Err(ConfigError::ValueOutOfRange(
                "factorization.learning_rate must be positive",
            ));
        }
        // Zero regularization lets degenerate inputs drift; it must stay positive
        if !(f.regularization.is_finite() && f.regularization > 0.0) {
            return Err(ConfigError::ValueOutOfRange(
                "factorization.regularization must be positive",
            ));
        }
        if !(f.init_std_dev.is_finite() && f.init_std_dev >= 0.0) {
            return Err(ConfigError::ValueOutOfRange(
                "factorization.init_std_dev must be non-negative",
            ));
        }
        if !(f.rating_min.is_finite() && f.rating_max.is_finite()) || f.rating_min >= f.rating_max
        {
            return Err(ConfigError::InvalidRange(
                "factorization.rating_min must be below rating_max",
            ));
        }
        if f.min_interactions == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "factorization.min_interactions must be at least 1",
            ));
        }

        let s = &self.strategy;
        if s.max_results == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "strategy.max_results must be at least 1",
            ));
        }
        if s.default_results == 0 || s.default_results > s.max_results {
            return Err(ConfigError::InvalidRange(
                "strategy.default_results must be within 1..=max_results",
            ));
        }

        let filter = &self.filter;
        if !(filter.sodium_limit.is_finite() && filter.sugar_limit.is_finite()) {
            return Err(ConfigError::ValueOutOfRange(
                "filter nutrient limits must be finite",
            ));
        }
        Ok(())
    }

    /// Helper function to parse and apply an environment variable override
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }

    /// Comma-separated term list override
    fn apply_env_terms(env_var_name: &str, target: &mut Vec<String>) {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .split(',')
                .map(|term| term.trim().to_lowercase())
                .filter(|term| !term.is_empty())
                .collect();
        }
    }

    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Factorization overrides
        Self::apply_env_var(
            "NUTRIVECI_MODEL_ENABLED",
            &mut self.factorization.enabled,
        )?;
        Self::apply_env_var("NUTRIVECI_MODEL_FACTORS", &mut self.factorization.factors)?;
        Self::apply_env_var("NUTRIVECI_MODEL_EPOCHS", &mut self.factorization.epochs)?;
        Self::apply_env_var(
            "NUTRIVECI_MODEL_LEARNING_RATE",
            &mut self.factorization.learning_rate,
        )?;
        Self::apply_env_var(
            "NUTRIVECI_MODEL_REGULARIZATION",
            &mut self.factorization.regularization,
        )?;
        Self::apply_env_var(
            "NUTRIVECI_MODEL_MIN_INTERACTIONS",
            &mut self.factorization.min_interactions,
        )?;
        if let Ok(seed) = env::var("NUTRIVECI_MODEL_SEED") {
            let seed = seed
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid NUTRIVECI_MODEL_SEED".to_owned()))?;
            self.factorization.random_seed = Some(seed);
        }

        // Strategy overrides
        Self::apply_env_var(
            "NUTRIVECI_COLD_START_MIN_INTERACTIONS",
            &mut self.strategy.cold_start_min_interactions,
        )?;
        Self::apply_env_var(
            "NUTRIVECI_RETRAIN_POLICY",
            &mut self.strategy.retrain_policy,
        )?;
        Self::apply_env_var(
            "NUTRIVECI_DEFAULT_RESULTS",
            &mut self.strategy.default_results,
        )?;
        Self::apply_env_var("NUTRIVECI_MAX_RESULTS", &mut self.strategy.max_results)?;

        // Filter overrides
        Self::apply_env_var("NUTRIVECI_SODIUM_LIMIT", &mut self.filter.sodium_limit)?;
        Self::apply_env_var("NUTRIVECI_SUGAR_LIMIT", &mut self.filter.sugar_limit)?;
        Self::apply_env_var("NUTRIVECI_SENIOR_AGE", &mut self.filter.senior_age)?;
        Self::apply_env_terms(
            "NUTRIVECI_HYPERTENSION_TERMS",
            &mut self.filter.hypertension_terms,
        );
        Self::apply_env_terms("NUTRIVECI_DIABETES_TERMS", &mut self.filter.diabetes_terms);

        Ok(self)
    }
}
