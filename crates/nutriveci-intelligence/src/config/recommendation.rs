// ABOUTME: Recommender configuration for model training, strategy selection, and filtering
// ABOUTME: Configures factorization hyperparameters, cold-start thresholds, and dietary limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

//! Recommendation Engine Configuration
//!
//! Provides configuration for the hybrid recommender including the latent
//! factor model hyperparameters, the thresholds that decide between the model
//! and popularity strategies, and the limits used by the dietary filter.

use super::ConfigError;
use nutriveci_core::constants::{dietary, factorization, ratings, strategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Latent factor model hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorizationConfig {
    /// Whether model-based scoring is available at all
    pub enabled: bool,
    /// Latent dimensionality (k)
    pub factors: usize,
    /// Passes over the interaction table
    pub epochs: usize,
    /// SGD step size
    pub learning_rate: f64,
    /// L2 regularization (must be strictly positive)
    pub regularization: f64,
    /// Standard deviation of initial factor values
    pub init_std_dev: f64,
    /// Lower bound of the rating scale
    pub rating_min: f64,
    /// Upper bound of the rating scale
    pub rating_max: f64,
    /// Minimum interactions required before training
    pub min_interactions: usize,
    /// Seed for factor initialization (entropy when unset)
    pub random_seed: Option<u64>,
}

/// When an interaction append triggers a synchronous retrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RetrainPolicy {
    /// Retrain when the interaction count reaches the threshold (or no model exists yet)
    #[default]
    ThresholdCrossing,
    /// Retrain after every append at or above the threshold
    EveryAppend,
}

impl FromStr for RetrainPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "threshold_crossing" | "threshold" => Ok(Self::ThresholdCrossing),
            "every_append" | "always" => Ok(Self::EveryAppend),
            other => Err(ConfigError::Parse(format!("unknown retrain policy '{other}'"))),
        }
    }
}

/// Strategy selection and request limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Distinct interacted recipes a user needs before the model path is used
    pub cold_start_min_interactions: usize,
    /// Retrain trigger on interaction append
    pub retrain_policy: RetrainPolicy,
    /// Result count when the caller does not ask for one
    pub default_results: usize,
    /// Upper bound on results per request
    pub max_results: usize,
}

/// Dietary filter limits (units as stored in the catalog)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Sodium at or above this value is excluded for hypertension
    pub sodium_limit: f64,
    /// Sugar at or above this value is excluded for diabetes
    pub sugar_limit: f64,
    /// Users strictly older than this prefer non-hard recipes
    pub senior_age: u32,
    /// Pathology tokens in the hypertension family
    pub hypertension_terms: Vec<String>,
    /// Pathology tokens triggering the sugar rule
    pub diabetes_terms: Vec<String>,
}

impl Default for FactorizationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            factors: factorization::DEFAULT_FACTORS,
            epochs: factorization::DEFAULT_EPOCHS,
            learning_rate: factorization::DEFAULT_LEARNING_RATE,
            regularization: factorization::DEFAULT_REGULARIZATION,
            init_std_dev: factorization::DEFAULT_INIT_STD_DEV,
            rating_min: ratings::SCALE_MIN,
            rating_max: ratings::SCALE_MAX,
            min_interactions: factorization::MIN_TRAINING_INTERACTIONS,
            random_seed: None,
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            cold_start_min_interactions: strategy::COLD_START_MIN_INTERACTIONS,
            retrain_policy: RetrainPolicy::default(),
            default_results: strategy::DEFAULT_RESULTS,
            max_results: strategy::MAX_RESULTS,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            sodium_limit: dietary::SODIUM_LIMIT,
            sugar_limit: dietary::SUGAR_LIMIT,
            senior_age: dietary::SENIOR_AGE,
            hypertension_terms: dietary::HYPERTENSION_TERMS
                .iter()
                .map(|term| (*term).to_owned())
                .collect(),
            diabetes_terms: dietary::DIABETES_TERMS
                .iter()
                .map(|term| (*term).to_owned())
                .collect(),
        }
    }
}
