// ABOUTME: Integration tests for environment-driven configuration
// ABOUTME: Verifies NUTRIVECI_* overrides reach the recommender and invalid values are rejected
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{catalog, recommender_with, seed_background};
use nutriveci::config::{DatabaseUrl, RecommenderConfig, RetrainPolicy, ServerConfig};
use nutriveci::errors::ErrorCode;
use nutriveci::models::RecipeId;
use nutriveci::recommender::{Diagnostic, Strategy};
use nutriveci::stores::InMemoryStore;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

const OVERRIDES: &[&str] = &[
    "NUTRIVECI_COLD_START_MIN_INTERACTIONS",
    "NUTRIVECI_MAX_RESULTS",
    "NUTRIVECI_DEFAULT_RESULTS",
    "NUTRIVECI_RETRAIN_POLICY",
    "NUTRIVECI_MODEL_SEED",
    "NUTRIVECI_MODEL_FACTORS",
    "NUTRIVECI_SODIUM_LIMIT",
    "NUTRIVECI_HYPERTENSION_TERMS",
    "DATABASE_URL",
    "NUTRIVECI_DATA_DIR",
];

fn clear_overrides() {
    for name in OVERRIDES {
        env::remove_var(name);
    }
}

#[test]
#[serial]
fn test_defaults_without_overrides() {
    clear_overrides();
    let config = RecommenderConfig::load().unwrap();

    assert_eq!(config.strategy.cold_start_min_interactions, 3);
    assert_eq!(config.factorization.min_interactions, 10);
    assert_eq!(config.strategy.max_results, 20);
    assert_eq!(config.strategy.retrain_policy, RetrainPolicy::ThresholdCrossing);
    assert!(config.factorization.random_seed.is_none());
}

#[test]
#[serial]
fn test_filter_terms_override() {
    clear_overrides();
    env::set_var("NUTRIVECI_HYPERTENSION_TERMS", "Tensión Alta, HTA");
    env::set_var("NUTRIVECI_SODIUM_LIMIT", "400");
    let config = RecommenderConfig::load().unwrap();
    clear_overrides();

    assert_eq!(config.filter.hypertension_terms, vec!["tensión alta", "hta"]);
    assert!((config.filter.sodium_limit - 400.0).abs() < f64::EPSILON);
}

#[test]
#[serial]
fn test_default_results_above_max_is_rejected() {
    clear_overrides();
    env::set_var("NUTRIVECI_MAX_RESULTS", "3");
    env::set_var("NUTRIVECI_DEFAULT_RESULTS", "5");
    let result = ServerConfig::from_env();
    clear_overrides();

    let err = result.unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigError);
}

#[test]
#[serial]
fn test_database_url_override() {
    clear_overrides();
    env::set_var("DATABASE_URL", "sqlite::memory:");
    env::set_var("NUTRIVECI_DATA_DIR", "/tmp/nutriveci-config-test");
    let config = ServerConfig::from_env().unwrap();
    clear_overrides();

    assert_eq!(config.database, DatabaseUrl::Memory);
    assert_eq!(config.data_dir, PathBuf::from("/tmp/nutriveci-config-test"));
}

#[tokio::test]
#[serial]
async fn test_overrides_change_recommender_behavior() {
    clear_overrides();
    env::set_var("NUTRIVECI_COLD_START_MIN_INTERACTIONS", "1");
    env::set_var("NUTRIVECI_MAX_RESULTS", "2");
    env::set_var("NUTRIVECI_DEFAULT_RESULTS", "2");
    env::set_var("NUTRIVECI_MODEL_SEED", "11");
    env::set_var("NUTRIVECI_MODEL_FACTORS", "4");
    let config = RecommenderConfig::load().unwrap();
    clear_overrides();

    let store = Arc::new(InMemoryStore::with_recipes(catalog(6)));
    seed_background(&store, 6, 5).await;
    let recommender = recommender_with(store, config);
    assert!(recommender.retrain().await);
    recommender
        .add_interaction("ana", RecipeId::foodcom("1"), 1.0)
        .await
        .unwrap();

    let result = recommender.recommend("ana", 5, true).await;

    assert_eq!(result.strategy, Some(Strategy::Model));
    assert_eq!(result.recipes.len(), 2);
    assert!(result.has_diagnostic(|d| matches!(
        d,
        Diagnostic::CountClamped {
            requested: 5,
            effective: 2
        }
    )));
}
