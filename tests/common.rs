// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Provides catalog builders, seeded configuration, and a failing store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `nutriveci`
//!
//! This module provides common fixtures to reduce duplication across
//! integration tests.

use async_trait::async_trait;
use nutriveci::config::RecommenderConfig;
use nutriveci::errors::StoreError;
use nutriveci::models::{DietaryProfile, Interaction, NutritionFacts, Recipe, RecipeId};
use nutriveci::recommender::Recommender;
use nutriveci::stores::{
    CatalogStore, InMemoryStore, InteractionStore, ProfileStore, StoreResult, Stores,
};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("warn")
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Recipe with a sodium value
pub fn recipe_with_sodium(native_id: &str, sodium: f64) -> Recipe {
    Recipe::new(RecipeId::local(native_id), format!("Recipe {native_id}")).with_nutrition(
        NutritionFacts {
            sodium: Some(sodium),
            ..NutritionFacts::default()
        },
    )
}

/// `count` plain Food.com recipes with ids `1..=count`
pub fn catalog(count: usize) -> Vec<Recipe> {
    (1..=count)
        .map(|i| {
            Recipe::new(RecipeId::foodcom(i.to_string()), format!("Recipe {i}"))
                .with_ingredients(["salt", "water"])
        })
        .collect()
}

/// Configuration with a fixed seed so training is reproducible
pub fn seeded_config() -> RecommenderConfig {
    let mut config = RecommenderConfig::default();
    config.factorization.random_seed = Some(7);
    config
}

/// Recommender over an in-memory store
pub fn recommender_with(store: Arc<InMemoryStore>, config: RecommenderConfig) -> Recommender {
    init_test_logging();
    Recommender::new(Stores::from_shared(store), config)
}

/// Append background interactions from users other than the one under test
///
/// Recipe `foodcom:1` gets the most records, then `foodcom:2`, and so on.
pub async fn seed_background(store: &InMemoryStore, recipes: usize, users: usize) {
    for user in 0..users {
        for recipe in 1..=recipes.saturating_sub(user) {
            store
                .append_interaction(Interaction::new(
                    format!("background-{user}"),
                    RecipeId::foodcom(recipe.to_string()),
                    if recipe % 2 == 0 { 0.5 } else { 1.0 },
                ))
                .await
                .unwrap();
        }
    }
}

/// Which store operations should fail
#[derive(Debug, Default, Clone, Copy)]
pub struct Failures {
    pub catalog: bool,
    pub interactions: bool,
    pub profiles: bool,
}

/// Store wrapper that reports `Unavailable` for the selected operations
pub struct FailingStore {
    inner: InMemoryStore,
    failures: Failures,
}

impl FailingStore {
    pub const fn new(inner: InMemoryStore, failures: Failures) -> Self {
        Self { inner, failures }
    }

    pub const fn inner(&self) -> &InMemoryStore {
        &self.inner
    }
}

#[async_trait]
impl CatalogStore for FailingStore {
    async fn get_recipes(&self) -> StoreResult<Vec<Recipe>> {
        if self.failures.catalog {
            return Err(StoreError::unavailable("catalog", "connection refused"));
        }
        self.inner.get_recipes().await
    }

    async fn replace_catalog(&self, recipes: Vec<Recipe>) -> StoreResult<usize> {
        self.inner.replace_catalog(recipes).await
    }
}

#[async_trait]
impl InteractionStore for FailingStore {
    async fn get_interactions(&self) -> StoreResult<Vec<Interaction>> {
        if self.failures.interactions {
            return Err(StoreError::unavailable("interactions", "connection refused"));
        }
        self.inner.get_interactions().await
    }

    async fn append_interaction(&self, interaction: Interaction) -> StoreResult<()> {
        self.inner.append_interaction(interaction).await
    }
}

#[async_trait]
impl ProfileStore for FailingStore {
    async fn get_profile(&self, user_id: &str) -> StoreResult<Option<DietaryProfile>> {
        if self.failures.profiles {
            return Err(StoreError::unavailable("profiles", "connection refused"));
        }
        self.inner.get_profile(user_id).await
    }

    async fn set_profile(&self, user_id: &str, profile: DietaryProfile) -> StoreResult<()> {
        self.inner.set_profile(user_id, profile).await
    }
}
