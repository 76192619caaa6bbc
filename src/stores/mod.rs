// ABOUTME: Store abstractions for the recipe catalog, interaction log, and dietary profiles
// ABOUTME: Async traits with in-memory and SQLite implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

//! # Stores
//!
//! The recommender reads fully materialized snapshots from three stores and
//! never holds a store lock across its own computation. Implementations must
//! be `Send + Sync` so one instance can be shared behind an `Arc`.

use async_trait::async_trait;
use nutriveci_core::errors::StoreError;
use nutriveci_core::models::{DietaryProfile, Interaction, Recipe};
use std::sync::Arc;

/// In-memory implementation of all three stores
pub mod memory;

/// `SQLite` implementation of all three stores
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::InMemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Recipe catalog
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Every recipe, in catalog order
    async fn get_recipes(&self) -> StoreResult<Vec<Recipe>>;

    /// Replace the whole catalog, returning the new size
    async fn replace_catalog(&self, recipes: Vec<Recipe>) -> StoreResult<usize>;
}

/// Append-only interaction log
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Every interaction, in append order
    async fn get_interactions(&self) -> StoreResult<Vec<Interaction>>;

    /// Append one record (never an upsert)
    async fn append_interaction(&self, interaction: Interaction) -> StoreResult<()>;

    /// Number of records in the log
    async fn interaction_count(&self) -> StoreResult<usize> {
        Ok(self.get_interactions().await?.len())
    }

    /// Records belonging to one user, in append order
    async fn get_user_interactions(&self, user_id: &str) -> StoreResult<Vec<Interaction>> {
        Ok(self
            .get_interactions()
            .await?
            .into_iter()
            .filter(|interaction| interaction.user_id == user_id)
            .collect())
    }
}

/// Per-user dietary profiles (last write wins)
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Stored profile, if any
    async fn get_profile(&self, user_id: &str) -> StoreResult<Option<DietaryProfile>>;

    /// Insert or replace the profile for `user_id`
    async fn set_profile(&self, user_id: &str, profile: DietaryProfile) -> StoreResult<()>;
}

/// Shared handles to the three stores
///
/// A single backend usually implements all three; [`Stores::from_shared`]
/// builds the bundle from one `Arc`.
#[derive(Clone)]
pub struct Stores {
    /// Recipe catalog
    pub catalog: Arc<dyn CatalogStore>,
    /// Interaction log
    pub interactions: Arc<dyn InteractionStore>,
    /// Dietary profiles
    pub profiles: Arc<dyn ProfileStore>,
}

impl Stores {
    /// Bundle separate store implementations
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        interactions: Arc<dyn InteractionStore>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            catalog,
            interactions,
            profiles,
        }
    }

    /// Use one backend for all three stores
    #[must_use]
    pub fn from_shared<S>(store: Arc<S>) -> Self
    where
        S: CatalogStore + InteractionStore + ProfileStore + 'static,
    {
        Self {
            catalog: store.clone(),
            interactions: store.clone(),
            profiles: store,
        }
    }
}
