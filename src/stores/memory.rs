// ABOUTME: In-memory catalog, interaction, and profile store for tests and ephemeral runs
// ABOUTME: Backed by tokio RwLocks; snapshots are cloned out so no lock outlives a call
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

use super::{CatalogStore, InteractionStore, ProfileStore, StoreResult};
use async_trait::async_trait;
use nutriveci_core::models::{DietaryProfile, Interaction, Recipe};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local store implementing all three store traits
#[derive(Debug, Default)]
pub struct InMemoryStore {
    recipes: RwLock<Vec<Recipe>>,
    interactions: RwLock<Vec<Interaction>>,
    profiles: RwLock<HashMap<String, DietaryProfile>>,
}

impl InMemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a catalog
    #[must_use]
    pub fn with_recipes(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: RwLock::new(recipes),
            ..Self::default()
        }
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn get_recipes(&self) -> StoreResult<Vec<Recipe>> {
        Ok(self.recipes.read().await.clone())
    }

    async fn replace_catalog(&self, recipes: Vec<Recipe>) -> StoreResult<usize> {
        let size = recipes.len();
        *self.recipes.write().await = recipes;
        Ok(size)
    }
}

#[async_trait]
impl InteractionStore for InMemoryStore {
    async fn get_interactions(&self) -> StoreResult<Vec<Interaction>> {
        Ok(self.interactions.read().await.clone())
    }

    async fn append_interaction(&self, interaction: Interaction) -> StoreResult<()> {
        self.interactions.write().await.push(interaction);
        Ok(())
    }

    async fn interaction_count(&self) -> StoreResult<usize> {
        Ok(self.interactions.read().await.len())
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn get_profile(&self, user_id: &str) -> StoreResult<Option<DietaryProfile>> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn set_profile(&self, user_id: &str, profile: DietaryProfile) -> StoreResult<()> {
        let profile = DietaryProfile {
            user_id: user_id.to_owned(),
            ..profile
        };
        self.profiles
            .write()
            .await
            .insert(user_id.to_owned(), profile);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutriveci_core::models::RecipeId;

    #[tokio::test]
    async fn test_append_is_not_an_upsert() {
        let store = InMemoryStore::new();
        for _ in 0..2 {
            store
                .append_interaction(Interaction::new("u1", RecipeId::local("r"), 1.0))
                .await
                .unwrap();
        }
        assert_eq!(store.interaction_count().await.unwrap(), 2);
        assert_eq!(store.get_user_interactions("u1").await.unwrap().len(), 2);
        assert!(store.get_user_interactions("u2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_profile_last_write_wins() {
        let store = InMemoryStore::new();
        store
            .set_profile("u1", DietaryProfile::new("u1").with_age(30))
            .await
            .unwrap();
        store
            .set_profile("u1", DietaryProfile::new("other").with_age(40))
            .await
            .unwrap();
        let profile = store.get_profile("u1").await.unwrap().unwrap();
        assert_eq!(profile.age, Some(40));
        assert_eq!(profile.user_id, "u1");
    }
}
