// ABOUTME: Popularity ranking of recipes by aggregate interaction count across all users
// ABOUTME: Used for cold-start users and whenever personalized scores are unavailable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

use nutriveci_core::models::{Interaction, Recipe, RecipeId};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

/// Ranks candidates by how many interaction records reference them
///
/// Recipes never interacted with count as zero and sort last. Ties keep
/// candidate order. With no interaction data at all the order is shuffled.
#[derive(Debug, Clone, Default)]
pub struct PopularityRanker {
    seed: Option<u64>,
}

impl PopularityRanker {
    /// Create a ranker; `seed` fixes the shuffle used when no data exists
    #[must_use]
    pub const fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    /// Interaction record count per recipe
    #[must_use]
    pub fn counts(interactions: &[Interaction]) -> HashMap<&RecipeId, usize> {
        let mut counts: HashMap<&RecipeId, usize> = HashMap::new();
        for interaction in interactions {
            *counts.entry(&interaction.recipe_id).or_default() += 1;
        }
        counts
    }

    /// Order `candidates` by popularity, most popular first
    #[must_use]
    pub fn rank<'a>(
        &self,
        mut candidates: Vec<&'a Recipe>,
        interactions: &[Interaction],
    ) -> Vec<(&'a Recipe, usize)> {
        if interactions.is_empty() {
            let mut rng = self
                .seed
                .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
            candidates.shuffle(&mut rng);
            return candidates.into_iter().map(|recipe| (recipe, 0)).collect();
        }

        let counts = Self::counts(interactions);
        let mut ranked: Vec<(&'a Recipe, usize)> = candidates
            .into_iter()
            .map(|recipe| (recipe, counts.get(&recipe.id).copied().unwrap_or(0)))
            .collect();
        // sort_by is stable: equal counts keep catalog order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}
