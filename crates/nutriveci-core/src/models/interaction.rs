// ABOUTME: Append-only interaction events linking users to recipes
// ABOUTME: Defines Interaction and the borrowed RatingTriple used for training
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

use super::recipe::RecipeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded user/recipe interaction
///
/// Ratings encode engagement strength (`0.5` viewed, `1.0` saved), not stars.
/// Interactions are never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// User that interacted
    pub user_id: String,
    /// Recipe interacted with
    pub recipe_id: RecipeId,
    /// Engagement strength
    pub rating: f64,
    /// Local append time
    pub timestamp: DateTime<Utc>,
}

impl Interaction {
    /// Create an interaction stamped with the current time
    pub fn new(user_id: impl Into<String>, recipe_id: RecipeId, rating: f64) -> Self {
        Self {
            user_id: user_id.into(),
            recipe_id,
            rating,
            timestamp: Utc::now(),
        }
    }

    /// Borrow this interaction as a training triple
    #[must_use]
    pub fn as_triple(&self) -> RatingTriple<'_> {
        RatingTriple {
            user_id: &self.user_id,
            recipe_id: &self.recipe_id,
            rating: self.rating,
        }
    }
}

/// Borrowed `(user, recipe, rating)` view used by model training
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingTriple<'a> {
    /// User identifier
    pub user_id: &'a str,
    /// Recipe identifier
    pub recipe_id: &'a RecipeId,
    /// Rating value
    pub rating: f64,
}
