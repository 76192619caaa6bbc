// ABOUTME: Domain models for the recommendation engine
// ABOUTME: Re-exports recipe, interaction, and dietary profile types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

/// Recipe catalog records and structured identifiers
pub mod recipe;

/// User/recipe interaction events
pub mod interaction;

/// Per-user dietary and health profile
pub mod profile;

pub use interaction::{Interaction, RatingTriple};
pub use profile::DietaryProfile;
pub use recipe::{Difficulty, NutritionFacts, Recipe, RecipeId, RecipeIdParseError, RecipeSource};
