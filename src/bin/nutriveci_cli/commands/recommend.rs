// ABOUTME: Recommendation commands for nutriveci-cli
// ABOUTME: Records interactions, retrains the model, and prints ranked recipes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

use nutriveci::errors::{AppError, AppResult};
use nutriveci::models::RecipeId;
use nutriveci::recommender::Recommender;
use tracing::{info, warn};

use crate::helpers::display::display_recommendations;

/// Fit the model on stored interactions, then recommend
pub async fn recommend(
    recommender: &Recommender,
    user: &str,
    count: Option<usize>,
    filter_by_profile: bool,
) -> AppResult<()> {
    // Each invocation starts with an empty model slot
    if !recommender.retrain().await {
        info!("No model published, recommendations will use popularity");
    }

    let count = count.unwrap_or_else(|| recommender.default_count());
    let result = recommender.recommend(user, count, filter_by_profile).await;

    display_recommendations(user, &result)?;
    Ok(())
}

/// Append one interaction
pub async fn interact(
    recommender: &Recommender,
    user: &str,
    recipe: &str,
    rating: f64,
) -> AppResult<()> {
    let recipe_id = parse_recipe_id(recipe)?;
    let outcome = recommender.add_interaction(user, recipe_id, rating).await?;
    println!(
        "Recorded interaction {user} -> {recipe} ({rating}); {} interactions stored",
        outcome.total_interactions
    );
    if outcome.retrained {
        println!("Model retrained");
    }
    Ok(())
}

/// Parse `source:id` or a legacy `source_id` recipe identifier
fn parse_recipe_id(recipe: &str) -> AppResult<RecipeId> {
    recipe
        .parse::<RecipeId>()
        .map_err(|e| AppError::invalid_input(e.to_string()))
}

/// Refit and report whether a model was published
pub async fn retrain(recommender: &Recommender) -> AppResult<()> {
    if recommender.retrain().await {
        let status = recommender.model_status();
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        warn!("Retrain did not publish a model");
        println!("No model published (too few interactions or model disabled)");
    }
    Ok(())
}
