// ABOUTME: Dietary profile commands for nutriveci-cli
// ABOUTME: Stores and prints per-user pathologies, allergies, and age
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

use nutriveci::errors::AppResult;
use nutriveci::models::DietaryProfile;
use nutriveci::recommender::Recommender;

/// Store a profile built from comma-separated answers
pub async fn set(
    recommender: &Recommender,
    user: &str,
    pathologies: &str,
    allergies: &str,
    age: Option<u32>,
) -> AppResult<()> {
    let profile = DietaryProfile::from_comma_lists(user, pathologies, allergies, age);
    recommender.set_user_profile(user, profile).await?;
    println!("Profile stored for {user}");
    show(recommender, user).await
}

/// Print the stored profile as JSON
pub async fn show(recommender: &Recommender, user: &str) -> AppResult<()> {
    match recommender.get_user_profile(user).await? {
        Some(profile) => println!("{}", serde_json::to_string_pretty(&profile)?),
        None => println!("No profile stored for {user}"),
    }
    Ok(())
}
