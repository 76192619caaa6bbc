// ABOUTME: Output formatting helpers for nutriveci-cli
// ABOUTME: Prints import reports, recommendation lists, and status summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

use nutriveci::catalog::ImportReport;
use nutriveci::errors::AppResult;
use nutriveci::recommender::{ModelStatus, Recommendations};
use serde_json::json;
use std::collections::BTreeMap;

/// Display the outcome of a catalog import
pub fn display_import_report(report: &ImportReport) {
    println!("\nCatalog import finished");
    println!("{}", "=".repeat(60));
    println!("   Format: {:?}", report.format);
    println!("   Imported: {}", report.imported);
    println!("   Duplicate rows skipped: {}", report.duplicates);
    println!("   Recipes kept from other sources: {}", report.retained);
    println!("   Catalog size: {}", report.catalog_size);
}

/// Display a ranked recommendation list followed by its diagnostics
pub fn display_recommendations(user: &str, result: &Recommendations) -> AppResult<()> {
    let strategy = result
        .strategy
        .map_or_else(|| "none".to_owned(), |s| s.to_string());
    println!("\nRecommendations for {user} (strategy: {strategy})");
    println!("{}", "=".repeat(60));

    if result.recipes.is_empty() {
        println!("   (no recipes)");
    }
    for (rank, recipe) in result.recipes.iter().enumerate() {
        println!("{:>3}. {} [{}]", rank + 1, recipe.name, recipe.id);
    }

    if !result.diagnostics.is_empty() {
        println!("\nDiagnostics:");
        for diagnostic in &result.diagnostics {
            println!("   {}", serde_json::to_string(diagnostic)?);
        }
    }
    Ok(())
}

/// Display store counts and the model summary as JSON
pub fn display_status(
    recipes_by_source: &BTreeMap<String, usize>,
    interactions: usize,
    model: &ModelStatus,
) -> AppResult<()> {
    let status = json!({
        "catalog": recipes_by_source,
        "catalog_size": recipes_by_source.values().sum::<usize>(),
        "interactions": interactions,
        "model": model,
    });
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
