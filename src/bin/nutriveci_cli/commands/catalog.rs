// ABOUTME: Catalog commands for nutriveci-cli
// ABOUTME: Imports Food.com and local catalog files and reports store status
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

use nutriveci::catalog::{CatalogFormat, CatalogImporter};
use nutriveci::errors::AppResult;
use nutriveci::recommender::Recommender;
use nutriveci::stores::{CatalogStore, InteractionStore, SqliteStore};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::helpers::display::{display_import_report, display_status};

/// Import `file` as `format`
pub async fn import(
    store: &SqliteStore,
    format: CatalogFormat,
    file: &Path,
    limit: Option<usize>,
) -> AppResult<()> {
    info!("Importing {:?} catalog from {}", format, file.display());

    let importer = match limit {
        Some(rows) => CatalogImporter::new().with_max_rows(rows),
        None => CatalogImporter::new(),
    };
    let report = importer.import_file(store, file, format).await?;

    display_import_report(&report);
    Ok(())
}

/// Print catalog, interaction, and model status
///
/// The model lives in process memory, so the status reflects a fresh fit of
/// the stored interactions.
pub async fn status(store: &SqliteStore, recommender: &Recommender) -> AppResult<()> {
    let recipes = store.get_recipes().await?;
    let interactions = store.interaction_count().await?;

    let mut by_source: BTreeMap<String, usize> = BTreeMap::new();
    for recipe in &recipes {
        *by_source.entry(recipe.source().to_string()).or_default() += 1;
    }

    recommender.retrain().await;
    display_status(&by_source, interactions, &recommender.model_status())?;
    Ok(())
}
