// ABOUTME: Integration tests for catalog import into the stores
// ABOUTME: Covers per-source catalog rebuilds, file input, and malformed rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use nutriveci::catalog::{CatalogError, CatalogFormat, CatalogImporter};
use nutriveci::errors::{AppError, ErrorCode};
use nutriveci::models::RecipeSource;
use nutriveci::stores::{CatalogStore, InMemoryStore};
use std::io::Write;
use tempfile::NamedTempFile;

const FOODCOM_ROWS: &str = r#"{"id": 137739, "name": "arriba baked winter squash", "ingredients": "['winter squash', 'mexican seasoning', 'honey']", "steps": "['preheat oven', 'bake']", "nutrition": "[51.5, 0.0, 13.0, 0.0, 2.0, 0.0, 4.0]", "tags": "['60-minutes-or-less', 'Vegetables']"}
{"id": 31490, "name": "a bit different breakfast pizza", "ingredients": ["prepared pizza crust", "sausage patty", "eggs"], "steps": ["preheat oven"], "nutrition": [173.4, 18.0, 0.0, 17.0, 22.0, 35.0, 1.0]}
"#;

const LOCAL_ROWS: &str = r#"[
  {"name": "Ajiaco santafereño", "ingredients": ["papa criolla", "pollo", "guascas"], "sodium": 320.0, "difficulty": "difícil"},
  {"id": "bandeja", "name": "Bandeja paisa", "ingredients": ["frijoles", "arroz"], "nutrition": {"calories": 1200.0, "sodium": 900.0}}
]"#;

#[tokio::test]
async fn test_import_foodcom_rows() {
    let store = InMemoryStore::new();

    let report = CatalogImporter::new()
        .import_str(&store, FOODCOM_ROWS, CatalogFormat::FoodCom)
        .await
        .unwrap();

    assert_eq!(report.imported, 2);
    assert_eq!(report.duplicates, 0);
    assert_eq!(report.catalog_size, 2);

    let recipes = store.get_recipes().await.unwrap();
    assert_eq!(recipes[0].id.native_id, "137739");
    assert_eq!(recipes[0].ingredients.len(), 3);
    assert_eq!(recipes[0].nutrition.sugar, Some(13.0));
    assert!(recipes[0].tags.contains("vegetables"));
    assert_eq!(recipes[1].nutrition.sodium, Some(17.0));
}

#[tokio::test]
async fn test_importing_one_source_keeps_the_other() {
    let store = InMemoryStore::new();
    let importer = CatalogImporter::new();

    importer
        .import_str(&store, FOODCOM_ROWS, CatalogFormat::FoodCom)
        .await
        .unwrap();
    let local = importer
        .import_str(&store, LOCAL_ROWS, CatalogFormat::Local)
        .await
        .unwrap();
    assert_eq!(local.retained, 2);
    assert_eq!(local.catalog_size, 4);

    // Re-import Food.com with a single row: the local recipes survive
    let single = FOODCOM_ROWS.lines().next().unwrap();
    let again = importer
        .import_str(&store, single, CatalogFormat::FoodCom)
        .await
        .unwrap();
    assert_eq!(again.retained, 2);
    assert_eq!(again.catalog_size, 3);

    let recipes = store.get_recipes().await.unwrap();
    let local_count = recipes
        .iter()
        .filter(|recipe| recipe.id.source == RecipeSource::Local)
        .count();
    assert_eq!(local_count, 2);
}

#[tokio::test]
async fn test_local_rows_carry_nutrition_and_difficulty() {
    let store = InMemoryStore::new();
    CatalogImporter::new()
        .import_str(&store, LOCAL_ROWS, CatalogFormat::Local)
        .await
        .unwrap();

    let recipes = store.get_recipes().await.unwrap();
    let ajiaco = &recipes[0];
    assert_eq!(ajiaco.id.native_id.len(), 16);
    assert_eq!(ajiaco.nutrition.sodium, Some(320.0));
    assert_eq!(ajiaco.difficulty, nutriveci::models::Difficulty::Hard);

    let bandeja = &recipes[1];
    assert_eq!(bandeja.id.native_id, "bandeja");
    assert_eq!(bandeja.nutrition.sodium, Some(900.0));
    assert_eq!(bandeja.nutrition.sugar, None);
}

#[tokio::test]
async fn test_import_file_with_row_limit() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(FOODCOM_ROWS.as_bytes()).unwrap();
    let store = InMemoryStore::new();

    let report = CatalogImporter::new()
        .with_max_rows(1)
        .import_file(&store, file.path(), CatalogFormat::FoodCom)
        .await
        .unwrap();

    assert_eq!(report.imported, 1);
    assert_eq!(store.get_recipes().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let store = InMemoryStore::new();

    let err = CatalogImporter::new()
        .import_file(
            &store,
            std::path::Path::new("/nonexistent/recipes.json"),
            CatalogFormat::Local,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::Io(_)));
}

#[tokio::test]
async fn test_expression_in_list_field_is_rejected_without_touching_store() {
    let store = InMemoryStore::new();
    CatalogImporter::new()
        .import_str(&store, LOCAL_ROWS, CatalogFormat::Local)
        .await
        .unwrap();

    let hostile = r#"{"id": 1, "name": "x", "ingredients": "__import__('os').system('rm -rf /')"}"#;
    let err = CatalogImporter::new()
        .import_str(&store, hostile, CatalogFormat::FoodCom)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CatalogError::ListField {
            row: 1,
            field: "ingredients",
            ..
        }
    ));
    let app: AppError = err.into();
    assert_eq!(app.code, ErrorCode::InvalidFormat);
    assert_eq!(store.get_recipes().await.unwrap().len(), 2);
}
