// ABOUTME: Decodes Food.com and local recipe rows into catalog recipes
// ABOUTME: Rebuilds the catalog store per source while preserving other sources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

use super::list_field::{number_list_from_value, string_list_from_value};
use super::CatalogError;
use crate::stores::CatalogStore;
use nutriveci_core::errors::ListFieldError;
use nutriveci_core::models::{Difficulty, NutritionFacts, Recipe, RecipeId, RecipeSource};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

/// Food.com nutrition list order
const NUTRITION_CALORIES: usize = 0;
const NUTRITION_TOTAL_FAT: usize = 1;
const NUTRITION_SUGAR: usize = 2;
const NUTRITION_SODIUM: usize = 3;
const NUTRITION_PROTEIN: usize = 4;
const NUTRITION_CARBOHYDRATES: usize = 6;

/// Hex characters kept from the name digest when deriving an id
const DERIVED_ID_LEN: usize = 16;

/// Supported catalog file shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogFormat {
    /// Food.com export rows
    FoodCom,
    /// Locally curated recipe file
    Local,
}

impl CatalogFormat {
    /// Source tag given to recipes of this format
    #[must_use]
    pub const fn source(self) -> RecipeSource {
        match self {
            Self::FoodCom => RecipeSource::FoodCom,
            Self::Local => RecipeSource::Local,
        }
    }
}

impl FromStr for CatalogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "foodcom" | "food.com" => Ok(Self::FoodCom),
            "local" => Ok(Self::Local),
            other => Err(format!("unknown catalog format '{other}'")),
        }
    }
}

/// Outcome of one import
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    /// Format that was imported
    pub format: CatalogFormat,
    /// Recipes decoded from the file
    pub imported: usize,
    /// Rows dropped because their id was already seen in the file
    pub duplicates: usize,
    /// Recipes from other sources kept in the catalog
    pub retained: usize,
    /// Catalog size after the import
    pub catalog_size: usize,
}

/// One input row, in either format
#[derive(Debug, Deserialize)]
struct RawRecipe {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    ingredients: Value,
    #[serde(default)]
    steps: Value,
    #[serde(default)]
    tags: Value,
    #[serde(default)]
    nutrition: Value,
    #[serde(default)]
    calories: Option<f64>,
    #[serde(default)]
    total_fat: Option<f64>,
    #[serde(default)]
    sugar: Option<f64>,
    #[serde(default)]
    sodium: Option<f64>,
    #[serde(default)]
    protein: Option<f64>,
    #[serde(default)]
    carbohydrates: Option<f64>,
    #[serde(default)]
    difficulty: Option<String>,
}

impl RawRecipe {
    fn into_recipe(self, format: CatalogFormat, row: usize) -> Result<Recipe, CatalogError> {
        let name = self
            .name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "Untitled recipe".to_owned());
        let native_id = native_id(&self.id).unwrap_or_else(|| derived_id(&name));

        let embedded = embedded_nutrition(&self.nutrition).map_err(list_error(row, "nutrition"))?;
        let nutrition = NutritionFacts {
            calories: self.calories.or(embedded.calories),
            total_fat: self.total_fat.or(embedded.total_fat),
            sugar: self.sugar.or(embedded.sugar),
            sodium: self.sodium.or(embedded.sodium),
            protein: self.protein.or(embedded.protein),
            carbohydrates: self.carbohydrates.or(embedded.carbohydrates),
        };

        Ok(Recipe {
            id: RecipeId::new(format.source(), native_id),
            name,
            description: self
                .description
                .map(|d| d.trim().to_owned())
                .filter(|d| !d.is_empty()),
            ingredients: string_list_from_value(&self.ingredients)
                .map_err(list_error(row, "ingredients"))?,
            steps: string_list_from_value(&self.steps).map_err(list_error(row, "steps"))?,
            nutrition,
            difficulty: self
                .difficulty
                .as_deref()
                .map_or(Difficulty::Medium, Difficulty::from_str_lossy),
            tags: string_list_from_value(&self.tags)
                .map_err(list_error(row, "tags"))?
                .into_iter()
                .map(|tag| tag.trim().to_lowercase())
                .filter(|tag| !tag.is_empty())
                .collect(),
        })
    }
}

fn list_error(row: usize, field: &'static str) -> impl Fn(ListFieldError) -> CatalogError {
    move |source| CatalogError::ListField { row, field, source }
}

/// Source-native id from a JSON number or non-blank string
fn native_id(value: &Value) -> Option<String> {
    match value {
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_owned()),
        _ => None,
    }
}

/// Deterministic id for recipes that carry none: a SHA-256 prefix of the name
fn derived_id(name: &str) -> String {
    let digest = Sha256::digest(name.trim().to_lowercase().as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(DERIVED_ID_LEN);
    encoded
}

/// Nutrition carried in a single column: Food.com list or an object
fn embedded_nutrition(value: &Value) -> Result<NutritionFacts, ListFieldError> {
    match value {
        Value::Object(map) => {
            let field = |keys: &[&str]| keys.iter().find_map(|k| map.get(*k)?.as_f64());
            Ok(NutritionFacts {
                calories: field(&["calories"]),
                total_fat: field(&["total_fat", "fat"]),
                sugar: field(&["sugar"]),
                sodium: field(&["sodium"]),
                protein: field(&["protein"]),
                carbohydrates: field(&["carbohydrates", "carbs"]),
            })
        }
        other => {
            let values = number_list_from_value(other)?;
            let at = |index: usize| values.get(index).copied();
            Ok(NutritionFacts {
                calories: at(NUTRITION_CALORIES),
                total_fat: at(NUTRITION_TOTAL_FAT),
                sugar: at(NUTRITION_SUGAR),
                sodium: at(NUTRITION_SODIUM),
                protein: at(NUTRITION_PROTEIN),
                carbohydrates: at(NUTRITION_CARBOHYDRATES),
            })
        }
    }
}

/// Split a document into JSON rows: a top-level array or one object per line
fn rows(text: &str) -> Result<Vec<Value>, CatalogError> {
    if text.trim_start().starts_with('[') {
        return serde_json::from_str(text).map_err(|source| CatalogError::Json { row: 1, source });
    }
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| CatalogError::Json {
                row: index + 1,
                source,
            })
        })
        .collect()
}

/// Decode a catalog document
///
/// Rows whose id repeats an earlier row are dropped; the returned count is the
/// number of such duplicates.
///
/// # Errors
///
/// Returns `CatalogError` identifying the first malformed row
pub fn parse_catalog(
    text: &str,
    format: CatalogFormat,
    max_rows: Option<usize>,
) -> Result<(Vec<Recipe>, usize), CatalogError> {
    let mut seen = HashSet::new();
    let mut recipes = Vec::new();
    let mut duplicates = 0;

    for (index, value) in rows(text)?
        .into_iter()
        .take(max_rows.unwrap_or(usize::MAX))
        .enumerate()
    {
        let row = index + 1;
        let raw: RawRecipe =
            serde_json::from_value(value).map_err(|source| CatalogError::Json { row, source })?;
        let recipe = raw.into_recipe(format, row)?;
        if seen.insert(recipe.id.clone()) {
            recipes.push(recipe);
        } else {
            warn!(row, recipe.id = %recipe.id, "duplicate recipe id in import, keeping first");
            duplicates += 1;
        }
    }
    Ok((recipes, duplicates))
}

/// Loads catalog files into a [`CatalogStore`]
#[derive(Debug, Clone, Default)]
pub struct CatalogImporter {
    max_rows: Option<usize>,
}

impl CatalogImporter {
    /// Importer that reads every row
    #[must_use]
    pub const fn new() -> Self {
        Self { max_rows: None }
    }

    /// Stop after `max_rows` rows (large Food.com dumps are usually sampled)
    #[must_use]
    pub const fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    /// Read `path` and rebuild the catalog for that source
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or decoded, or the store fails
    pub async fn import_file<S>(
        &self,
        store: &S,
        path: &Path,
        format: CatalogFormat,
    ) -> Result<ImportReport, CatalogError>
    where
        S: CatalogStore + ?Sized,
    {
        let text = tokio::fs::read_to_string(path).await?;
        self.import_str(store, &text, format).await
    }

    /// Decode `text` and rebuild the catalog for that source
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the text cannot be decoded or the store fails
    pub async fn import_str<S>(
        &self,
        store: &S,
        text: &str,
        format: CatalogFormat,
    ) -> Result<ImportReport, CatalogError>
    where
        S: CatalogStore + ?Sized,
    {
        let (imported, duplicates) = parse_catalog(text, format, self.max_rows)?;
        let source = format.source();

        let mut catalog: Vec<Recipe> = store
            .get_recipes()
            .await?
            .into_iter()
            .filter(|recipe| recipe.source() != &source)
            .collect();
        let retained = catalog.len();
        let imported_count = imported.len();
        catalog.extend(imported);

        let catalog_size = store.replace_catalog(catalog).await?;
        info!(
            source = %source,
            imported = imported_count,
            duplicates,
            retained,
            catalog_size,
            "catalog imported"
        );

        Ok(ImportReport {
            format,
            imported: imported_count,
            duplicates,
            retained,
            catalog_size,
        })
    }
}
