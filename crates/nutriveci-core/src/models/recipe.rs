// ABOUTME: Recipe catalog models with nutritional attributes and structured identifiers
// ABOUTME: Defines Recipe, RecipeId, RecipeSource, NutritionFacts, and Difficulty
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Provenance of a recipe record
///
/// Serialized as a lowercase string so it can be stored in a single column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecipeSource {
    /// Imported from the Food.com dataset
    FoodCom,
    /// Curated locally (memory file, manual entry)
    Local,
    /// Any other named source
    Other(String),
}

impl RecipeSource {
    /// Canonical lowercase name of the source
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::FoodCom => "foodcom",
            Self::Local => "local",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for RecipeSource {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "foodcom" | "food.com" => Self::FoodCom,
            "local" => Self::Local,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<RecipeSource> for String {
    fn from(value: RecipeSource) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for RecipeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a textual recipe identifier cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid recipe id {input:?}: expected '<source>:<native_id>'")]
pub struct RecipeIdParseError {
    /// The rejected input
    pub input: String,
}

/// Globally unique recipe identifier: a source tag plus the source-native id
///
/// Two recipes from different sources never collide even when their native
/// identifiers are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecipeId {
    /// Where the recipe came from
    pub source: RecipeSource,
    /// Identifier inside that source
    pub native_id: String,
}

impl RecipeId {
    /// Create a new identifier
    pub fn new(source: RecipeSource, native_id: impl Into<String>) -> Self {
        Self {
            source,
            native_id: native_id.into(),
        }
    }

    /// Identifier for a Food.com recipe
    pub fn foodcom(native_id: impl Into<String>) -> Self {
        Self::new(RecipeSource::FoodCom, native_id)
    }

    /// Identifier for a locally curated recipe
    pub fn local(native_id: impl Into<String>) -> Self {
        Self::new(RecipeSource::Local, native_id)
    }

    /// Parse a legacy prefixed identifier such as `foodcom_123` or `local_abc`
    ///
    /// Only the two historical prefixes are recognised.
    ///
    /// # Errors
    ///
    /// Returns an error when the input carries neither prefix or has an empty native id
    pub fn from_legacy(input: &str) -> Result<Self, RecipeIdParseError> {
        let parsed = input
            .strip_prefix("foodcom_")
            .map(Self::foodcom)
            .or_else(|| input.strip_prefix("local_").map(Self::local));

        match parsed {
            Some(id) if !id.native_id.is_empty() => Ok(id),
            _ => Err(RecipeIdParseError {
                input: input.to_owned(),
            }),
        }
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.native_id)
    }
}

impl FromStr for RecipeId {
    type Err = RecipeIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((source, native)) if !source.trim().is_empty() && !native.is_empty() => Ok(
                Self::new(RecipeSource::from(source.to_owned()), native.to_owned()),
            ),
            _ => Self::from_legacy(s),
        }
    }
}

/// Recipe difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Simple recipes, basic techniques
    Easy,
    /// Moderate complexity
    #[default]
    Medium,
    /// Complex recipes, advanced techniques
    Hard,
}

impl Difficulty {
    /// Parse difficulty from free text (English or Spanish), defaulting to medium
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "easy" | "fácil" | "facil" | "beginner" | "sencilla" | "simple" => Self::Easy,
            "hard" | "difícil" | "dificil" | "advanced" | "avanzado" => Self::Hard,
            _ => Self::Medium,
        }
    }

    /// Canonical lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// Nutritional attributes, each nullable, in the units stored by the source
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionFacts {
    /// Energy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    /// Total fat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_fat: Option<f64>,
    /// Sugar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar: Option<f64>,
    /// Sodium
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium: Option<f64>,
    /// Protein
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    /// Carbohydrates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbohydrates: Option<f64>,
}

/// A catalog recipe
///
/// Immutable once loaded: the catalog is replaced wholesale on reload and
/// recipes are never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Structured identifier (carries the source tag)
    pub id: RecipeId,
    /// Display name
    pub name: String,
    /// Optional free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-text ingredient lines
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Preparation steps
    #[serde(default)]
    pub steps: Vec<String>,
    /// Nutritional attributes
    #[serde(default)]
    pub nutrition: NutritionFacts,
    /// Difficulty level
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Tag set
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Recipe {
    /// Create a recipe with no ingredients, nutrition, or tags
    pub fn new(id: RecipeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            ingredients: Vec::new(),
            steps: Vec::new(),
            nutrition: NutritionFacts::default(),
            difficulty: Difficulty::default(),
            tags: BTreeSet::new(),
        }
    }

    /// Set ingredient lines
    #[must_use]
    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self
    }

    /// Set nutritional attributes
    #[must_use]
    pub fn with_nutrition(mut self, nutrition: NutritionFacts) -> Self {
        self.nutrition = nutrition;
        self
    }

    /// Set difficulty
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set tags
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Provenance of this recipe
    #[must_use]
    pub const fn source(&self) -> &RecipeSource {
        &self.id.source
    }

    /// Whether any ingredient line contains `token`, ignoring case
    ///
    /// `token` must already be lower-cased.
    #[must_use]
    pub fn mentions_ingredient(&self, token: &str) -> bool {
        self.ingredients
            .iter()
            .any(|line| line.to_lowercase().contains(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_id_parse_structured_and_legacy() {
        let structured: RecipeId = "foodcom:137739".parse().unwrap();
        assert_eq!(structured, RecipeId::foodcom("137739"));

        let legacy: RecipeId = "local_abc".parse().unwrap();
        assert_eq!(legacy, RecipeId::local("abc"));

        let other: RecipeId = "grandma:7".parse().unwrap();
        assert_eq!(other.source, RecipeSource::Other("grandma".into()));

        assert!("plain".parse::<RecipeId>().is_err());
        assert!("foodcom_".parse::<RecipeId>().is_err());
    }

    #[test]
    fn test_recipe_source_serializes_as_string() {
        let id = RecipeId::foodcom("1");
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json["source"], "foodcom");
        assert_eq!(id.to_string(), "foodcom:1");
    }

    #[test]
    fn test_difficulty_lossy_parse() {
        assert_eq!(Difficulty::from_str_lossy("Fácil"), Difficulty::Easy);
        assert_eq!(Difficulty::from_str_lossy("HARD"), Difficulty::Hard);
        assert_eq!(Difficulty::from_str_lossy("whatever"), Difficulty::Medium);
    }

    #[test]
    fn test_mentions_ingredient_is_case_insensitive() {
        let recipe = Recipe::new(RecipeId::local("1"), "Pad Thai")
            .with_ingredients(["Rice noodles", "Crushed PEANUTS"]);
        assert!(recipe.mentions_ingredient("peanut"));
        assert!(!recipe.mentions_ingredient("shrimp"));
    }
}
