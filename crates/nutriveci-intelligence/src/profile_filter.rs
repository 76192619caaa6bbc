// ABOUTME: Dietary profile filter applying hard nutrient and allergen constraints to candidates
// ABOUTME: Guarantees a non-empty result by relaxing constraints when everything is excluded
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

//! Profile filter
//!
//! Rules are applied conjunctively:
//!
//! 1. hypertension-family pathology: exclude sodium at or above the limit
//! 2. diabetes: exclude sugar at or above the limit
//! 3. allergies: exclude recipes whose ingredient lines contain the token
//! 4. age above the senior threshold: narrow to non-hard recipes
//!
//! An active nutrient rule also excludes recipes whose value is unknown. If
//! rules 1-3 remove every candidate the untouched input is returned instead;
//! rule 4 only narrows when something survives it.

use crate::config::FilterConfig;
use nutriveci_core::models::{DietaryProfile, Difficulty, Recipe, RecipeId};
use serde::Serialize;
use tracing::debug;

/// Why a candidate was removed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Sodium at or above the hypertension limit, or unknown
    Sodium {
        /// Stored sodium value, `None` when the recipe has none
        value: Option<f64>,
        /// Configured limit
        limit: f64,
    },
    /// Sugar at or above the diabetes limit, or unknown
    Sugar {
        /// Stored sugar value, `None` when the recipe has none
        value: Option<f64>,
        /// Configured limit
        limit: f64,
    },
    /// An ingredient line mentions a declared allergen
    Allergen {
        /// Matching allergy token
        token: String,
    },
    /// Hard recipe dropped for a senior user
    Difficulty,
}

/// Result of filtering one candidate set
#[derive(Debug, Clone)]
pub struct FilterOutcome<'a> {
    /// Surviving candidates, in input order
    pub kept: Vec<&'a Recipe>,
    /// Candidates removed, with the first rule each one violated
    pub excluded: Vec<(&'a RecipeId, ExclusionReason)>,
    /// Rules 1-3 removed everything, so the input was returned unchanged
    pub relaxed: bool,
    /// Rule 4 would have removed everything, so it was skipped
    pub difficulty_relaxed: bool,
}

impl FilterOutcome<'_> {
    /// Identifiers of the surviving candidates
    #[must_use]
    pub fn kept_ids(&self) -> Vec<&RecipeId> {
        self.kept.iter().map(|recipe| &recipe.id).collect()
    }
}

/// Applies a dietary profile to candidate recipes
#[derive(Debug, Clone, Default)]
pub struct ProfileFilter {
    config: FilterConfig,
}

impl ProfileFilter {
    /// Create a filter with the given limits
    #[must_use]
    pub const fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Filter `candidates` for `profile`
    #[must_use]
    pub fn apply<'a>(&self, profile: &DietaryProfile, candidates: &'a [Recipe]) -> FilterOutcome<'a> {
        let refs: Vec<&'a Recipe> = candidates.iter().collect();
        self.apply_refs(profile, &refs)
    }

    /// Filter borrowed candidates for `profile`
    #[must_use]
    pub fn apply_refs<'a>(
        &self,
        profile: &DietaryProfile,
        candidates: &[&'a Recipe],
    ) -> FilterOutcome<'a> {
        let sodium_rule = profile.has_any_pathology(self.config.hypertension_terms.as_slice());
        let sugar_rule = profile.has_any_pathology(self.config.diabetes_terms.as_slice());
        let allergies: Vec<&str> = profile
            .allergies
            .iter()
            .map(|token| token.trim())
            .filter(|token| !token.is_empty())
            .collect();

        let mut kept = Vec::with_capacity(candidates.len());
        let mut excluded = Vec::new();
        for &recipe in candidates {
            match self.hard_violation(recipe, sodium_rule, sugar_rule, &allergies) {
                Some(reason) => excluded.push((&recipe.id, reason)),
                None => kept.push(recipe),
            }
        }

        if kept.is_empty() && !candidates.is_empty() {
            debug!(
                user.id = %profile.user_id,
                candidates = candidates.len(),
                "dietary rules excluded every candidate, returning unfiltered set"
            );
            return FilterOutcome {
                kept: candidates.to_vec(),
                excluded,
                relaxed: true,
                difficulty_relaxed: false,
            };
        }

        let mut difficulty_relaxed = false;
        if profile.age.is_some_and(|age| age > self.config.senior_age) {
            let (simple, hard): (Vec<&'a Recipe>, Vec<&'a Recipe>) = kept
                .iter()
                .partition(|recipe| recipe.difficulty != Difficulty::Hard);
            if simple.is_empty() {
                difficulty_relaxed = !hard.is_empty();
            } else {
                excluded.extend(
                    hard.into_iter()
                        .map(|recipe| (&recipe.id, ExclusionReason::Difficulty)),
                );
                kept = simple;
            }
        }

        FilterOutcome {
            kept,
            excluded,
            relaxed: false,
            difficulty_relaxed,
        }
    }

    fn hard_violation(
        &self,
        recipe: &Recipe,
        sodium_rule: bool,
        sugar_rule: bool,
        allergies: &[&str],
    ) -> Option<ExclusionReason> {
        if sodium_rule && !below(recipe.nutrition.sodium, self.config.sodium_limit) {
            return Some(ExclusionReason::Sodium {
                value: recipe.nutrition.sodium,
                limit: self.config.sodium_limit,
            });
        }
        if sugar_rule && !below(recipe.nutrition.sugar, self.config.sugar_limit) {
            return Some(ExclusionReason::Sugar {
                value: recipe.nutrition.sugar,
                limit: self.config.sugar_limit,
            });
        }
        allergies
            .iter()
            .find(|token| recipe.mentions_ingredient(&token.to_lowercase()))
            .map(|token| ExclusionReason::Allergen {
                token: (*token).to_owned(),
            })
    }
}

/// Only a known value strictly under the limit passes
fn below(value: Option<f64>, limit: f64) -> bool {
    value.is_some_and(|value| value < limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutriveci_core::models::NutritionFacts;

    fn with_sodium(id: &str, sodium: Option<f64>) -> Recipe {
        Recipe::new(RecipeId::local(id), id).with_nutrition(NutritionFacts {
            sodium,
            ..NutritionFacts::default()
        })
    }

    #[test]
    fn test_hypertension_excludes_high_sodium() {
        let candidates = vec![
            with_sodium("a", Some(100.0)),
            with_sodium("b", Some(600.0)),
            with_sodium("c", Some(450.0)),
        ];
        let profile = DietaryProfile::new("u").with_pathologies(["hipertension"]);
        let outcome = ProfileFilter::default().apply(&profile, &candidates);

        let ids: Vec<&str> = outcome.kept.iter().map(|r| r.id.native_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(!outcome.relaxed);
        assert!(matches!(
            outcome.excluded[0].1,
            ExclusionReason::Sodium { value: Some(value), .. } if (value - 600.0).abs() < f64::EPSILON
        ));
    }

    #[test]
    fn test_limit_is_inclusive_and_missing_values_are_excluded() {
        let candidates = vec![
            with_sodium("edge", Some(500.0)),
            with_sodium("unknown", None),
            with_sodium("low", Some(499.9)),
        ];
        let profile = DietaryProfile::new("u").with_pathologies(["presion alta"]);
        let outcome = ProfileFilter::default().apply(&profile, &candidates);
        assert_eq!(outcome.kept_ids(), vec![&RecipeId::local("low")]);
        assert_eq!(
            outcome.excluded[1],
            (
                &RecipeId::local("unknown"),
                ExclusionReason::Sodium {
                    value: None,
                    limit: 500.0
                }
            )
        );
    }

    #[test]
    fn test_missing_values_pass_without_an_active_rule() {
        let candidates = vec![with_sodium("unknown", None)];
        let profile = DietaryProfile::new("u").with_allergies(["peanut"]);
        let outcome = ProfileFilter::default().apply(&profile, &candidates);
        assert_eq!(outcome.kept_ids(), vec![&RecipeId::local("unknown")]);
        assert!(!outcome.relaxed);
    }

    #[test]
    fn test_only_unknown_nutrition_relaxes_to_full_set() {
        let candidates = vec![with_sodium("x", None), with_sodium("y", None)];
        let profile = DietaryProfile::new("u").with_pathologies(["hipertension", "diabetes"]);
        let outcome = ProfileFilter::default().apply(&profile, &candidates);
        assert!(outcome.relaxed);
        assert_eq!(outcome.kept.len(), 2);
    }

    #[test]
    fn test_pathology_match_ignores_case_on_unnormalized_profile() {
        let sweet = Recipe::new(RecipeId::local("cake"), "Cake").with_nutrition(NutritionFacts {
            sugar: Some(40.0),
            ..NutritionFacts::default()
        });
        let plain = Recipe::new(RecipeId::local("soup"), "Soup").with_nutrition(NutritionFacts {
            sugar: Some(2.0),
            ..NutritionFacts::default()
        });
        let candidates = vec![sweet, plain];
        let profile = DietaryProfile {
            pathologies: vec![" Diabetes ".into()],
            ..DietaryProfile::new("u")
        };
        let outcome = ProfileFilter::default().apply(&profile, &candidates);
        assert_eq!(outcome.kept_ids(), vec![&RecipeId::local("soup")]);
    }

    #[test]
    fn test_diabetes_excludes_sugar() {
        let sweet = Recipe::new(RecipeId::local("cake"), "Cake").with_nutrition(NutritionFacts {
            sugar: Some(40.0),
            ..NutritionFacts::default()
        });
        let plain = Recipe::new(RecipeId::local("soup"), "Soup").with_nutrition(NutritionFacts {
            sugar: Some(2.0),
            ..NutritionFacts::default()
        });
        let candidates = vec![sweet, plain];
        let profile = DietaryProfile::new("u").with_pathologies(["Diabetes"]);
        let outcome = ProfileFilter::default().apply(&profile, &candidates);
        assert_eq!(outcome.kept_ids(), vec![&RecipeId::local("soup")]);
    }

    #[test]
    fn test_allergy_substring_match_is_case_insensitive() {
        let candidates = vec![
            Recipe::new(RecipeId::local("1"), "Satay").with_ingredients(["Peanut butter"]),
            Recipe::new(RecipeId::local("2"), "Salad").with_ingredients(["lettuce"]),
        ];
        let profile = DietaryProfile::new("u").with_allergies(["PEANUT"]);
        let outcome = ProfileFilter::default().apply(&profile, &candidates);
        assert_eq!(outcome.kept_ids(), vec![&RecipeId::local("2")]);
        assert_eq!(
            outcome.excluded[0].1,
            ExclusionReason::Allergen {
                token: "peanut".into()
            }
        );
    }

    #[test]
    fn test_everything_excluded_returns_input_unchanged() {
        let candidates = vec![
            Recipe::new(RecipeId::local("1"), "A").with_ingredients(["milk"]),
            Recipe::new(RecipeId::local("2"), "B")
                .with_ingredients(["whole milk"])
                .with_difficulty(Difficulty::Hard),
        ];
        let profile = DietaryProfile::new("u").with_allergies(["milk"]).with_age(80);
        let outcome = ProfileFilter::default().apply(&profile, &candidates);
        assert!(outcome.relaxed);
        assert_eq!(outcome.kept.len(), 2);
    }

    #[test]
    fn test_senior_narrows_to_non_hard_when_possible() {
        let candidates = vec![
            Recipe::new(RecipeId::local("1"), "A").with_difficulty(Difficulty::Hard),
            Recipe::new(RecipeId::local("2"), "B").with_difficulty(Difficulty::Easy),
        ];
        let profile = DietaryProfile::new("u").with_age(70);
        let outcome = ProfileFilter::default().apply(&profile, &candidates);
        assert_eq!(outcome.kept_ids(), vec![&RecipeId::local("2")]);
        assert_eq!(outcome.excluded[0].1, ExclusionReason::Difficulty);
    }

    #[test]
    fn test_senior_rule_never_empties_the_set() {
        let candidates =
            vec![Recipe::new(RecipeId::local("1"), "A").with_difficulty(Difficulty::Hard)];
        let profile = DietaryProfile::new("u").with_age(90);
        let outcome = ProfileFilter::default().apply(&profile, &candidates);
        assert_eq!(outcome.kept.len(), 1);
        assert!(outcome.difficulty_relaxed);
    }

    #[test]
    fn test_age_sixty_five_is_not_senior() {
        let candidates = vec![
            Recipe::new(RecipeId::local("1"), "A").with_difficulty(Difficulty::Hard),
            Recipe::new(RecipeId::local("2"), "B"),
        ];
        let profile = DietaryProfile::new("u").with_age(65);
        let outcome = ProfileFilter::default().apply(&profile, &candidates);
        assert_eq!(outcome.kept.len(), 2);
    }
}
