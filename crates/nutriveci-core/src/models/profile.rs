// ABOUTME: Per-user dietary and health profile used for hard recommendation constraints
// ABOUTME: Normalizes pathology and allergy tokens on construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

use crate::constants::dietary::NONE_MARKERS;
use serde::{Deserialize, Serialize};

/// Dietary/health profile for one user (last write wins)
///
/// Pathologies and allergies are stored as trimmed, lower-cased tokens. Use
/// [`DietaryProfile::normalized`] after deserializing untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietaryProfile {
    /// Owner of the profile
    pub user_id: String,
    /// Conditions such as `diabetes` or `hipertension`
    #[serde(default)]
    pub pathologies: Vec<String>,
    /// Allergen tokens matched against ingredient lines
    #[serde(default)]
    pub allergies: Vec<String>,
    /// Age in years
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

impl DietaryProfile {
    /// Create an empty profile
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            pathologies: Vec::new(),
            allergies: Vec::new(),
            age: None,
        }
    }

    /// Set pathologies (normalized)
    #[must_use]
    pub fn with_pathologies<I, S>(mut self, pathologies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.pathologies = normalize_tokens(pathologies);
        self
    }

    /// Set allergies (normalized)
    #[must_use]
    pub fn with_allergies<I, S>(mut self, allergies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allergies = normalize_tokens(allergies);
        self
    }

    /// Set age
    #[must_use]
    pub const fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// Set or clear age
    #[must_use]
    pub const fn with_optional_age(mut self, age: Option<u32>) -> Self {
        self.age = age;
        self
    }

    /// Build a profile from comma-separated free-text answers
    ///
    /// `"Maní, gluten"` becomes `["maní", "gluten"]`; answers such as
    /// `"ninguno"` or `"none"` yield an empty list.
    #[must_use]
    pub fn from_comma_lists(
        user_id: impl Into<String>,
        pathologies: &str,
        allergies: &str,
        age: Option<u32>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            pathologies: normalize_tokens(pathologies.split(',')),
            allergies: normalize_tokens(allergies.split(',')),
            age,
        }
    }

    /// Re-normalize tokens (for profiles read from external input)
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            pathologies: normalize_tokens(&self.pathologies),
            allergies: normalize_tokens(&self.allergies),
            ..self
        }
    }

    /// Whether any pathology equals one of `terms`, ignoring case and padding
    #[must_use]
    pub fn has_any_pathology<S: AsRef<str>>(&self, terms: &[S]) -> bool {
        self.pathologies.iter().any(|pathology| {
            let pathology = pathology.trim().to_lowercase();
            terms
                .iter()
                .any(|term| term.as_ref().trim().to_lowercase() == pathology)
        })
    }

    /// Whether the profile carries no constraint at all
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.pathologies.is_empty() && self.allergies.is_empty() && self.age.is_none()
    }
}

fn normalize_tokens<I, S>(tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for token in tokens {
        let token = token.as_ref().trim().to_lowercase();
        if token.is_empty() || NONE_MARKERS.contains(&token.as_str()) {
            continue;
        }
        if !normalized.contains(&token) {
            normalized.push(token);
        }
    }
    normalized
}
