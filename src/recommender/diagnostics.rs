// ABOUTME: Recommendation result types and the diagnostics recorded while producing them
// ABOUTME: Every degraded path (skips, fallbacks, store failures) leaves a typed record
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriVeci

use chrono::{DateTime, Utc};
use nutriveci_core::models::Recipe;
use nutriveci_intelligence::factorization::ModelSummary;
use serde::Serialize;
use std::fmt;

/// Ranking strategy that produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Personalized latent factor scores
    Model,
    /// Aggregate interaction counts
    Popularity,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Model => "model",
            Self::Popularity => "popularity",
        })
    }
}

/// Something worth knowing about how a result was produced
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Requested count was outside `1..=max_results`
    CountClamped {
        /// Count asked for
        requested: usize,
        /// Count used
        effective: usize,
    },
    /// User has too few distinct interacted recipes for the model path
    ColdStart {
        /// Distinct recipes the user interacted with
        interacted: usize,
        /// Threshold for the model path
        required: usize,
    },
    /// Model-based scoring is switched off
    ModelDisabled,
    /// No trained model has been published yet
    NoModel,
    /// The user has interacted with every catalog recipe
    NothingUnseen,
    /// One candidate could not be scored and was skipped
    PredictionSkipped {
        /// Skipped recipe
        recipe_id: String,
        /// Prediction failure
        reason: String,
    },
    /// Every candidate failed to score, so the popularity path was used
    ModelPathFailed {
        /// Candidates that were attempted
        candidates: usize,
    },
    /// Dietary rules excluded every candidate, so the unfiltered set was used
    FilterRelaxed {
        /// Candidates the rules would have excluded
        excluded: usize,
    },
    /// The senior difficulty preference would have emptied the set and was skipped
    DifficultyPreferenceSkipped,
    /// The profile could not be read; the popularity path was used without filtering
    ProfileUnavailable {
        /// Store failure
        reason: String,
    },
    /// A store read failed; nothing could be recommended
    StoreUnavailable {
        /// Which store failed
        store: &'static str,
        /// Store failure
        reason: String,
    },
    /// A ranked identifier had no catalog entry and was dropped
    UnknownRecipeDropped {
        /// Dropped identifier
        recipe_id: String,
    },
}

/// Response of one recommendation call
#[derive(Debug, Clone, Serialize)]
pub struct Recommendations {
    /// Ranked recipes, best first
    pub recipes: Vec<Recipe>,
    /// Strategy used; `None` when the request stopped before ranking
    pub strategy: Option<Strategy>,
    /// Degradations encountered along the way
    pub diagnostics: Vec<Diagnostic>,
}

impl Recommendations {
    /// Result with no recipes
    #[must_use]
    pub const fn empty(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            recipes: Vec::new(),
            strategy: None,
            diagnostics,
        }
    }

    /// Whether any diagnostic matches `predicate`
    pub fn has_diagnostic(&self, predicate: impl Fn(&Diagnostic) -> bool) -> bool {
        self.diagnostics.iter().any(predicate)
    }
}

/// Result of appending one interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AppendOutcome {
    /// Interaction records after the append
    pub total_interactions: usize,
    /// Whether the append triggered a retrain that published a model
    pub retrained: bool,
}

/// Current state of the model slot
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    /// Model-based scoring enabled in configuration
    pub enabled: bool,
    /// Published model, if any
    pub model: Option<ModelSummary>,
    /// When the status was taken
    pub observed_at: DateTime<Utc>,
}
